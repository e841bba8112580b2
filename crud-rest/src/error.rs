//! Process-level errors
//!
//! Request failures are [`ApiError`](crate::handlers::ApiError)s. This type
//! covers what can go wrong before or around serving: loading configuration,
//! installing the subscriber, binding the listener and running the server.

use thiserror::Error;

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the crate
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be extracted
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Configuration was extracted but is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Tracing subscriber could not be installed
    #[error("Tracing error: {0}")]
    Tracing(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}
