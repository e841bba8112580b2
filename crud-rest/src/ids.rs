//! Request identifiers
//!
//! Every request served through [`Server`](crate::server::Server) carries an
//! `x-request-id` header holding a TypeID with the `req` prefix and a UUIDv7
//! suffix, e.g. `req_01h455vb4pex5vsknk084sn02q`. Ids sort by creation time,
//! which keeps log lines of one request easy to correlate.

use http::{HeaderValue, Request};
use mti::prelude::*;
use std::fmt;
use std::str::FromStr;
use tower_http::request_id::{MakeRequestId, RequestId as TowerRequestId};

/// Time-sortable request identifier
///
/// ```rust
/// use crud_rest::ids::RequestId;
///
/// let id = RequestId::new();
/// assert!(id.as_str().starts_with("req_"));
/// assert_eq!(id.as_str().parse::<RequestId>().unwrap(), id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(MagicTypeId);

impl RequestId {
    /// Prefix of every request id
    pub const PREFIX: &'static str = "req";

    /// Create a new id
    #[must_use]
    pub fn new() -> Self {
        Self(Self::PREFIX.create_type_id::<V7>())
    }

    /// The id as text
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Read the id a request already carries, if it is a valid request id
    pub fn from_request<B>(request: &Request<B>) -> Option<Self> {
        request
            .headers()
            .get("x-request-id")?
            .to_str()
            .ok()?
            .parse()
            .ok()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RequestId {
    type Err = RequestIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = MagicTypeId::from_str(s).map_err(RequestIdError::Parse)?;
        let prefix = id.prefix().as_str();
        if prefix != Self::PREFIX {
            return Err(RequestIdError::InvalidPrefix(prefix.to_string()));
        }
        Ok(Self(id))
    }
}

/// Failure to parse a [`RequestId`]
#[derive(Debug, thiserror::Error)]
pub enum RequestIdError {
    /// Not a TypeID at all
    #[error("failed to parse request ID: {0}")]
    Parse(#[from] MagicTypeIdError),

    /// A TypeID with some other prefix
    #[error("invalid request ID prefix '{0}', expected 'req'")]
    InvalidPrefix(String),
}

/// Generates a fresh [`RequestId`] for requests that arrive without one
///
/// Used by [`request_id_layer`](crate::middleware::request_id_layer).
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeTypedRequestId;

impl MakeRequestId for MakeTypedRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<TowerRequestId> {
        let header_value = HeaderValue::from_str(RequestId::new().as_str()).ok()?;
        Some(TowerRequestId::new(header_value))
    }
}
