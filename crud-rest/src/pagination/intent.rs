//! Normalized pagination intent and resolver errors

use std::fmt;
use std::num::NonZeroU64;

use thiserror::Error;

/// Errors raised while resolving or dispatching a pagination intent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// A query parameter is malformed or missing its companion
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Query parameter name
        parameter: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// `limit` or `value` given without `offset`, `page` or `attribute`
    #[error("Missing pagination parameters: {0}")]
    MissingPaginationParameters(String),

    /// An intent no retrieval strategy can serve
    #[error("Invalid pagination state: {0}")]
    InvalidPaginationState(String),
}

impl PaginationError {
    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter,
            reason: reason.into(),
        }
    }
}

/// The single active pagination mode of a list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationMode {
    /// Return every match without an envelope
    Unpaginated,
    /// Skip `offset` items
    Offset {
        /// Number of leading items to skip
        offset: u64,
    },
    /// Return page `index` (1-based)
    Page {
        /// Requested page number
        index: u64,
    },
    /// Return items strictly before `before` on `attribute`
    Attribute {
        /// Attribute the cursor is keyed on
        attribute: String,
        /// Raw cursor value
        before: String,
    },
}

impl fmt::Display for PaginationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unpaginated => write!(f, "unpaginated"),
            Self::Offset { .. } => write!(f, "offset"),
            Self::Page { .. } => write!(f, "page"),
            Self::Attribute { .. } => write!(f, "attribute"),
        }
    }
}

/// A pagination mode plus an optional item limit
///
/// # Example
///
/// ```rust
/// use std::num::NonZeroU64;
/// use crud_rest::pagination::{PaginationIntent, PaginationMode};
///
/// let intent = PaginationIntent::offset(1).with_limit(NonZeroU64::new(2).unwrap());
/// assert_eq!(intent.mode(), &PaginationMode::Offset { offset: 1 });
/// assert_eq!(intent.limit().map(NonZeroU64::get), Some(2));
/// assert!(intent.is_paginating());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationIntent {
    mode: PaginationMode,
    limit: Option<NonZeroU64>,
}

impl PaginationIntent {
    /// Build an intent from its parts
    #[must_use]
    pub fn new(mode: PaginationMode, limit: Option<NonZeroU64>) -> Self {
        Self { mode, limit }
    }

    /// No pagination
    #[must_use]
    pub fn unpaginated() -> Self {
        Self::new(PaginationMode::Unpaginated, None)
    }

    /// Offset pagination
    #[must_use]
    pub fn offset(offset: u64) -> Self {
        Self::new(PaginationMode::Offset { offset }, None)
    }

    /// Page pagination
    #[must_use]
    pub fn page(index: u64) -> Self {
        Self::new(PaginationMode::Page { index }, None)
    }

    /// Attribute-cursor pagination
    #[must_use]
    pub fn attribute(attribute: impl Into<String>, before: impl Into<String>) -> Self {
        Self::new(
            PaginationMode::Attribute {
                attribute: attribute.into(),
                before: before.into(),
            },
            None,
        )
    }

    /// Attach a limit
    #[must_use]
    pub fn with_limit(mut self, limit: NonZeroU64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The active mode
    #[must_use]
    pub fn mode(&self) -> &PaginationMode {
        &self.mode
    }

    /// The item limit, if any
    #[must_use]
    pub fn limit(&self) -> Option<NonZeroU64> {
        self.limit
    }

    /// Whether any mode other than `Unpaginated` is active
    #[must_use]
    pub fn is_paginating(&self) -> bool {
        !matches!(self.mode, PaginationMode::Unpaginated)
    }
}

impl Default for PaginationIntent {
    fn default() -> Self {
        Self::unpaginated()
    }
}
