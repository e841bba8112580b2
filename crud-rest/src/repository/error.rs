//! Repository error types
//!
//! Structured errors for repository operations, carrying the operation that
//! failed, a category, and the aggregate involved.
//!
//! # Example
//!
//! ```rust
//! use crud_rest::repository::{RepositoryError, RepositoryErrorKind};
//!
//! let error = RepositoryError::not_found("Customer", "Robert SMITH");
//! assert!(matches!(error.kind, RepositoryErrorKind::NotFound));
//! assert!(error.entity_id.is_some());
//! ```

use std::fmt;

/// Operation being performed when the repository error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    /// Loading a single aggregate by identifier
    Get,
    /// Loading every matching aggregate
    GetAll,
    /// Loading an offset or attribute window
    GetSlice,
    /// Loading a numbered page
    GetPage,
    /// Counting matching aggregates
    Count,
    /// Adding a new aggregate
    Add,
    /// Replacing an existing aggregate
    Update,
    /// Removing an aggregate
    Remove,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::GetAll => write!(f, "get_all"),
            Self::GetSlice => write!(f, "get_slice"),
            Self::GetPage => write!(f, "get_page"),
            Self::Count => write!(f, "count"),
            Self::Add => write!(f, "add"),
            Self::Update => write!(f, "update"),
            Self::Remove => write!(f, "remove"),
        }
    }
}

/// Category of repository error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// Aggregate was not found
    NotFound,
    /// Aggregate already exists (duplicate identifier)
    AlreadyExists,
    /// The request could not be executed as given
    ValidationFailed,
    /// Failed to reach the backing store
    ConnectionFailed,
    /// Operation timed out
    Timeout,
    /// Underlying storage error
    StorageError,
    /// Other unclassified error
    Other,
}

impl fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::AlreadyExists => write!(f, "already_exists"),
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::StorageError => write!(f, "storage_error"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured repository error with operation context
///
/// # Example
///
/// ```rust
/// use crud_rest::repository::{RepositoryError, RepositoryOperation};
///
/// let error = RepositoryError::timeout(RepositoryOperation::GetPage, "query timed out after 30s");
/// assert!(error.is_retriable());
/// assert_eq!(
///     error.to_string(),
///     "Repository timeout error during get_page: query timed out after 30s"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    /// The operation being performed when the error occurred
    pub operation: RepositoryOperation,
    /// The category of error
    pub kind: RepositoryErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The aggregate type involved (e.g., "Customer")
    pub entity_type: Option<String>,
    /// The identifier of the aggregate involved
    pub entity_id: Option<String>,
}

impl RepositoryError {
    /// Create a new repository error
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// Aggregate missing, reported from [`RepositoryOperation::Get`]
    ///
    /// Use [`with_operation`](Self::with_operation) when raised elsewhere.
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        let entity_type = entity_type.into();
        let entity_id = entity_id.into();
        Self {
            operation: RepositoryOperation::Get,
            kind: RepositoryErrorKind::NotFound,
            message: format!("{entity_type} {entity_id} not found"),
            entity_type: Some(entity_type),
            entity_id: Some(entity_id),
        }
    }

    /// Duplicate identifier on [`RepositoryOperation::Add`]
    pub fn already_exists(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        let entity_type = entity_type.into();
        let entity_id = entity_id.into();
        Self {
            operation: RepositoryOperation::Add,
            kind: RepositoryErrorKind::AlreadyExists,
            message: format!("{entity_type} {entity_id} already exists"),
            entity_type: Some(entity_type),
            entity_id: Some(entity_id),
        }
    }

    /// Create a validation failed error
    pub fn validation_failed(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::ValidationFailed, message)
    }

    /// Create a connection failed error
    pub fn connection_failed(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::ConnectionFailed, message)
    }

    /// Create a timeout error
    pub fn timeout(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::Timeout, message)
    }

    /// Create a storage error
    pub fn storage_error(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::StorageError, message)
    }

    /// Add aggregate context to an existing error
    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: RepositoryOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Transient errors that may succeed on retry
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            RepositoryErrorKind::ConnectionFailed | RepositoryErrorKind::Timeout
        )
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Repository {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for RepositoryError {}
