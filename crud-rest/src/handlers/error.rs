//! API error types for resource operations
//!
//! Structured errors with automatic HTTP status mapping via `IntoResponse`.
//!
//! # Example
//!
//! ```rust
//! use crud_rest::handlers::{ApiError, ApiErrorKind};
//!
//! let error = ApiError::not_found("Customer", "Robert SMITH");
//! assert!(matches!(error.kind, ApiErrorKind::AggregateNotFound));
//! assert_eq!(error.message, "Customer Robert SMITH not found");
//! ```

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::assembler::AssemblerError;
use crate::pagination::PaginationError;
use crate::repository::{RepositoryError, RepositoryErrorKind, RepositoryOperation};

/// Operation being performed when the API error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// Listing aggregates
    List,
    /// Getting a single aggregate by identifier
    Get,
    /// Creating a new aggregate
    Create,
    /// Updating an existing aggregate
    Update,
    /// Deleting an aggregate
    Delete,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Get => write!(f, "get"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Category of API error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// A query, path or body parameter is invalid
    InvalidParameter,
    /// Pagination parameters given without a pagination mode
    MissingPaginationParameters,
    /// The dispatcher received an intent it cannot serve
    InvalidPaginationState,
    /// No aggregate with the requested identifier
    AggregateNotFound,
    /// An aggregate with the same identifier exists
    AlreadyExists,
    /// The repository is unreachable or timed out
    ServiceUnavailable,
    /// Any other failure
    InternalError,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter => write!(f, "invalid_parameter"),
            Self::MissingPaginationParameters => write!(f, "missing_pagination_parameters"),
            Self::InvalidPaginationState => write!(f, "invalid_pagination_state"),
            Self::AggregateNotFound => write!(f, "aggregate_not_found"),
            Self::AlreadyExists => write!(f, "already_exists"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::InternalError => write!(f, "internal_error"),
        }
    }
}

impl ApiErrorKind {
    /// Get the HTTP status code for this error kind
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidParameter | Self::MissingPaginationParameters => StatusCode::BAD_REQUEST,
            Self::AggregateNotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists => StatusCode::CONFLICT,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::InvalidPaginationState | Self::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error code string for this error kind
    #[must_use]
    pub fn error_code(&self) -> String {
        format!("{}", self).to_uppercase()
    }
}

/// Structured API error with operation context
///
/// # Example
///
/// ```rust
/// use crud_rest::handlers::{ApiError, ApiOperation};
///
/// let error = ApiError::invalid_parameter("limit", "'0' is not a positive integer");
/// assert_eq!(error.operation, ApiOperation::List);
/// assert_eq!(
///     error.to_string(),
///     "API invalid_parameter error during list: Invalid parameter 'limit': '0' is not a positive integer"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The operation being performed when the error occurred
    pub operation: ApiOperation,
    /// The category of error
    pub kind: ApiErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The aggregate type involved (e.g., "Customer")
    pub entity_type: Option<String>,
    /// The identifier of the aggregate involved
    pub entity_id: Option<String>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(operation: ApiOperation, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// `"<Aggregate> <id> not found"`, reported from [`ApiOperation::Get`]
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        let entity_type = entity_type.into();
        let entity_id = entity_id.into();
        Self {
            operation: ApiOperation::Get,
            kind: ApiErrorKind::AggregateNotFound,
            message: format!("{entity_type} {entity_id} not found"),
            entity_type: Some(entity_type),
            entity_id: Some(entity_id),
        }
    }

    /// Duplicate identifier, reported from [`ApiOperation::Create`]
    pub fn already_exists(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        let entity_type = entity_type.into();
        let entity_id = entity_id.into();
        Self {
            operation: ApiOperation::Create,
            kind: ApiErrorKind::AlreadyExists,
            message: format!("{entity_type} {entity_id} already exists"),
            entity_type: Some(entity_type),
            entity_id: Some(entity_id),
        }
    }

    /// Invalid parameter, reported from [`ApiOperation::List`]
    pub fn invalid_parameter(parameter: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            ApiOperation::List,
            ApiErrorKind::InvalidParameter,
            format!("Invalid parameter '{parameter}': {reason}"),
        )
    }

    /// Pagination parameters without a mode
    pub fn missing_pagination_parameters(message: impl Into<String>) -> Self {
        Self::new(
            ApiOperation::List,
            ApiErrorKind::MissingPaginationParameters,
            message,
        )
    }

    /// Intent the dispatcher cannot serve
    pub fn invalid_pagination_state(message: impl Into<String>) -> Self {
        Self::new(
            ApiOperation::List,
            ApiErrorKind::InvalidPaginationState,
            message,
        )
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiOperation::Get, ApiErrorKind::InternalError, message)
    }

    /// Create a service unavailable error
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ApiOperation::Get, ApiErrorKind::ServiceUnavailable, message)
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
    pub fn with_operation(mut self, operation: ApiOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Check if this error is retriable
    pub fn is_retriable(&self) -> bool {
        matches!(self.kind, ApiErrorKind::ServiceUnavailable)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Response body for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Human-readable message
    pub error: String,
    /// Upper-case error code, e.g. `AGGREGATE_NOT_FOUND`
    pub code: String,
    /// HTTP status code
    pub status: u16,
    /// Operation that failed
    pub operation: String,
    /// Aggregate type involved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    /// Aggregate identifier involved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();
        let code = self.kind.error_code();

        if status.is_server_error() {
            tracing::error!(
                operation = %self.operation,
                kind = %self.kind,
                entity_type = ?self.entity_type,
                entity_id = ?self.entity_id,
                retriable = self.is_retriable(),
                "API error: {}", self.message
            );
        } else {
            tracing::warn!(
                operation = %self.operation,
                kind = %self.kind,
                entity_type = ?self.entity_type,
                entity_id = ?self.entity_id,
                "API error: {}", self.message
            );
        }

        let response = ApiErrorResponse {
            error: self.message,
            code,
            status: status.as_u16(),
            operation: self.operation.to_string(),
            entity_type: self.entity_type,
            entity_id: self.entity_id,
        };

        (status, Json(response)).into_response()
    }
}

fn repository_operation_to_api_operation(op: RepositoryOperation) -> ApiOperation {
    match op {
        RepositoryOperation::Get => ApiOperation::Get,
        RepositoryOperation::GetAll
        | RepositoryOperation::GetSlice
        | RepositoryOperation::GetPage
        | RepositoryOperation::Count => ApiOperation::List,
        RepositoryOperation::Add => ApiOperation::Create,
        RepositoryOperation::Update => ApiOperation::Update,
        RepositoryOperation::Remove => ApiOperation::Delete,
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        let operation = repository_operation_to_api_operation(err.operation);

        let kind = match err.kind {
            RepositoryErrorKind::NotFound => ApiErrorKind::AggregateNotFound,
            RepositoryErrorKind::AlreadyExists => ApiErrorKind::AlreadyExists,
            RepositoryErrorKind::ValidationFailed => ApiErrorKind::InvalidParameter,
            RepositoryErrorKind::ConnectionFailed | RepositoryErrorKind::Timeout => {
                ApiErrorKind::ServiceUnavailable
            }
            RepositoryErrorKind::StorageError | RepositoryErrorKind::Other => {
                ApiErrorKind::InternalError
            }
        };

        // Internal details stay in the logs
        let message = match kind {
            ApiErrorKind::ServiceUnavailable => {
                tracing::error!(error = %err, "Repository unavailable");
                "Service temporarily unavailable".to_string()
            }
            ApiErrorKind::InternalError => {
                tracing::error!(error = %err, "Repository failure");
                "An internal error occurred".to_string()
            }
            _ => err.message,
        };

        Self {
            operation,
            kind,
            message,
            entity_type: err.entity_type,
            entity_id: err.entity_id,
        }
    }
}

impl From<PaginationError> for ApiError {
    fn from(err: PaginationError) -> Self {
        match err {
            PaginationError::InvalidParameter { parameter, reason } => {
                Self::invalid_parameter(parameter, reason)
            }
            PaginationError::MissingPaginationParameters(_) => {
                Self::missing_pagination_parameters(err.to_string())
            }
            PaginationError::InvalidPaginationState(_) => {
                Self::invalid_pagination_state(err.to_string())
            }
        }
    }
}

impl From<AssemblerError> for ApiError {
    fn from(err: AssemblerError) -> Self {
        match err {
            AssemblerError::InvalidField { ref field, ref reason } => Self::new(
                ApiOperation::Create,
                ApiErrorKind::InvalidParameter,
                format!("Invalid parameter '{field}': {reason}"),
            ),
            AssemblerError::Unsupported(_) => {
                tracing::error!(error = %err, "Assembler cannot map representation");
                Self::new(
                    ApiOperation::Create,
                    ApiErrorKind::InternalError,
                    "An internal error occurred",
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_api_operation_display() {
        assert_eq!(format!("{}", ApiOperation::List), "list");
        assert_eq!(format!("{}", ApiOperation::Get), "get");
        assert_eq!(format!("{}", ApiOperation::Create), "create");
        assert_eq!(format!("{}", ApiOperation::Update), "update");
        assert_eq!(format!("{}", ApiOperation::Delete), "delete");
    }

    #[test]
    fn test_api_error_kind_status_codes() {
        assert_eq!(
            ApiErrorKind::InvalidParameter.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiErrorKind::MissingPaginationParameters.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiErrorKind::InvalidPaginationState.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiErrorKind::AggregateNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiErrorKind::AlreadyExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiErrorKind::ServiceUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_api_error_kind_error_codes() {
        assert_eq!(ApiErrorKind::AggregateNotFound.error_code(), "AGGREGATE_NOT_FOUND");
        assert_eq!(
            ApiErrorKind::MissingPaginationParameters.error_code(),
            "MISSING_PAGINATION_PARAMETERS"
        );
    }

    #[test]
    fn test_not_found_message() {
        let error = ApiError::not_found("Customer", "Tara JOHNSON");
        assert_eq!(error.operation, ApiOperation::Get);
        assert_eq!(error.message, "Customer Tara JOHNSON not found");
        assert_eq!(error.entity_id.as_deref(), Some("Tara JOHNSON"));
    }

    #[test]
    fn test_with_operation() {
        let error = ApiError::not_found("Customer", "x").with_operation(ApiOperation::Delete);
        assert_eq!(error.operation, ApiOperation::Delete);
    }

    #[test]
    fn test_display_with_entity() {
        let error = ApiError::already_exists("Customer", "Tara JOHNSON");
        assert_eq!(
            error.to_string(),
            "API already_exists error during create: Customer Tara JOHNSON already exists [Customer: Tara JOHNSON]"
        );
    }

    #[test]
    fn test_is_retriable() {
        assert!(ApiError::service_unavailable("down").is_retriable());
        assert!(!ApiError::internal("boom").is_retriable());
    }

    #[test]
    fn test_from_repository_error_not_found() {
        let api: ApiError = RepositoryError::not_found("Customer", "Robert SMITH")
            .with_operation(RepositoryOperation::Update)
            .into();
        assert_eq!(api.kind, ApiErrorKind::AggregateNotFound);
        assert_eq!(api.operation, ApiOperation::Update);
        assert_eq!(api.message, "Customer Robert SMITH not found");
    }

    #[test]
    fn test_from_repository_error_hides_internal_details() {
        let api: ApiError =
            RepositoryError::storage_error(RepositoryOperation::GetPage, "disk /dev/sda1 failed")
                .into();
        assert_eq!(api.kind, ApiErrorKind::InternalError);
        assert_eq!(api.operation, ApiOperation::List);
        assert_eq!(api.message, "An internal error occurred");

        let api: ApiError =
            RepositoryError::timeout(RepositoryOperation::Remove, "lock wait exceeded").into();
        assert_eq!(api.kind, ApiErrorKind::ServiceUnavailable);
        assert_eq!(api.operation, ApiOperation::Delete);
        assert_eq!(api.message, "Service temporarily unavailable");
    }

    #[test]
    fn test_from_pagination_error() {
        let api: ApiError = PaginationError::InvalidParameter {
            parameter: "offset",
            reason: "'x' is not a non-negative integer".into(),
        }
        .into();
        assert_eq!(api.kind, ApiErrorKind::InvalidParameter);
        assert!(api.message.contains("'offset'"));

        let api: ApiError = PaginationError::MissingPaginationParameters("limit".into()).into();
        assert_eq!(api.kind, ApiErrorKind::MissingPaginationParameters);

        let api: ApiError = PaginationError::InvalidPaginationState("unpaginated".into()).into();
        assert_eq!(api.kind.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_from_assembler_error() {
        let api: ApiError = AssemblerError::invalid("age", "must be positive").into();
        assert_eq!(api.kind, ApiErrorKind::InvalidParameter);
        assert_eq!(api.message, "Invalid parameter 'age': must be positive");

        let api: ApiError = AssemblerError::Unsupported("create_aggregate").into();
        assert_eq!(api.kind, ApiErrorKind::InternalError);
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let response = ApiError::not_found("Customer", "Robert SMITH").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Customer Robert SMITH not found");
        assert_eq!(json["code"], "AGGREGATE_NOT_FOUND");
        assert_eq!(json["status"], 404);
        assert_eq!(json["operation"], "get");
        assert_eq!(json["entity_type"], "Customer");
    }

    #[tokio::test]
    async fn test_into_response_omits_missing_entity() {
        let response = ApiError::missing_pagination_parameters("limit needs a mode").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json.get("entity_type").is_none());
        assert!(json.get("entity_id").is_none());
    }
}
