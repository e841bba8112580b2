//! Extractors whose rejections are [`ApiError`]s
//!
//! axum's own `Query` and `Json` reject with plain-text bodies. These wrappers
//! keep every client error in the JSON error format.

use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{request::Parts, Method},
    Json,
};
use serde::de::DeserializeOwned;

use super::error::{ApiError, ApiOperation};

/// Query string extractor for list requests
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_parameter("query", e.body_text()))?;
        Ok(Self(value))
    }
}

/// JSON body extractor for representations
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let operation = if req.method() == Method::PUT {
            ApiOperation::Update
        } else {
            ApiOperation::Create
        };
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            ApiError::invalid_parameter("body", e.body_text()).with_operation(operation)
        })?;
        Ok(Self(value))
    }
}
