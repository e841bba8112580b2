//! Response types for resource endpoints

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::pagination::{Page, Slice};

/// Result of a list request
///
/// Serializes as a bare JSON array, a slice envelope or a page envelope.
///
/// # Example
///
/// ```rust
/// use crud_rest::handlers::ListResponse;
/// use crud_rest::pagination::Slice;
///
/// let flat = ListResponse::All(vec![1, 2]);
/// assert_eq!(serde_json::to_string(&flat).unwrap(), "[1,2]");
///
/// let slice = ListResponse::Slice(Slice::new(vec![2]));
/// assert_eq!(serde_json::to_string(&slice).unwrap(), r#"{"size":1,"items":[2]}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    /// Every match, no envelope
    All(Vec<T>),
    /// Numbered page with totals
    Page(Page<T>),
    /// Offset or attribute-cursor window
    Slice(Slice<T>),
}

impl<T> ListResponse<T> {
    /// Map every item, keeping the envelope
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListResponse<U> {
        match self {
            Self::All(items) => ListResponse::All(items.into_iter().map(f).collect()),
            Self::Page(page) => ListResponse::Page(page.map(f)),
            Self::Slice(slice) => ListResponse::Slice(slice.map(f)),
        }
    }

    /// The items, whatever the envelope
    pub fn items(&self) -> &[T] {
        match self {
            Self::All(items) => items,
            Self::Page(page) => &page.items,
            Self::Slice(slice) => &slice.items,
        }
    }
}

impl<T: Serialize> IntoResponse for ListResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// HTTP 201 Created with an optional `Location` header
#[derive(Debug)]
pub struct Created<T> {
    data: T,
    location: Option<String>,
}

impl<T> Created<T> {
    /// Create a new 201 Created response
    pub fn new(data: T) -> Self {
        Self {
            data,
            location: None,
        }
    }

    /// Add a Location header pointing to the created aggregate
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// The Location header value, if set
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::CREATED, Json(&self.data)).into_response();

        if let Some(location) = self.location {
            if let Ok(header_value) = HeaderValue::from_str(&location) {
                response.headers_mut().insert(header::LOCATION, header_value);
            }
        }

        response
    }
}

/// HTTP 204 No Content
#[derive(Debug, Clone, Copy)]
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> Response {
        StatusCode::NO_CONTENT.into_response()
    }
}

/// Location of an aggregate under a collection path
///
/// The identifier is percent-encoded as a single path segment and a trailing
/// slash on the collection path is dropped.
///
/// # Example
///
/// ```rust
/// use crud_rest::handlers::location_of;
///
/// assert_eq!(location_of("/customers/", "Tara JOHNSON"), "/customers/Tara%20JOHNSON");
/// ```
pub fn location_of(collection_path: &str, id: &str) -> String {
    format!(
        "{}/{}",
        collection_path.trim_end_matches('/'),
        urlencoding::encode(id)
    )
}
