//! REST exposure of aggregates
//!
//! This module turns a repository and an assembler into HTTP endpoints. It
//! builds on the repository and pagination modules to provide HTTP-aware error
//! handling and response types.
//!
//! # Features
//!
//! - **Resources**: [`Resource`] plus opt-in [`ReadResource`], [`CreateResource`],
//!   [`UpdateResource`] and [`DeleteResource`] capabilities
//! - **Dispatch**: [`dispatch::list`] picks unpaginated, offset, page or
//!   attribute-cursor retrieval from a [`PaginationIntent`](crate::pagination::PaginationIntent)
//! - **Routing**: [`read_router`] and [`crud_router`] mount the endpoints
//! - **Error Handling**: [`ApiError`] with automatic HTTP status code mapping,
//!   also used for rejected query strings and bodies ([`ApiQuery`], [`ApiJson`])
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use axum::Router;
//! use crud_rest::handlers::crud_router;
//!
//! let app = Router::new().nest("/customers", crud_router(Arc::new(customers)));
//! ```
//!
//! `GET /customers?offset=1&limit=2` then returns
//!
//! ```json
//! {"size": 2, "items": [{"firstName": "Michael"}, {"firstName": "Robert"}]}
//! ```

pub mod dispatch;
mod error;
mod extract;
mod response;
mod router;
mod traits;

pub use error::{ApiError, ApiErrorKind, ApiErrorResponse, ApiOperation};
pub use extract::{ApiJson, ApiQuery};
pub use response::{location_of, Created, ListResponse, NoContent};
pub use router::{crud_router, read_router};
pub use traits::{
    CreateResource, DeleteResource, ReadResource, Resource, ResourceId, UpdateResource,
};
