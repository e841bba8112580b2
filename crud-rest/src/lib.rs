//! # crud-rest
//!
//! Generic REST exposure of aggregate repositories with pagination.
//!
//! ## Features
//!
//! - **Resources**: expose any [`AggregateRoot`](aggregate::AggregateRoot) as
//!   `GET`/`POST`/`PUT`/`DELETE` endpoints by implementing a few traits
//! - **Pagination**: unpaginated, offset, page and attribute-cursor listing,
//!   resolved from query parameters
//! - **Repositories**: RPITIT repository trait plus an in-memory implementation
//! - **Middleware stack**: request tracking, panic recovery, body size limits,
//!   compression, CORS, timeouts
//! - **Configuration**: Figment layering of defaults, TOML files and `CRUD_`
//!   environment variables
//! - **Graceful shutdown**: SIGTERM and SIGINT handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use crud_rest::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let customers = Customers {
//!         repository: InMemoryRepository::new()
//!             .with_default_page_size(config.pagination.default_page_size),
//!         assembler: CustomerAssembler,
//!     };
//!
//!     let app = Router::new().nest(
//!         &config.resource.path_for("customers"),
//!         crud_router(Arc::new(customers)),
//!     );
//!
//!     Server::new(config).serve(app).await
//! }
//! ```
//!
//! `GET /customers?page=1&limit=2` then answers
//!
//! ```json
//! {"size":2,"index":1,"maxSize":2,"totalSize":3,"items":[...]}
//! ```

pub mod aggregate;
pub mod assembler;
pub mod config;
pub mod error;
pub mod handlers;
pub mod ids;
pub mod memory;
pub mod middleware;
pub mod observability;
pub mod pagination;
pub mod repository;
pub mod server;
pub mod specification;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::aggregate::{aggregate_name, parse_id, AggregateRoot};
    pub use crate::assembler::{Assembler, AssemblerError};
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::handlers::{
        crud_router, location_of, read_router, ApiError, ApiErrorKind, ApiJson, ApiOperation,
        ApiQuery, CreateResource, Created, DeleteResource, ListResponse, NoContent, ReadResource,
        Resource, ResourceId, UpdateResource,
    };
    pub use crate::ids::{MakeTypedRequestId, RequestId, RequestIdError};
    pub use crate::memory::{InMemoryRepository, DEFAULT_PAGE_SIZE};
    pub use crate::observability::init_tracing;
    pub use crate::pagination::{
        Page, PageWindow, PaginationError, PaginationIntent, PaginationMode, PaginationParams,
        Paginator, Slice, SliceWindow,
    };
    pub use crate::repository::{
        FilterCondition, FilterOperator, FilterValue, OrderDirection, Repository,
        RepositoryError, RepositoryErrorKind, RepositoryOperation, RepositoryResult, SortKey,
        SortOption,
    };
    pub use crate::server::Server;
    pub use crate::specification::Specification;

    // Re-export axum for convenience
    pub use axum::{
        routing::{delete, get, patch, post, put},
        Json, Router,
    };
}
