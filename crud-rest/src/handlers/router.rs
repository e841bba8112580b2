//! Axum routers exposing a resource
//!
//! [`read_router`] serves the two GET endpoints; [`crud_router`] adds POST,
//! PUT and DELETE. Both expect to be nested under the collection path:
//!
//! ```rust,ignore
//! let app = Router::new().nest("/customers", crud_router(Arc::new(customers)));
//! ```
//!
//! | Method | Path    | Handler                       |
//! |--------|---------|-------------------------------|
//! | GET    | `/`     | [`ReadResource::list`]        |
//! | GET    | `/{id}` | [`ReadResource::get`]         |
//! | POST   | `/`     | [`CreateResource::create`]    |
//! | PUT    | `/{id}` | [`UpdateResource::update`]    |
//! | DELETE | `/{id}` | [`DeleteResource::delete`]    |

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    routing::get,
    Json, Router,
};

use super::error::{ApiError, ApiOperation};
use super::extract::{ApiJson, ApiQuery};
use super::response::{location_of, Created, ListResponse, NoContent};
use super::traits::{
    CreateResource, DeleteResource, ReadResource, Resource, ResourceId, UpdateResource,
};
use crate::aggregate::parse_id;
use crate::pagination::PaginationParams;

/// Router with the read endpoints of a resource
pub fn read_router<R: ReadResource>(resource: Arc<R>) -> Router {
    Router::new()
        .route("/", get(list::<R>))
        .route("/{id}", get(get_one::<R>))
        .with_state(resource)
}

/// Router with the read and write endpoints of a resource
pub fn crud_router<R>(resource: Arc<R>) -> Router
where
    R: ReadResource + CreateResource + UpdateResource + DeleteResource,
{
    Router::new()
        .route("/", get(list::<R>).post(create::<R>))
        .route(
            "/{id}",
            get(get_one::<R>).put(update::<R>).delete(remove::<R>),
        )
        .with_state(resource)
}

async fn list<R: ReadResource>(
    State(resource): State<Arc<R>>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> Result<ListResponse<R::Representation>, ApiError> {
    let intent = params.resolve()?;
    tracing::debug!(
        aggregate = resource.aggregate_name(),
        mode = %intent.mode(),
        "List requested"
    );
    resource.list(intent, params.sort_option()).await
}

async fn get_one<R: ReadResource>(
    State(resource): State<Arc<R>>,
    Path(raw): Path<String>,
) -> Result<Json<R::Representation>, ApiError> {
    let id = path_id(resource.as_ref(), &raw, ApiOperation::Get)?;
    Ok(Json(resource.get(id).await?))
}

async fn create<R: CreateResource>(
    State(resource): State<Arc<R>>,
    OriginalUri(uri): OriginalUri,
    ApiJson(representation): ApiJson<R::Representation>,
) -> Result<Created<R::Representation>, ApiError> {
    let (id, body) = resource.create(representation).await?;
    Ok(Created::new(body).with_location(location_of(uri.path(), &id.to_string())))
}

async fn update<R: UpdateResource>(
    State(resource): State<Arc<R>>,
    Path(raw): Path<String>,
    ApiJson(representation): ApiJson<R::Representation>,
) -> Result<Json<R::Representation>, ApiError> {
    let id = path_id(resource.as_ref(), &raw, ApiOperation::Update)?;
    Ok(Json(resource.update(id, representation).await?))
}

async fn remove<R: DeleteResource>(
    State(resource): State<Arc<R>>,
    Path(raw): Path<String>,
) -> Result<NoContent, ApiError> {
    let id = path_id(resource.as_ref(), &raw, ApiOperation::Delete)?;
    resource.delete(id).await?;
    Ok(NoContent)
}

/// A path segment that does not parse names no aggregate, so it is a 404
fn path_id<R: Resource>(
    resource: &R,
    raw: &str,
    operation: ApiOperation,
) -> Result<ResourceId<R>, ApiError> {
    parse_id::<R::Aggregate>(raw).ok_or_else(|| {
        ApiError::not_found(resource.aggregate_name(), raw).with_operation(operation)
    })
}
