//! List and get dispatch over a repository
//!
//! The dispatcher is read-only: it picks a retrieval strategy for a
//! [`PaginationIntent`], runs it, and hands the aggregates back. Assembly into
//! representations happens in the resource.

use std::fmt::Display;

use tracing::Instrument;

use super::error::{ApiError, ApiOperation};
use super::response::ListResponse;
use crate::aggregate::AggregateRoot;
use crate::pagination::{PaginationIntent, PaginationMode, Paginator};
use crate::repository::{Repository, SortOption};
use crate::specification::Specification;

/// Bind the intent's limit to a paginator, if it has one
///
/// Without a limit the paginator is returned unchanged and the repository
/// applies its default window.
pub fn apply_limit<'r, R, P>(
    intent: &PaginationIntent,
    paginator: Paginator<'r, R, P>,
) -> Paginator<'r, R, P> {
    match intent.limit() {
        Some(limit) => paginator.limit(limit),
        None => paginator,
    }
}

/// Run a list request
///
/// | Intent                    | Repository call     | Result                   |
/// |---------------------------|---------------------|--------------------------|
/// | unpaginated, no limit     | `get_all`           | [`ListResponse::All`]    |
/// | attribute cursor          | `get_slice(Before)` | [`ListResponse::Slice`]  |
/// | offset                    | `get_slice(Offset)` | [`ListResponse::Slice`]  |
/// | page                      | `get_page`          | [`ListResponse::Page`]   |
///
/// # Errors
///
/// - `InvalidPaginationState` for an unpaginated intent carrying a limit
/// - repository failures, converted to [`ApiError`]
pub async fn list<A, R>(
    repository: &R,
    intent: &PaginationIntent,
    spec: &Specification<A>,
    sort: &SortOption,
) -> Result<ListResponse<A>, ApiError>
where
    A: AggregateRoot,
    R: Repository<A>,
{
    let span = tracing::debug_span!(
        "dispatch_list",
        aggregate = crate::aggregate::aggregate_name::<A>(),
        mode = %intent.mode(),
        limit = intent.limit().map(|l| l.get()),
        sort = %sort,
    );

    async move {
        let paginator = Paginator::paginate(repository);
        let listing = match (intent.mode(), intent.limit()) {
            (PaginationMode::Unpaginated, None) => {
                ListResponse::All(repository.get_all(spec, sort).await?)
            }
            (PaginationMode::Unpaginated, Some(limit)) => {
                return Err(ApiError::invalid_pagination_state(format!(
                    "Unpaginated listing cannot carry a limit ({limit})"
                )));
            }
            (PaginationMode::Attribute { attribute, before }, _) => {
                let cursor = paginator
                    .by_attribute(attribute.as_str())
                    .before(before.as_str());
                let paginator = apply_limit(intent, cursor);
                ListResponse::Slice(paginator.matching(spec, sort).await?)
            }
            (PaginationMode::Offset { offset }, _) => {
                let paginator = apply_limit(intent, paginator.by_offset(*offset));
                ListResponse::Slice(paginator.matching(spec, sort).await?)
            }
            (PaginationMode::Page { index }, _) => {
                let paginator = apply_limit(intent, paginator.by_page(*index));
                ListResponse::Page(paginator.matching(spec, sort).await?)
            }
        };
        tracing::debug!(returned = listing.items().len(), "List dispatched");
        Ok(listing)
    }
    .instrument(span)
    .await
}

/// Load one aggregate
///
/// # Errors
///
/// - `AggregateNotFound` with message `"<aggregate_name> <id> not found"`
/// - repository failures, converted to [`ApiError`]
pub async fn get<A, R>(repository: &R, id: &A::Id, aggregate_name: &str) -> Result<A, ApiError>
where
    A: AggregateRoot,
    R: Repository<A>,
{
    repository
        .get(id)
        .await
        .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Get))?
        .ok_or_else(|| not_found(aggregate_name, id))
}

pub(crate) fn not_found(aggregate_name: &str, id: &impl Display) -> ApiError {
    ApiError::not_found(aggregate_name, id.to_string())
}
