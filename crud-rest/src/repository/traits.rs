//! Repository trait definition
//!
//! Async methods use RPITIT (Return Position Impl Trait In Traits), so
//! implementations can be written with plain `async fn` and no `async_trait`.
//!
//! # Example
//!
//! ```rust,ignore
//! use crud_rest::repository::{Repository, RepositoryResult, SortOption};
//! use crud_rest::pagination::{Page, PageWindow, Slice, SliceWindow};
//! use crud_rest::specification::Specification;
//!
//! struct CustomerRepository {
//!     pool: PgPool,
//! }
//!
//! impl Repository<Customer> for CustomerRepository {
//!     async fn get(&self, id: &CustomerId) -> RepositoryResult<Option<Customer>> {
//!         // SELECT ... WHERE first_name = $1 AND last_name = $2
//!         todo!()
//!     }
//!
//!     async fn get_page(
//!         &self,
//!         spec: &Specification<Customer>,
//!         sort: &SortOption,
//!         window: &PageWindow,
//!     ) -> RepositoryResult<Page<Customer>> {
//!         // SELECT ... ORDER BY ... LIMIT size OFFSET (index - 1) * size
//!         todo!()
//!     }
//!     // ... other methods
//! }
//! ```

use std::future::Future;

use super::error::RepositoryError;
use super::sort::SortOption;
use crate::aggregate::AggregateRoot;
use crate::pagination::{Page, PageWindow, Slice, SliceWindow};
use crate::specification::Specification;

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Storage access for one aggregate type
///
/// Every query method receives the [`Specification`] to filter by and the
/// [`SortOption`] to order by. Windowed queries also receive the window the
/// paginator built:
///
/// - [`SliceWindow::Offset`] skips `offset` items, then returns up to `limit`
///   items, or every remaining item without a limit.
/// - [`SliceWindow::Before`] returns the items strictly before a cursor value
///   of one attribute, in the declared direction of that attribute. With a
///   limit, the items nearest to the cursor are kept.
/// - [`PageWindow`] returns the 1-based page `index` of `size` items, using the
///   repository's default page size when no size is given.
pub trait Repository<A: AggregateRoot>: Send + Sync {
    /// Load one aggregate; `Ok(None)` when absent
    fn get(&self, id: &A::Id) -> impl Future<Output = RepositoryResult<Option<A>>> + Send;

    /// Load every matching aggregate in sort order
    fn get_all(
        &self,
        spec: &Specification<A>,
        sort: &SortOption,
    ) -> impl Future<Output = RepositoryResult<Vec<A>>> + Send;

    /// Load an offset or attribute-cursor window
    fn get_slice(
        &self,
        spec: &Specification<A>,
        sort: &SortOption,
        window: &SliceWindow,
    ) -> impl Future<Output = RepositoryResult<Slice<A>>> + Send;

    /// Load a numbered page along with the total match count
    fn get_page(
        &self,
        spec: &Specification<A>,
        sort: &SortOption,
        window: &PageWindow,
    ) -> impl Future<Output = RepositoryResult<Page<A>>> + Send;

    /// Count matching aggregates
    fn count(&self, spec: &Specification<A>) -> impl Future<Output = RepositoryResult<u64>> + Send;

    /// Check whether an aggregate with this identifier exists
    fn contains(&self, id: &A::Id) -> impl Future<Output = RepositoryResult<bool>> + Send {
        async move { Ok(self.get(id).await?.is_some()) }
    }

    /// Store a new aggregate
    ///
    /// Fails with `AlreadyExists` when the identifier is taken.
    fn add(&self, aggregate: A) -> impl Future<Output = RepositoryResult<()>> + Send;

    /// Replace a stored aggregate with the same identifier
    ///
    /// Fails with `NotFound` when no such aggregate is stored.
    fn update(&self, aggregate: A) -> impl Future<Output = RepositoryResult<()>> + Send;

    /// Remove an aggregate; `Ok(false)` when it was not stored
    fn remove(&self, id: &A::Id) -> impl Future<Output = RepositoryResult<bool>> + Send;
}
