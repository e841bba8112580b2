//! Repository contract for aggregate storage
//!
//! The REST layer reaches storage only through the [`Repository`] trait.
//! Queries are described with three pieces:
//!
//! - a [`Specification`](crate::specification::Specification) selecting aggregates
//! - a [`SortOption`] ordering them by named attributes
//! - a window ([`SliceWindow`](crate::pagination::SliceWindow) or
//!   [`PageWindow`](crate::pagination::PageWindow)) built by the paginator
//!
//! Attribute values are exchanged as [`FilterValue`]s so that filtering,
//! sorting and attribute cursors work for any aggregate type.
//!
//! [`InMemoryRepository`](crate::memory::InMemoryRepository) is a complete
//! implementation backed by a vector.

mod error;
mod filter;
mod sort;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use filter::{compare_attributes, FilterCondition, FilterOperator, FilterValue};
pub use sort::{OrderDirection, SortKey, SortOption};
pub use traits::{Repository, RepositoryResult};
