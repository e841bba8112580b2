//! Pagination for list endpoints
//!
//! A list request carries at most one pagination mode:
//!
//! - **offset**: `?offset=10&limit=5` returns a [`Slice`]
//! - **page**: `?page=2&limit=5` returns a [`Page`] with total counts
//! - **attribute cursor**: `?attribute=firstName&value=Robert&limit=5` returns
//!   a [`Slice`] of the items strictly before `Robert`
//! - **none**: no parameters returns a flat list
//!
//! [`PaginationParams::resolve`] turns the raw query into a
//! [`PaginationIntent`]. The [`Paginator`] builder turns an intent into a
//! [`SliceWindow`] or [`PageWindow`] and runs it against a repository.

mod intent;
mod paginator;
mod params;
mod slice;
mod window;

pub use intent::{PaginationError, PaginationIntent, PaginationMode};
pub use paginator::{AttributeCursor, ByAttribute, ByOffset, ByPage, Paginator, Unpositioned};
pub use params::PaginationParams;
pub use slice::{Page, Slice};
pub use window::{PageWindow, SliceWindow};
