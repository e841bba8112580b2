//! Aggregate root contract
//!
//! An aggregate is the unit the REST layer exposes. It is defined by the
//! application; this crate only needs its identifier and a way to read named
//! attributes for sorting, filtering and attribute cursors.
//!
//! # Example
//!
//! ```rust
//! use crud_rest::aggregate::AggregateRoot;
//! use crud_rest::repository::FilterValue;
//!
//! #[derive(Debug, Clone)]
//! struct Product {
//!     sku: String,
//!     price: i64,
//! }
//!
//! impl AggregateRoot for Product {
//!     type Id = String;
//!
//!     fn id(&self) -> &String {
//!         &self.sku
//!     }
//!
//!     fn attribute(&self, name: &str) -> Option<FilterValue> {
//!         match name {
//!             "sku" => Some(self.sku.as_str().into()),
//!             "price" => Some(self.price.into()),
//!             _ => None,
//!         }
//!     }
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use crate::repository::FilterValue;

/// Entity exposed through the REST layer
pub trait AggregateRoot: Clone + Send + Sync + 'static {
    /// Identifier bound from a single path segment and printed in diagnostics
    type Id: Clone + Eq + fmt::Display + FromStr + Send + Sync + 'static;

    /// The aggregate's identifier
    fn id(&self) -> &Self::Id;

    /// Read a named attribute
    ///
    /// Returns `None` when the aggregate has no attribute with that name.
    /// Such aggregates sort first and never satisfy an attribute cursor.
    fn attribute(&self, name: &str) -> Option<FilterValue>;
}

/// Short type name of an aggregate, used in messages and error context
///
/// Module paths and generic arguments are stripped, so
/// `app::domain::Customer` becomes `Customer`.
#[must_use]
pub fn aggregate_name<A: ?Sized>() -> &'static str {
    let full = std::any::type_name::<A>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Parse a raw path segment into an aggregate identifier
///
/// Returns `None` when the segment is not a valid identifier.
pub fn parse_id<A: AggregateRoot>(raw: &str) -> Option<A::Id> {
    raw.parse().ok()
}
