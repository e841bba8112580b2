//! Mapping between aggregates and their wire representations
//!
//! # Example
//!
//! ```rust
//! use crud_rest::assembler::{Assembler, AssemblerError};
//!
//! #[derive(Debug, Clone)]
//! struct Tag { name: String }
//!
//! struct TagAssembler;
//!
//! impl Assembler<Tag, String> for TagAssembler {
//!     fn assemble(&self, tag: &Tag) -> String {
//!         tag.name.clone()
//!     }
//!
//!     fn create_aggregate(&self, name: String) -> Result<Tag, AssemblerError> {
//!         if name.is_empty() {
//!             return Err(AssemblerError::invalid("name", "must not be empty"));
//!         }
//!         Ok(Tag { name })
//!     }
//! }
//!
//! let assembler = TagAssembler;
//! assert_eq!(assembler.assemble_all(&[Tag { name: "rust".into() }]), vec!["rust"]);
//! ```

use thiserror::Error;

use crate::pagination::{Page, Slice};

/// Errors raised when a representation cannot become an aggregate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblerError {
    /// A field of the representation is unusable
    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        /// Representation field name
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// This assembler cannot build or merge aggregates
    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),
}

impl AssemblerError {
    /// Create an [`AssemblerError::InvalidField`]
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Two-way mapping between aggregate `A` and representation `D`
///
/// Only [`assemble`](Self::assemble) is required. Read-only resources can
/// leave the reverse direction unimplemented; create and update requests then
/// fail with [`AssemblerError::Unsupported`].
pub trait Assembler<A, D>: Send + Sync {
    /// Build the representation of one aggregate
    fn assemble(&self, aggregate: &A) -> D;

    /// Build a new aggregate from a representation
    fn create_aggregate(&self, representation: D) -> Result<A, AssemblerError> {
        let _ = representation;
        Err(AssemblerError::Unsupported("create_aggregate"))
    }

    /// Merge a representation into an existing aggregate
    fn merge_aggregate(&self, representation: D, target: &mut A) -> Result<(), AssemblerError> {
        let _ = (representation, target);
        Err(AssemblerError::Unsupported("merge_aggregate"))
    }

    /// Build representations of many aggregates, keeping their order
    fn assemble_all(&self, aggregates: &[A]) -> Vec<D> {
        aggregates.iter().map(|a| self.assemble(a)).collect()
    }

    /// Build the representation of a slice
    fn assemble_slice(&self, slice: Slice<A>) -> Slice<D> {
        slice.map(|a| self.assemble(&a))
    }

    /// Build the representation of a page
    fn assemble_page(&self, page: Page<A>) -> Page<D> {
        page.map(|a| self.assemble(&a))
    }
}
