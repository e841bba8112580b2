//! Query windows built by the paginator and executed by repositories

use std::num::NonZeroU64;

/// Window for offset and attribute-cursor queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SliceWindow {
    /// Skip `offset` items, then take up to `limit`
    Offset {
        /// Number of leading items to skip
        offset: u64,
        /// Maximum number of items; `None` takes every remaining item
        limit: Option<NonZeroU64>,
    },
    /// Items strictly before `value` on `attribute`
    Before {
        /// Attribute the cursor is keyed on
        attribute: String,
        /// Raw cursor value, coerced to the attribute's type by the repository
        value: String,
        /// Maximum number of items nearest to the cursor
        limit: Option<NonZeroU64>,
    },
}

impl SliceWindow {
    /// The item cap of this window
    #[must_use]
    pub fn limit(&self) -> Option<NonZeroU64> {
        match self {
            Self::Offset { limit, .. } | Self::Before { limit, .. } => *limit,
        }
    }
}

/// Window for numbered page queries
///
/// Pages are 1-based; page `0` addresses the first page.
///
/// # Example
///
/// ```rust
/// use std::num::NonZeroU64;
/// use crud_rest::pagination::PageWindow;
///
/// let window = PageWindow::new(3, NonZeroU64::new(10));
/// assert_eq!(window.offset(10), 20);
/// assert_eq!(PageWindow::new(0, None).offset(10), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Requested page number
    pub index: u64,
    /// Page size; `None` uses the repository default
    pub size: Option<NonZeroU64>,
}

impl PageWindow {
    /// Create a page window
    #[must_use]
    pub fn new(index: u64, size: Option<NonZeroU64>) -> Self {
        Self { index, size }
    }

    /// Page size, falling back to `default_size`
    #[must_use]
    pub fn size_or(&self, default_size: NonZeroU64) -> NonZeroU64 {
        self.size.unwrap_or(default_size)
    }

    /// Number of items before this page for a given page size
    #[must_use]
    pub fn offset(&self, size: u64) -> u64 {
        self.index.saturating_sub(1).saturating_mul(size)
    }
}
