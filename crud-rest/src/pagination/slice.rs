//! Slice and page envelopes for paginated results
//!
//! Serialized with camelCase field names:
//!
//! ```json
//! {"size":2,"items":[...]}
//! {"size":2,"index":1,"maxSize":2,"totalSize":3,"items":[...]}
//! ```

use serde::{Deserialize, Serialize};

/// Ordered window of items from an offset or attribute-cursor query
///
/// # Example
///
/// ```rust
/// use crud_rest::pagination::Slice;
///
/// let slice = Slice::new(vec!["Michael", "Robert"]);
/// assert_eq!(slice.size, 2);
/// assert_eq!(
///     serde_json::to_string(&slice).unwrap(),
///     r#"{"size":2,"items":["Michael","Robert"]}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slice<T> {
    /// Number of items returned
    pub size: u64,
    /// The items, in sort order
    pub items: Vec<T>,
}

impl<T> Slice<T> {
    /// Wrap items, computing `size`
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self {
            size: items.len() as u64,
            items,
        }
    }

    /// Empty slice
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Map every item, keeping the envelope
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Slice<U> {
        Slice::new(self.items.into_iter().map(f).collect())
    }

    /// Whether the slice holds no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Unwrap the items
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// One numbered page of items plus paging metadata
///
/// # Example
///
/// ```rust
/// use crud_rest::pagination::Page;
///
/// let page = Page::new(vec!["Jeanne", "Michael"], 1, 2, 3);
/// assert_eq!(page.total_pages(), 2);
/// assert!(page.has_next());
/// assert_eq!(
///     serde_json::to_string(&page).unwrap(),
///     r#"{"size":2,"index":1,"maxSize":2,"totalSize":3,"items":["Jeanne","Michael"]}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Number of items on this page
    pub size: u64,
    /// The requested page number (1-based)
    pub index: u64,
    /// Page size used for the query
    pub max_size: u64,
    /// Number of matching items across all pages
    pub total_size: u64,
    /// The items, in sort order
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Wrap items with their paging metadata, computing `size`
    #[must_use]
    pub fn new(items: Vec<T>, index: u64, max_size: u64, total_size: u64) -> Self {
        Self {
            size: items.len() as u64,
            index,
            max_size,
            total_size,
            items,
        }
    }

    /// Map every item, keeping the metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page::new(
            self.items.into_iter().map(f).collect(),
            self.index,
            self.max_size,
            self.total_size,
        )
    }

    /// Number of pages needed for `total_size` items
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.max_size == 0 {
            0
        } else {
            self.total_size.div_ceil(self.max_size)
        }
    }

    /// Whether a later page has items
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.index.max(1) < self.total_pages()
    }

    /// Whether an earlier page exists
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.index > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_size_tracks_items() {
        let slice = Slice::new(vec![1, 2, 3]);
        assert_eq!(slice.size, 3);
        assert!(!slice.is_empty());
        assert!(Slice::<u8>::empty().is_empty());
    }

    #[test]
    fn test_slice_map() {
        let slice = Slice::new(vec![1, 2]).map(|n| n * 10);
        assert_eq!(slice.into_items(), vec![10, 20]);
    }

    #[test]
    fn test_page_map_keeps_metadata() {
        let page = Page::new(vec![1, 2], 3, 2, 9).map(|n| n.to_string());
        assert_eq!(page.index, 3);
        assert_eq!(page.max_size, 2);
        assert_eq!(page.total_size, 9);
        assert_eq!(page.items, vec!["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn test_page_navigation() {
        let last = Page::new(vec![5], 3, 2, 5);
        assert_eq!(last.total_pages(), 3);
        assert!(!last.has_next());
        assert!(last.has_previous());

        let first = Page::new(vec![1, 2], 1, 2, 5);
        assert!(first.has_next());
        assert!(!first.has_previous());

        assert_eq!(Page::<u8>::new(vec![], 1, 0, 0).total_pages(), 0);
    }

    #[test]
    fn test_page_deserialize_camel_case() {
        let page: Page<String> = serde_json::from_str(
            r#"{"size":1,"index":2,"maxSize":1,"totalSize":3,"items":["Michael"]}"#,
        )
        .unwrap();
        assert_eq!(page.index, 2);
        assert_eq!(page.total_size, 3);
        assert_eq!(page.items, vec!["Michael".to_string()]);
    }
}
