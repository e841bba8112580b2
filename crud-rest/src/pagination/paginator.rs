//! Fluent paginator over a repository
//!
//! The paginator records how the window is positioned in its type, so only
//! positioned paginators can run a query, and the query result type follows
//! from the positioning mode:
//!
//! | Builder                                    | Result     |
//! |--------------------------------------------|------------|
//! | `by_offset(n)`                             | [`Slice`]  |
//! | `by_attribute(name).before(value)`         | [`Slice`]  |
//! | `by_page(n)`                               | [`Page`]   |
//!
//! # Example
//!
//! ```rust,ignore
//! use std::num::NonZeroU64;
//! use crud_rest::pagination::Paginator;
//! use crud_rest::repository::SortOption;
//! use crud_rest::specification::Specification;
//!
//! let slice = Paginator::paginate(&repository)
//!     .by_offset(1)
//!     .limit(NonZeroU64::new(2).unwrap())
//!     .matching(&Specification::any(), &SortOption::parse("firstName"))
//!     .await?;
//! ```

use std::num::NonZeroU64;

use super::slice::{Page, Slice};
use super::window::{PageWindow, SliceWindow};
use crate::aggregate::AggregateRoot;
use crate::repository::{Repository, RepositoryResult, SortOption};
use crate::specification::Specification;

/// Not yet positioned
#[derive(Debug, Clone, Copy)]
pub struct Unpositioned;

/// Positioned at an offset
#[derive(Debug, Clone, Copy)]
pub struct ByOffset(u64);

/// Positioned at a page number
#[derive(Debug, Clone, Copy)]
pub struct ByPage(u64);

/// Positioned before a cursor value of one attribute
#[derive(Debug, Clone)]
pub struct ByAttribute {
    attribute: String,
    before: String,
}

/// Paginator builder over a repository
#[derive(Debug)]
pub struct Paginator<'r, R, P = Unpositioned> {
    repository: &'r R,
    position: P,
    limit: Option<NonZeroU64>,
}

/// Intermediate step of `by_attribute(name).before(value)`
#[derive(Debug)]
pub struct AttributeCursor<'r, R> {
    repository: &'r R,
    attribute: String,
    limit: Option<NonZeroU64>,
}

impl<'r, R> Paginator<'r, R, Unpositioned> {
    /// Start paginating over `repository`
    pub fn paginate(repository: &'r R) -> Self {
        Self {
            repository,
            position: Unpositioned,
            limit: None,
        }
    }

    /// Skip `offset` items
    pub fn by_offset(self, offset: u64) -> Paginator<'r, R, ByOffset> {
        self.reposition(ByOffset(offset))
    }

    /// Address page `index` (1-based; 0 is the first page)
    pub fn by_page(self, index: u64) -> Paginator<'r, R, ByPage> {
        self.reposition(ByPage(index))
    }

    /// Key the window on `attribute`; complete with [`AttributeCursor::before`]
    pub fn by_attribute(self, attribute: impl Into<String>) -> AttributeCursor<'r, R> {
        AttributeCursor {
            repository: self.repository,
            attribute: attribute.into(),
            limit: self.limit,
        }
    }

    fn reposition<P>(self, position: P) -> Paginator<'r, R, P> {
        Paginator {
            repository: self.repository,
            position,
            limit: self.limit,
        }
    }
}

impl<'r, R> AttributeCursor<'r, R> {
    /// Select the items strictly before `value`
    pub fn before(self, value: impl Into<String>) -> Paginator<'r, R, ByAttribute> {
        Paginator {
            repository: self.repository,
            position: ByAttribute {
                attribute: self.attribute,
                before: value.into(),
            },
            limit: self.limit,
        }
    }
}

impl<R, P> Paginator<'_, R, P> {
    /// Cap the number of returned items (the page size in page mode)
    #[must_use]
    pub fn limit(mut self, limit: NonZeroU64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The limit bound so far
    pub fn current_limit(&self) -> Option<NonZeroU64> {
        self.limit
    }
}

impl<R> Paginator<'_, R, ByOffset> {
    /// The window this paginator will request
    pub fn window(&self) -> SliceWindow {
        SliceWindow::Offset {
            offset: self.position.0,
            limit: self.limit,
        }
    }

    /// Run the query
    pub async fn matching<A>(
        self,
        spec: &Specification<A>,
        sort: &SortOption,
    ) -> RepositoryResult<Slice<A>>
    where
        A: AggregateRoot,
        R: Repository<A>,
    {
        let window = self.window();
        self.repository.get_slice(spec, sort, &window).await
    }
}

impl<R> Paginator<'_, R, ByAttribute> {
    /// The window this paginator will request
    pub fn window(&self) -> SliceWindow {
        SliceWindow::Before {
            attribute: self.position.attribute.clone(),
            value: self.position.before.clone(),
            limit: self.limit,
        }
    }

    /// Run the query
    pub async fn matching<A>(
        self,
        spec: &Specification<A>,
        sort: &SortOption,
    ) -> RepositoryResult<Slice<A>>
    where
        A: AggregateRoot,
        R: Repository<A>,
    {
        let window = self.window();
        self.repository.get_slice(spec, sort, &window).await
    }
}

impl<R> Paginator<'_, R, ByPage> {
    /// The window this paginator will request
    pub fn window(&self) -> PageWindow {
        PageWindow::new(self.position.0, self.limit)
    }

    /// Run the query
    pub async fn matching<A>(
        self,
        spec: &Specification<A>,
        sort: &SortOption,
    ) -> RepositoryResult<Page<A>>
    where
        A: AggregateRoot,
        R: Repository<A>,
    {
        let window = self.window();
        self.repository.get_page(spec, sort, &window).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nz(n: u64) -> NonZeroU64 {
        NonZeroU64::new(n).unwrap()
    }

    #[test]
    fn test_offset_window() {
        let repository = ();
        let paginator = Paginator::paginate(&repository).by_offset(4).limit(nz(2));
        assert_eq!(
            paginator.window(),
            SliceWindow::Offset {
                offset: 4,
                limit: Some(nz(2)),
            }
        );
    }

    #[test]
    fn test_limit_before_positioning_is_kept() {
        let repository = ();
        let paginator = Paginator::paginate(&repository).limit(nz(3)).by_page(2);
        assert_eq!(paginator.window(), PageWindow::new(2, Some(nz(3))));
    }

    #[test]
    fn test_attribute_window() {
        let repository = ();
        let paginator = Paginator::paginate(&repository)
            .by_attribute("firstName")
            .before("Robert");
        assert_eq!(paginator.current_limit(), None);
        assert_eq!(
            paginator.window(),
            SliceWindow::Before {
                attribute: "firstName".into(),
                value: "Robert".into(),
                limit: None,
            }
        );
    }

    #[test]
    fn test_page_window_without_limit() {
        let repository = ();
        let paginator = Paginator::paginate(&repository).by_page(1);
        assert_eq!(paginator.window().size, None);
    }
}
