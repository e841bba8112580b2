//! In-memory repository
//!
//! Keeps aggregates in insertion order behind an async `RwLock`. Every query
//! works on a point-in-time snapshot: filter, stable sort, then cut the
//! window.
//!
//! # Example
//!
//! ```rust,ignore
//! use crud_rest::memory::InMemoryRepository;
//!
//! let repository = InMemoryRepository::with_aggregates(customers)
//!     .with_default_page_size(NonZeroU64::new(50).unwrap());
//! ```

use std::cmp::Ordering;
use std::num::NonZeroU64;

use tokio::sync::RwLock;

use crate::aggregate::{aggregate_name, AggregateRoot};
use crate::pagination::{Page, PageWindow, Slice, SliceWindow};
use crate::repository::{
    OrderDirection, Repository, RepositoryError, RepositoryOperation, RepositoryResult,
    SortOption,
};
use crate::specification::Specification;

/// Page size used when a page request carries no limit
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Vector-backed [`Repository`]
#[derive(Debug)]
pub struct InMemoryRepository<A> {
    aggregates: RwLock<Vec<A>>,
    default_page_size: NonZeroU64,
}

impl<A: AggregateRoot> InMemoryRepository<A> {
    /// Empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::with_aggregates(Vec::new())
    }

    /// Repository seeded with `aggregates`, kept in the given order
    pub fn with_aggregates(aggregates: impl IntoIterator<Item = A>) -> Self {
        Self {
            aggregates: RwLock::new(aggregates.into_iter().collect()),
            default_page_size: NonZeroU64::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroU64::MIN),
        }
    }

    /// Override the page size used by page requests without a limit
    #[must_use]
    pub fn with_default_page_size(mut self, size: NonZeroU64) -> Self {
        self.default_page_size = size;
        self
    }

    /// The page size used by page requests without a limit
    pub fn default_page_size(&self) -> NonZeroU64 {
        self.default_page_size
    }

    /// Number of stored aggregates
    pub async fn len(&self) -> usize {
        self.aggregates.read().await.len()
    }

    /// Whether nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.aggregates.read().await.is_empty()
    }

    /// Remove every aggregate
    pub async fn clear(&self) {
        self.aggregates.write().await.clear();
    }

    async fn select(&self, spec: &Specification<A>, sort: &SortOption) -> Vec<A> {
        let mut selected: Vec<A> = self
            .aggregates
            .read()
            .await
            .iter()
            .filter(|a| spec.is_satisfied_by(a))
            .cloned()
            .collect();
        if !sort.is_empty() {
            selected.sort_by(|a, b| sort.compare(a, b));
        }
        selected
    }

    async fn before_cursor(
        &self,
        spec: &Specification<A>,
        sort: &SortOption,
        attribute: &str,
        value: &str,
        limit: Option<NonZeroU64>,
    ) -> Vec<A> {
        let direction = sort.direction_of(attribute).unwrap_or_default();
        let wanted = match direction {
            OrderDirection::Ascending => Ordering::Less,
            OrderDirection::Descending => Ordering::Greater,
        };

        let mut items: Vec<A> = self
            .select(spec, &sort.with_tie_breaker(attribute))
            .await
            .into_iter()
            .filter(|aggregate| {
                aggregate
                    .attribute(attribute)
                    .and_then(|actual| {
                        let cursor = actual.coerce(value)?;
                        actual.compare(&cursor)
                    })
                    == Some(wanted)
            })
            .collect();

        if let Some(limit) = limit {
            let keep = usize::try_from(limit.get()).unwrap_or(usize::MAX);
            let skip = items.len().saturating_sub(keep);
            items.drain(..skip);
        }
        items
    }
}

impl<A: AggregateRoot> Default for InMemoryRepository<A> {
    fn default() -> Self {
        Self::new()
    }
}

fn window_of<A>(items: Vec<A>, skip: u64, take: Option<u64>) -> Vec<A> {
    let skip = usize::try_from(skip).unwrap_or(usize::MAX);
    let take = take.map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX));
    items.into_iter().skip(skip).take(take).collect()
}

impl<A: AggregateRoot> Repository<A> for InMemoryRepository<A> {
    async fn get(&self, id: &A::Id) -> RepositoryResult<Option<A>> {
        Ok(self
            .aggregates
            .read()
            .await
            .iter()
            .find(|a| a.id() == id)
            .cloned())
    }

    async fn get_all(&self, spec: &Specification<A>, sort: &SortOption) -> RepositoryResult<Vec<A>> {
        Ok(self.select(spec, sort).await)
    }

    async fn get_slice(
        &self,
        spec: &Specification<A>,
        sort: &SortOption,
        window: &SliceWindow,
    ) -> RepositoryResult<Slice<A>> {
        let items = match window {
            SliceWindow::Offset { offset, limit } => window_of(
                self.select(spec, sort).await,
                *offset,
                limit.map(NonZeroU64::get),
            ),
            SliceWindow::Before {
                attribute,
                value,
                limit,
            } => {
                self.before_cursor(spec, sort, attribute, value, *limit)
                    .await
            }
        };
        Ok(Slice::new(items))
    }

    async fn get_page(
        &self,
        spec: &Specification<A>,
        sort: &SortOption,
        window: &PageWindow,
    ) -> RepositoryResult<Page<A>> {
        let size = window.size_or(self.default_page_size).get();
        let matching = self.select(spec, sort).await;
        let total = matching.len() as u64;
        let items = window_of(matching, window.offset(size), Some(size));
        Ok(Page::new(items, window.index, size, total))
    }

    async fn count(&self, spec: &Specification<A>) -> RepositoryResult<u64> {
        let aggregates = self.aggregates.read().await;
        Ok(aggregates.iter().filter(|a| spec.is_satisfied_by(a)).count() as u64)
    }

    async fn add(&self, aggregate: A) -> RepositoryResult<()> {
        let mut aggregates = self.aggregates.write().await;
        if aggregates.iter().any(|a| a.id() == aggregate.id()) {
            return Err(RepositoryError::already_exists(
                aggregate_name::<A>(),
                aggregate.id().to_string(),
            ));
        }
        aggregates.push(aggregate);
        Ok(())
    }

    async fn update(&self, aggregate: A) -> RepositoryResult<()> {
        let mut aggregates = self.aggregates.write().await;
        match aggregates.iter_mut().find(|a| a.id() == aggregate.id()) {
            Some(slot) => {
                *slot = aggregate;
                Ok(())
            }
            None => Err(RepositoryError::not_found(
                aggregate_name::<A>(),
                aggregate.id().to_string(),
            )
            .with_operation(RepositoryOperation::Update)),
        }
    }

    async fn remove(&self, id: &A::Id) -> RepositoryResult<bool> {
        let mut aggregates = self.aggregates.write().await;
        let before = aggregates.len();
        aggregates.retain(|a| a.id() != id);
        Ok(aggregates.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{FilterCondition, FilterValue, RepositoryErrorKind};

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        name: String,
        age: Option<i64>,
    }

    impl AggregateRoot for Person {
        type Id = String;

        fn id(&self) -> &String {
            &self.name
        }

        fn attribute(&self, name: &str) -> Option<FilterValue> {
            match name {
                "name" => Some(self.name.as_str().into()),
                "age" => self.age.map(FilterValue::Integer),
                _ => None,
            }
        }
    }

    fn person(name: &str, age: i64) -> Person {
        Person {
            name: name.to_string(),
            age: Some(age),
        }
    }

    fn names(items: &[Person]) -> Vec<&str> {
        items.iter().map(|p| p.name.as_str()).collect()
    }

    fn nz(n: u64) -> NonZeroU64 {
        NonZeroU64::new(n).unwrap()
    }

    fn repository() -> InMemoryRepository<Person> {
        InMemoryRepository::with_aggregates(vec![
            person("Robert", 40),
            person("Jeanne", 25),
            person("Michael", 31),
            Person {
                name: "Zoe".to_string(),
                age: None,
            },
        ])
    }

    #[tokio::test]
    async fn test_get_all_keeps_insertion_order_without_sort() {
        let repo = repository();
        let all = repo.get_all(&Specification::any(), &SortOption::unsorted()).await.unwrap();
        assert_eq!(names(&all), vec!["Robert", "Jeanne", "Michael", "Zoe"]);
    }

    #[tokio::test]
    async fn test_get_all_filters_and_sorts() {
        let repo = repository();
        let spec = Specification::condition(FilterCondition::gte("age", 30));
        let all = repo.get_all(&spec, &SortOption::parse("-age")).await.unwrap();
        assert_eq!(names(&all), vec!["Robert", "Michael"]);
    }

    #[tokio::test]
    async fn test_offset_window() {
        let repo = repository();
        let sort = SortOption::parse("name");
        let window = SliceWindow::Offset { offset: 1, limit: Some(nz(2)) };
        let slice = repo.get_slice(&Specification::any(), &sort, &window).await.unwrap();
        assert_eq!(slice.size, 2);
        assert_eq!(names(&slice.items), vec!["Michael", "Robert"]);
    }

    #[tokio::test]
    async fn test_offset_past_end_is_empty() {
        let repo = repository();
        let window = SliceWindow::Offset { offset: 10, limit: None };
        let slice = repo
            .get_slice(&Specification::any(), &SortOption::unsorted(), &window)
            .await
            .unwrap();
        assert!(slice.is_empty());
        assert_eq!(slice.size, 0);
    }

    #[tokio::test]
    async fn test_offset_without_limit_returns_remaining() {
        let repo = repository();
        let window = SliceWindow::Offset { offset: 1, limit: None };
        let slice = repo
            .get_slice(&Specification::any(), &SortOption::unsorted(), &window)
            .await
            .unwrap();
        assert_eq!(slice.size, 3);
    }

    #[tokio::test]
    async fn test_page_window() {
        let repo = repository();
        let sort = SortOption::parse("name");
        let page = repo
            .get_page(&Specification::any(), &sort, &PageWindow::new(2, Some(nz(3))))
            .await
            .unwrap();
        assert_eq!(page.index, 2);
        assert_eq!(page.max_size, 3);
        assert_eq!(page.total_size, 4);
        assert_eq!(names(&page.items), vec!["Zoe"]);
    }

    #[tokio::test]
    async fn test_page_zero_is_first_page() {
        let repo = repository();
        let page = repo
            .get_page(&Specification::any(), &SortOption::unsorted(), &PageWindow::new(0, Some(nz(2))))
            .await
            .unwrap();
        assert_eq!(page.index, 0);
        assert_eq!(names(&page.items), vec!["Robert", "Jeanne"]);
    }

    #[tokio::test]
    async fn test_page_uses_default_size() {
        let repo = repository().with_default_page_size(nz(3));
        let page = repo
            .get_page(&Specification::any(), &SortOption::unsorted(), &PageWindow::new(1, None))
            .await
            .unwrap();
        assert_eq!(page.max_size, 3);
        assert_eq!(page.size, 3);
        assert_eq!(repository().default_page_size().get(), DEFAULT_PAGE_SIZE);
    }

    #[tokio::test]
    async fn test_before_cursor_ascending() {
        let repo = repository();
        let window = SliceWindow::Before {
            attribute: "name".into(),
            value: "Robert".into(),
            limit: None,
        };
        let slice = repo
            .get_slice(&Specification::any(), &SortOption::unsorted(), &window)
            .await
            .unwrap();
        assert_eq!(names(&slice.items), vec!["Jeanne", "Michael"]);
    }

    #[tokio::test]
    async fn test_before_cursor_keeps_nearest_with_limit() {
        let repo = repository();
        let window = SliceWindow::Before {
            attribute: "name".into(),
            value: "Zoe".into(),
            limit: Some(nz(2)),
        };
        let slice = repo
            .get_slice(&Specification::any(), &SortOption::unsorted(), &window)
            .await
            .unwrap();
        assert_eq!(names(&slice.items), vec!["Michael", "Robert"]);
    }

    #[tokio::test]
    async fn test_before_cursor_descending() {
        let repo = repository();
        let window = SliceWindow::Before {
            attribute: "age".into(),
            value: "30".into(),
            limit: None,
        };
        let slice = repo
            .get_slice(&Specification::any(), &SortOption::parse("-age"), &window)
            .await
            .unwrap();
        assert_eq!(names(&slice.items), vec!["Robert", "Michael"]);
    }

    #[tokio::test]
    async fn test_before_cursor_excludes_missing_and_uncoercible() {
        let repo = repository();
        let window = SliceWindow::Before {
            attribute: "age".into(),
            value: "100".into(),
            limit: None,
        };
        let slice = repo
            .get_slice(&Specification::any(), &SortOption::unsorted(), &window)
            .await
            .unwrap();
        assert_eq!(names(&slice.items), vec!["Jeanne", "Michael", "Robert"]);

        let window = SliceWindow::Before {
            attribute: "age".into(),
            value: "old".into(),
            limit: None,
        };
        let slice = repo
            .get_slice(&Specification::any(), &SortOption::unsorted(), &window)
            .await
            .unwrap();
        assert!(slice.is_empty());
    }

    #[derive(Debug, Clone)]
    struct Reading {
        id: u32,
        value: f64,
    }

    impl AggregateRoot for Reading {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.id
        }

        fn attribute(&self, name: &str) -> Option<FilterValue> {
            (name == "value").then_some(FilterValue::Float(self.value))
        }
    }

    #[tokio::test]
    async fn test_sort_with_nan_values_is_ordered() {
        let readings = (0..200_u32).map(|id| Reading {
            id,
            value: if id % 3 == 0 {
                f64::NAN
            } else {
                f64::from((id * 7919) % 211) - 100.0
            },
        });
        let repo = InMemoryRepository::with_aggregates(readings);

        let all = repo
            .get_all(&Specification::any(), &SortOption::parse("value"))
            .await
            .unwrap();
        assert_eq!(all.len(), 200);

        let (numbers, nans): (Vec<f64>, Vec<f64>) =
            all.iter().map(|r| r.value).partition(|v| !v.is_nan());
        assert_eq!(nans.len(), 67);
        assert!(numbers.windows(2).all(|w| w[0] <= w[1]));
        assert!(all[..numbers.len()].iter().all(|r| !r.value.is_nan()));

        let window = SliceWindow::Offset { offset: 10, limit: Some(nz(5)) };
        let slice = repo
            .get_slice(&Specification::any(), &SortOption::parse("value"), &window)
            .await
            .unwrap();
        let expected: Vec<f64> = numbers[10..15].to_vec();
        assert_eq!(slice.items.iter().map(|r| r.value).collect::<Vec<_>>(), expected);
    }

    #[tokio::test]
    async fn test_count() {
        let repo = repository();
        assert_eq!(repo.count(&Specification::any()).await.unwrap(), 4);
        let spec = Specification::condition(FilterCondition::is_null("age"));
        assert_eq!(repo.count(&spec).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_add_rejects_duplicates() {
        let repo = repository();
        repo.add(person("Tara", 22)).await.unwrap();
        assert_eq!(repo.len().await, 5);

        let err = repo.add(person("Tara", 23)).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::AlreadyExists);
        assert_eq!(err.entity_type.as_deref(), Some("Person"));
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() {
        let repo = repository();
        repo.update(person("Jeanne", 26)).await.unwrap();
        let jeanne = repo.get(&"Jeanne".to_string()).await.unwrap().unwrap();
        assert_eq!(jeanne.age, Some(26));

        let all = repo.get_all(&Specification::any(), &SortOption::unsorted()).await.unwrap();
        assert_eq!(names(&all)[1], "Jeanne");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = repository();
        let err = repo.update(person("Nobody", 1)).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::NotFound);
        assert_eq!(err.operation, RepositoryOperation::Update);
    }

    #[tokio::test]
    async fn test_remove() {
        let repo = repository();
        assert!(repo.remove(&"Robert".to_string()).await.unwrap());
        assert!(!repo.remove(&"Robert".to_string()).await.unwrap());
        assert!(repo.get(&"Robert".to_string()).await.unwrap().is_none());
        repo.clear().await;
        assert!(repo.is_empty().await);
    }
}
