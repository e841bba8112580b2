//! Sort options forwarded from the `sort` query parameter to the repository
//!
//! # Example
//!
//! ```rust
//! use crud_rest::repository::{OrderDirection, SortOption};
//!
//! let sort = SortOption::parse("lastName,-age");
//! assert_eq!(sort.direction_of("age"), Some(OrderDirection::Descending));
//! assert_eq!(sort.to_string(), "lastName,-age");
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::aggregate::AggregateRoot;
use crate::repository::filter::compare_attributes;

/// Direction for ordering results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Sort in ascending order (A-Z, 0-9)
    #[default]
    Ascending,
    /// Sort in descending order (Z-A, 9-0)
    Descending,
}

impl OrderDirection {
    /// Apply this direction to an ascending ordering
    #[must_use]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// One `(attribute, direction)` entry of a [`SortOption`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Attribute name
    pub attribute: String,
    /// Sort direction
    pub direction: OrderDirection,
}

/// Ordered list of sort keys
///
/// An empty option means "repository order", which for the in-memory
/// repository is insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortOption {
    keys: Vec<SortKey>,
}

impl SortOption {
    /// No sorting
    #[must_use]
    pub fn unsorted() -> Self {
        Self::default()
    }

    /// Start a sort option with a single key
    #[must_use]
    pub fn by(attribute: impl Into<String>, direction: OrderDirection) -> Self {
        Self::unsorted().then(attribute, direction)
    }

    /// Append a key
    #[must_use]
    pub fn then(mut self, attribute: impl Into<String>, direction: OrderDirection) -> Self {
        self.keys.push(SortKey {
            attribute: attribute.into(),
            direction,
        });
        self
    }

    /// Parse a comma-separated list of attributes
    ///
    /// A leading `-` sorts descending, a leading `+` (or none) ascending.
    /// Blank entries are skipped; parsing never fails.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let keys = raw
            .split(',')
            .map(str::trim)
            .filter_map(|entry| {
                let (direction, name) = match entry.strip_prefix('-') {
                    Some(name) => (OrderDirection::Descending, name),
                    None => (
                        OrderDirection::Ascending,
                        entry.strip_prefix('+').unwrap_or(entry),
                    ),
                };
                let name = name.trim();
                (!name.is_empty()).then(|| SortKey {
                    attribute: name.to_string(),
                    direction,
                })
            })
            .collect();
        Self { keys }
    }

    /// The sort keys in priority order
    #[must_use]
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Whether no key is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Direction declared for `attribute`, if it is part of this option
    #[must_use]
    pub fn direction_of(&self, attribute: &str) -> Option<OrderDirection> {
        self.keys
            .iter()
            .find(|key| key.attribute == attribute)
            .map(|key| key.direction)
    }

    /// This option with `attribute` appended as an ascending tie-breaker,
    /// unless it is already present
    #[must_use]
    pub fn with_tie_breaker(&self, attribute: &str) -> Self {
        if self.direction_of(attribute).is_some() {
            self.clone()
        } else {
            self.clone().then(attribute, OrderDirection::Ascending)
        }
    }

    /// Compare two aggregates key by key
    pub fn compare<A: AggregateRoot>(&self, a: &A, b: &A) -> Ordering {
        self.keys
            .iter()
            .map(|key| {
                let ordering = compare_attributes(
                    a.attribute(&key.attribute).as_ref(),
                    b.attribute(&key.attribute).as_ref(),
                );
                key.direction.apply(ordering)
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            if key.direction == OrderDirection::Descending {
                write!(f, "-")?;
            }
            write!(f, "{}", key.attribute)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::FilterValue;

    #[derive(Debug, Clone)]
    struct Row {
        id: u32,
        group: &'static str,
        score: Option<i64>,
    }

    impl AggregateRoot for Row {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.id
        }

        fn attribute(&self, name: &str) -> Option<FilterValue> {
            match name {
                "id" => Some(self.id.into()),
                "group" => Some(self.group.into()),
                "score" => self.score.map(FilterValue::Integer),
                _ => None,
            }
        }
    }

    #[test]
    fn test_order_direction_display() {
        assert_eq!(format!("{}", OrderDirection::Ascending), "asc");
        assert_eq!(format!("{}", OrderDirection::Descending), "desc");
        assert_eq!(OrderDirection::default(), OrderDirection::Ascending);
    }

    #[test]
    fn test_parse_prefixes() {
        let sort = SortOption::parse("+a, -b ,c");
        let keys = sort.keys();
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[0].attribute, "a");
        assert_eq!(keys[0].direction, OrderDirection::Ascending);
        assert_eq!(keys[1].attribute, "b");
        assert_eq!(keys[1].direction, OrderDirection::Descending);
        assert_eq!(keys[2].direction, OrderDirection::Ascending);
    }

    #[test]
    fn test_parse_skips_blank_entries() {
        assert!(SortOption::parse("").is_empty());
        assert!(SortOption::parse(" , - ,+").is_empty());
        assert_eq!(SortOption::parse("a,,b").keys().len(), 2);
    }

    #[test]
    fn test_display_round_trips_parse() {
        let sort = SortOption::by("group", OrderDirection::Ascending)
            .then("score", OrderDirection::Descending);
        assert_eq!(sort.to_string(), "group,-score");
        assert_eq!(SortOption::parse(&sort.to_string()), sort);
    }

    #[test]
    fn test_with_tie_breaker() {
        let sort = SortOption::by("group", OrderDirection::Descending);
        let extended = sort.with_tie_breaker("id");
        assert_eq!(extended.to_string(), "-group,id");
        assert_eq!(extended.with_tie_breaker("group"), extended);
    }

    #[test]
    fn test_compare_uses_keys_in_order() {
        let a = Row { id: 1, group: "x", score: Some(10) };
        let b = Row { id: 2, group: "x", score: Some(20) };
        let c = Row { id: 3, group: "w", score: None };

        let sort = SortOption::by("group", OrderDirection::Ascending)
            .then("score", OrderDirection::Descending);
        assert_eq!(sort.compare(&a, &b), Ordering::Greater);
        assert_eq!(sort.compare(&c, &a), Ordering::Less);
        assert_eq!(SortOption::unsorted().compare(&a, &c), Ordering::Equal);
    }

    #[test]
    fn test_compare_missing_values_sort_first() {
        let with = Row { id: 1, group: "x", score: Some(1) };
        let without = Row { id: 2, group: "x", score: None };
        let sort = SortOption::parse("score");
        assert_eq!(sort.compare(&without, &with), Ordering::Less);
        assert_eq!(SortOption::parse("unknown").compare(&with, &without), Ordering::Equal);
    }
}
