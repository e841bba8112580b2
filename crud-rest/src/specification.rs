//! Composable predicates over aggregates
//!
//! A [`Specification`] is handed to the repository together with the
//! pagination window; the repository decides how to evaluate it. In-memory
//! repositories call [`Specification::is_satisfied_by`] directly.
//!
//! # Example
//!
//! ```rust
//! use crud_rest::repository::FilterCondition;
//! use crud_rest::specification::Specification;
//! # use crud_rest::aggregate::AggregateRoot;
//! # use crud_rest::repository::FilterValue;
//! # #[derive(Debug, Clone)]
//! # struct Person { name: String, age: i64 }
//! # impl AggregateRoot for Person {
//! #     type Id = String;
//! #     fn id(&self) -> &String { &self.name }
//! #     fn attribute(&self, name: &str) -> Option<FilterValue> {
//! #         match name {
//! #             "name" => Some(self.name.as_str().into()),
//! #             "age" => Some(self.age.into()),
//! #             _ => None,
//! #         }
//! #     }
//! # }
//!
//! let adults: Specification<Person> = Specification::condition(FilterCondition::gte("age", 18));
//! let not_bob = Specification::predicate(|p: &Person| p.name != "Bob");
//! let spec = adults.and(not_bob);
//!
//! assert!(spec.is_satisfied_by(&Person { name: "Alice".into(), age: 30 }));
//! assert!(!spec.is_satisfied_by(&Person { name: "Bob".into(), age: 30 }));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::aggregate::AggregateRoot;
use crate::repository::FilterCondition;

/// Predicate closure wrapped by [`Specification::Predicate`]
pub type PredicateFn<A> = Arc<dyn Fn(&A) -> bool + Send + Sync>;

/// A filter over aggregates of type `A`
pub enum Specification<A> {
    /// Matches every aggregate
    Any,
    /// Matches no aggregate
    None,
    /// Matches when the named attribute satisfies the condition
    Condition(FilterCondition),
    /// Matches when every child matches
    And(Vec<Specification<A>>),
    /// Matches when at least one child matches
    Or(Vec<Specification<A>>),
    /// Inverts the child
    Not(Box<Specification<A>>),
    /// Opaque closure, evaluated only in memory
    Predicate(PredicateFn<A>),
}

impl<A> Specification<A> {
    /// Match everything
    #[must_use]
    pub fn any() -> Self {
        Self::Any
    }

    /// Match nothing
    #[must_use]
    pub fn none() -> Self {
        Self::None
    }

    /// Match on an attribute condition
    #[must_use]
    pub fn condition(condition: FilterCondition) -> Self {
        Self::Condition(condition)
    }

    /// Match with a closure
    pub fn predicate(f: impl Fn(&A) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(f))
    }

    /// Conjunction, flattening nested `And`s
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::Any, other) | (other, Self::Any) => other,
            (Self::And(mut left), Self::And(right)) => {
                left.extend(right);
                Self::And(left)
            }
            (Self::And(mut left), other) => {
                left.push(other);
                Self::And(left)
            }
            (this, other) => Self::And(vec![this, other]),
        }
    }

    /// Disjunction, flattening nested `Or`s
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::None, other) | (other, Self::None) => other,
            (Self::Or(mut left), Self::Or(right)) => {
                left.extend(right);
                Self::Or(left)
            }
            (Self::Or(mut left), other) => {
                left.push(other);
                Self::Or(left)
            }
            (this, other) => Self::Or(vec![this, other]),
        }
    }

    /// Negation
    #[must_use]
    pub fn negate(self) -> Self {
        match self {
            Self::Any => Self::None,
            Self::None => Self::Any,
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }

    /// Whether this specification matches everything
    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl<A: AggregateRoot> Specification<A> {
    /// Evaluate against one aggregate
    pub fn is_satisfied_by(&self, aggregate: &A) -> bool {
        match self {
            Self::Any => true,
            Self::None => false,
            Self::Condition(condition) => {
                condition.matches(aggregate.attribute(&condition.field).as_ref())
            }
            Self::And(children) => children.iter().all(|s| s.is_satisfied_by(aggregate)),
            Self::Or(children) => children.iter().any(|s| s.is_satisfied_by(aggregate)),
            Self::Not(inner) => !inner.is_satisfied_by(aggregate),
            Self::Predicate(f) => f(aggregate),
        }
    }
}

impl<A> Default for Specification<A> {
    fn default() -> Self {
        Self::Any
    }
}

impl<A> Clone for Specification<A> {
    fn clone(&self) -> Self {
        match self {
            Self::Any => Self::Any,
            Self::None => Self::None,
            Self::Condition(c) => Self::Condition(c.clone()),
            Self::And(children) => Self::And(children.clone()),
            Self::Or(children) => Self::Or(children.clone()),
            Self::Not(inner) => Self::Not(inner.clone()),
            Self::Predicate(f) => Self::Predicate(Arc::clone(f)),
        }
    }
}

impl<A> fmt::Debug for Specification<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "Any"),
            Self::None => write!(f, "None"),
            Self::Condition(c) => f.debug_tuple("Condition").field(c).finish(),
            Self::And(children) => f.debug_tuple("And").field(children).finish(),
            Self::Or(children) => f.debug_tuple("Or").field(children).finish(),
            Self::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
            Self::Predicate(_) => write!(f, "Predicate(<fn>)"),
        }
    }
}

impl<A> From<FilterCondition> for Specification<A> {
    fn from(condition: FilterCondition) -> Self {
        Self::Condition(condition)
    }
}
