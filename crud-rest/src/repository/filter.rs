//! Attribute values and filter conditions evaluated against aggregates
//!
//! Aggregates expose their state to the repository layer as named
//! [`FilterValue`]s. Those values drive filtering ([`FilterCondition`]),
//! sorting and attribute cursors, so they carry their own comparison and
//! coercion rules.
//!
//! # Example
//!
//! ```rust
//! use crud_rest::repository::{FilterCondition, FilterValue};
//!
//! let adults = FilterCondition::gte("age", 18);
//! assert!(adults.matches(Some(&FilterValue::Integer(42))));
//! assert!(!adults.matches(None));
//! ```

use std::cmp::Ordering;
use std::fmt;

/// Comparison operator for filter conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Equal to (=)
    Equal,
    /// Not equal to (!=)
    NotEqual,
    /// Greater than (>)
    GreaterThan,
    /// Greater than or equal to (>=)
    GreaterThanOrEqual,
    /// Less than (<)
    LessThan,
    /// Less than or equal to (<=)
    LessThanOrEqual,
    /// Pattern matching with `%` and `_` wildcards (LIKE)
    Like,
    /// Value is in a list (IN)
    In,
    /// Value is missing or null
    IsNull,
    /// Value is present and not null
    IsNotNull,
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "="),
            Self::NotEqual => write!(f, "!="),
            Self::GreaterThan => write!(f, ">"),
            Self::GreaterThanOrEqual => write!(f, ">="),
            Self::LessThan => write!(f, "<"),
            Self::LessThanOrEqual => write!(f, "<="),
            Self::Like => write!(f, "LIKE"),
            Self::In => write!(f, "IN"),
            Self::IsNull => write!(f, "IS NULL"),
            Self::IsNotNull => write!(f, "IS NOT NULL"),
        }
    }
}

/// A typed attribute value
///
/// # Example
///
/// ```rust
/// use crud_rest::repository::FilterValue;
///
/// let name: FilterValue = "Jeanne".into();
/// let age: FilterValue = 42_i64.into();
/// assert_eq!(age.coerce("17"), Some(FilterValue::Integer(17)));
/// assert_eq!(name.coerce("Michael"), Some(FilterValue::from("Michael")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// String value
    String(String),
    /// 64-bit integer value
    Integer(i64),
    /// 64-bit floating point value
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// List of string values (for IN operator)
    StringList(Vec<String>),
    /// List of integer values (for IN operator)
    IntegerList(Vec<i64>),
    /// Null value
    Null,
}

impl FilterValue {
    /// Compare two scalar values
    ///
    /// Returns `None` when the values have no common ordering: mismatched
    /// types, lists, nulls and NaN floats. Integers and floats compare
    /// numerically with each other.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => {
                (!a.is_nan() && !b.is_nan()).then(|| compare_floats(*a, *b))
            }
            (Self::Integer(a), Self::Float(b)) => {
                (!b.is_nan()).then(|| compare_integer_float(*a, *b))
            }
            (Self::Float(a), Self::Integer(b)) => {
                (!a.is_nan()).then(|| compare_integer_float(*b, *a).reverse())
            }
            (Self::Boolean(a), Self::Boolean(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Total order over all values, used for sorting
    ///
    /// Agrees with [`compare`](Self::compare) wherever that returns an
    /// ordering. NaN sorts after every other number. Values of different
    /// types rank by type: booleans, numbers, strings, string lists, integer
    /// lists, null.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::StringList(a), Self::StringList(b)) => a.cmp(b),
            (Self::IntegerList(a), Self::IntegerList(b)) => a.cmp(b),
            _ => self.compare(other).unwrap_or_else(|| {
                self.type_rank()
                    .cmp(&other.type_rank())
                    .then_with(|| self.is_nan().cmp(&other.is_nan()))
            }),
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            Self::Boolean(_) => 0,
            Self::Integer(_) | Self::Float(_) => 1,
            Self::String(_) => 2,
            Self::StringList(_) => 3,
            Self::IntegerList(_) => 4,
            Self::Null => 5,
        }
    }

    fn is_nan(&self) -> bool {
        matches!(self, Self::Float(n) if n.is_nan())
    }

    /// Parse a raw token into a value of the same type as `self`
    ///
    /// Used to interpret query-string tokens (cursor positions) against the
    /// type an attribute actually has. Returns `None` when the token does not
    /// parse, or when `self` is not a scalar.
    #[must_use]
    pub fn coerce(&self, raw: &str) -> Option<Self> {
        match self {
            Self::String(_) => Some(Self::String(raw.to_string())),
            Self::Integer(_) => raw.trim().parse().ok().map(Self::Integer),
            Self::Float(_) => raw.trim().parse().ok().map(Self::Float),
            Self::Boolean(_) => raw.trim().parse().ok().map(Self::Boolean),
            Self::StringList(_) | Self::IntegerList(_) | Self::Null => None,
        }
    }

    /// Whether this value is [`FilterValue::Null`]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::StringList(list) => write!(f, "[{}]", list.join(", ")),
            Self::IntegerList(list) => {
                let items: Vec<String> = list.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Self::Null => write!(f, "null"),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for FilterValue {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<u32> for FilterValue {
    fn from(n: u32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(list: Vec<String>) -> Self {
        Self::StringList(list)
    }
}

impl From<Vec<i64>> for FilterValue {
    fn from(list: Vec<i64>) -> Self {
        Self::IntegerList(list)
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Order two optional attribute values for sorting
///
/// Missing and null values sort first. Present values follow
/// [`FilterValue::total_cmp`].
#[must_use]
pub fn compare_attributes(a: Option<&FilterValue>, b: Option<&FilterValue>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.total_cmp(b),
    }
}

// Neither argument is NaN. Adding zero folds -0.0 into 0.0.
fn compare_floats(a: f64, b: f64) -> Ordering {
    (a + 0.0).total_cmp(&(b + 0.0))
}

// Exact comparison; `b` is not NaN. Casting `b` to i64 or `a` to f64 would
// round above 2^53 and break transitivity.
fn compare_integer_float(a: i64, b: f64) -> Ordering {
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
    if b >= TWO_POW_63 {
        return Ordering::Less;
    }
    if b < -TWO_POW_63 {
        return Ordering::Greater;
    }
    let whole = b.trunc();
    a.cmp(&(whole as i64))
        .then_with(|| compare_floats(0.0, b - whole))
}

/// A single filter condition on a named attribute
///
/// # Example
///
/// ```rust
/// use crud_rest::repository::{FilterCondition, FilterValue};
///
/// let smiths = FilterCondition::like("lastName", "SM%");
/// assert!(smiths.matches(Some(&FilterValue::from("SMITH"))));
///
/// let unset = FilterCondition::is_null("nickname");
/// assert!(unset.matches(None));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    /// The attribute name to filter on
    pub field: String,
    /// The comparison operator
    pub operator: FilterOperator,
    /// The value to compare against
    pub value: FilterValue,
}

impl FilterCondition {
    /// Create a new filter condition
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Create an equality filter
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::Equal, value.into())
    }

    /// Create a not-equal filter
    pub fn ne(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::NotEqual, value.into())
    }

    /// Create a greater-than filter
    pub fn gt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::GreaterThan, value.into())
    }

    /// Create a greater-than-or-equal filter
    pub fn gte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::GreaterThanOrEqual, value.into())
    }

    /// Create a less-than filter
    pub fn lt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::LessThan, value.into())
    }

    /// Create a less-than-or-equal filter
    pub fn lte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::LessThanOrEqual, value.into())
    }

    /// Create a pattern filter (`%` matches any run, `_` matches one character)
    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::Like, FilterValue::String(pattern.into()))
    }

    /// Create an IN filter over strings
    pub fn in_strings(field: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(field, FilterOperator::In, FilterValue::StringList(values))
    }

    /// Create an IN filter over integers
    pub fn in_integers(field: impl Into<String>, values: Vec<i64>) -> Self {
        Self::new(field, FilterOperator::In, FilterValue::IntegerList(values))
    }

    /// Create an IS NULL filter
    pub fn is_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::IsNull, FilterValue::Null)
    }

    /// Create an IS NOT NULL filter
    pub fn is_not_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::IsNotNull, FilterValue::Null)
    }

    /// Evaluate the condition against an attribute value
    ///
    /// `actual` is `None` when the aggregate does not expose the attribute.
    /// Only `IsNull` and `NotEqual` can match a missing value.
    #[must_use]
    pub fn matches(&self, actual: Option<&FilterValue>) -> bool {
        let actual = actual.filter(|v| !v.is_null());
        match self.operator {
            FilterOperator::IsNull => actual.is_none(),
            FilterOperator::IsNotNull => actual.is_some(),
            FilterOperator::Equal => {
                actual.and_then(|v| v.compare(&self.value)) == Some(Ordering::Equal)
            }
            FilterOperator::NotEqual => {
                actual.and_then(|v| v.compare(&self.value)) != Some(Ordering::Equal)
            }
            FilterOperator::GreaterThan => self.ordered(actual, |o| o == Ordering::Greater),
            FilterOperator::GreaterThanOrEqual => self.ordered(actual, |o| o != Ordering::Less),
            FilterOperator::LessThan => self.ordered(actual, |o| o == Ordering::Less),
            FilterOperator::LessThanOrEqual => self.ordered(actual, |o| o != Ordering::Greater),
            FilterOperator::Like => match (actual, &self.value) {
                (Some(FilterValue::String(s)), FilterValue::String(pattern)) => {
                    like_match(pattern, s)
                }
                _ => false,
            },
            FilterOperator::In => match (actual, &self.value) {
                (Some(FilterValue::String(s)), FilterValue::StringList(list)) => list.contains(s),
                (Some(FilterValue::Integer(n)), FilterValue::IntegerList(list)) => list.contains(n),
                _ => false,
            },
        }
    }

    fn ordered(&self, actual: Option<&FilterValue>, accept: impl Fn(Ordering) -> bool) -> bool {
        actual
            .and_then(|v| v.compare(&self.value))
            .is_some_and(accept)
    }
}

impl fmt::Display for FilterCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator {
            FilterOperator::IsNull | FilterOperator::IsNotNull => {
                write!(f, "{} {}", self.field, self.operator)
            }
            _ => write!(f, "{} {} {}", self.field, self.operator, self.value),
        }
    }
}

// Greedy matching that backtracks only to the last `%`.
fn like_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    let mut last_star: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p).copied() {
            Some('%') => {
                last_star = Some((p, t));
                p += 1;
            }
            Some(c) if c == '_' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match last_star {
                Some((star, matched)) => {
                    p = star + 1;
                    t = matched + 1;
                    last_star = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '%')
}
