//! Query parameters of list requests and their resolution into an intent
//!
//! # Example
//!
//! ```rust
//! use crud_rest::pagination::{PaginationMode, PaginationParams};
//!
//! let params = PaginationParams::default()
//!     .with_offset("1")
//!     .with_limit("2")
//!     .with_sort("firstName");
//!
//! let intent = params.resolve().unwrap();
//! assert_eq!(intent.mode(), &PaginationMode::Offset { offset: 1 });
//! assert_eq!(params.sort_option().to_string(), "firstName");
//! ```

use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

use super::intent::{PaginationError, PaginationIntent, PaginationMode};
use crate::repository::SortOption;

/// Raw list query parameters
///
/// Every field is kept as a string so that malformed numbers surface as
/// [`PaginationError::InvalidParameter`] naming the parameter, rather than a
/// generic query rejection. Empty and whitespace-only values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Number of leading items to skip
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,

    /// Page number (1-based)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,

    /// Attribute the cursor is keyed on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,

    /// Cursor value for `attribute`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Maximum number of items (page size in page mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,

    /// Comma-separated sort keys, `-` prefix for descending
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl PaginationParams {
    /// Set `offset`
    #[must_use]
    pub fn with_offset(mut self, offset: impl Into<String>) -> Self {
        self.offset = Some(offset.into());
        self
    }

    /// Set `page`
    #[must_use]
    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    /// Set `attribute` and its cursor `value`
    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self.value = Some(value.into());
        self
    }

    /// Set `limit`
    #[must_use]
    pub fn with_limit(mut self, limit: impl Into<String>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    /// Set `sort`
    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Resolve the parameters into a single pagination intent
    ///
    /// `attribute` wins over `offset`, which wins over `page`; the
    /// discriminators that lose are ignored and logged at debug level.
    ///
    /// # Errors
    ///
    /// - [`PaginationError::InvalidParameter`] for a non-numeric `offset` or
    ///   `page`, a `limit` that is not a positive integer, or an `attribute`
    ///   without `value`
    /// - [`PaginationError::MissingPaginationParameters`] when `limit` or
    ///   `value` is given without any mode
    pub fn resolve(&self) -> Result<PaginationIntent, PaginationError> {
        let offset = present(&self.offset);
        let page = present(&self.page);
        let attribute = present(&self.attribute);
        let value = present(&self.value);
        let limit = present(&self.limit).map(parse_limit).transpose()?;

        let mode = if let Some(attribute) = attribute {
            let before = value.ok_or_else(|| {
                PaginationError::invalid("value", "required when 'attribute' is given")
            })?;
            log_ignored(&[("offset", offset), ("page", page)]);
            PaginationMode::Attribute {
                attribute: attribute.to_string(),
                before: before.to_string(),
            }
        } else if let Some(offset) = offset {
            log_ignored(&[("page", page)]);
            PaginationMode::Offset {
                offset: parse_position("offset", offset)?,
            }
        } else if let Some(page) = page {
            PaginationMode::Page {
                index: parse_position("page", page)?,
            }
        } else if limit.is_some() || value.is_some() {
            return Err(PaginationError::MissingPaginationParameters(
                "'limit' and 'value' require one of 'offset', 'page' or 'attribute'".to_string(),
            ));
        } else {
            PaginationMode::Unpaginated
        };

        Ok(PaginationIntent::new(mode, limit))
    }

    /// Parse the `sort` parameter; never fails
    #[must_use]
    pub fn sort_option(&self) -> SortOption {
        present(&self.sort)
            .map(SortOption::parse)
            .unwrap_or_default()
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_limit(raw: &str) -> Result<NonZeroU64, PaginationError> {
    raw.parse::<NonZeroU64>()
        .map_err(|_| PaginationError::invalid("limit", format!("'{raw}' is not a positive integer")))
}

fn parse_position(parameter: &'static str, raw: &str) -> Result<u64, PaginationError> {
    raw.parse::<u64>().map_err(|_| {
        PaginationError::invalid(parameter, format!("'{raw}' is not a non-negative integer"))
    })
}

fn log_ignored(candidates: &[(&str, Option<&str>)]) {
    for (name, value) in candidates {
        if let Some(value) = value {
            tracing::debug!(parameter = %name, value = %value, "Ignoring lower-priority pagination parameter");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit(n: u64) -> Option<NonZeroU64> {
        NonZeroU64::new(n)
    }

    #[test]
    fn test_no_parameters_is_unpaginated() {
        let intent = PaginationParams::default().resolve().unwrap();
        assert_eq!(intent, PaginationIntent::unpaginated());
    }

    #[test]
    fn test_blank_values_are_absent() {
        let params = PaginationParams::default()
            .with_offset("")
            .with_page("  ")
            .with_limit("");
        assert_eq!(params.resolve().unwrap(), PaginationIntent::unpaginated());
    }

    #[test]
    fn test_offset_with_limit() {
        let intent = PaginationParams::default()
            .with_offset("1")
            .with_limit("2")
            .resolve()
            .unwrap();
        assert_eq!(intent.mode(), &PaginationMode::Offset { offset: 1 });
        assert_eq!(intent.limit(), limit(2));
    }

    #[test]
    fn test_page_without_limit() {
        let intent = PaginationParams::default().with_page("3").resolve().unwrap();
        assert_eq!(intent.mode(), &PaginationMode::Page { index: 3 });
        assert_eq!(intent.limit(), None);
    }

    #[test]
    fn test_attribute_with_value() {
        let intent = PaginationParams::default()
            .with_attribute("firstName", "Robert")
            .with_limit("1")
            .resolve()
            .unwrap();
        assert_eq!(
            intent.mode(),
            &PaginationMode::Attribute {
                attribute: "firstName".into(),
                before: "Robert".into(),
            }
        );
        assert_eq!(intent.limit(), limit(1));
    }

    #[test]
    fn test_attribute_without_value() {
        let params = PaginationParams {
            attribute: Some("firstName".into()),
            ..Default::default()
        };
        assert!(matches!(
            params.resolve(),
            Err(PaginationError::InvalidParameter { parameter: "value", .. })
        ));
    }

    #[test]
    fn test_priority_attribute_over_offset_over_page() {
        let all = PaginationParams::default()
            .with_attribute("age", "30")
            .with_offset("1")
            .with_page("2");
        assert!(matches!(all.resolve().unwrap().mode(), PaginationMode::Attribute { .. }));

        let offset_and_page = PaginationParams::default().with_offset("1").with_page("2");
        assert_eq!(
            offset_and_page.resolve().unwrap().mode(),
            &PaginationMode::Offset { offset: 1 }
        );
    }

    #[test]
    fn test_lower_priority_mode_is_not_validated() {
        let params = PaginationParams::default().with_offset("0").with_page("abc");
        assert_eq!(
            params.resolve().unwrap().mode(),
            &PaginationMode::Offset { offset: 0 }
        );
    }

    #[test]
    fn test_invalid_limits() {
        for raw in ["0", "-1", "abc", "1.5"] {
            let result = PaginationParams::default()
                .with_offset("0")
                .with_limit(raw)
                .resolve();
            assert!(
                matches!(result, Err(PaginationError::InvalidParameter { parameter: "limit", .. })),
                "limit {raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_offset_and_page() {
        assert!(matches!(
            PaginationParams::default().with_offset("-3").resolve(),
            Err(PaginationError::InvalidParameter { parameter: "offset", .. })
        ));
        assert!(matches!(
            PaginationParams::default().with_page("two").resolve(),
            Err(PaginationError::InvalidParameter { parameter: "page", .. })
        ));
    }

    #[test]
    fn test_limit_without_mode() {
        assert!(matches!(
            PaginationParams::default().with_limit("2").resolve(),
            Err(PaginationError::MissingPaginationParameters(_))
        ));
    }

    #[test]
    fn test_value_without_mode() {
        let params = PaginationParams {
            value: Some("Robert".into()),
            ..Default::default()
        };
        assert!(matches!(
            params.resolve(),
            Err(PaginationError::MissingPaginationParameters(_))
        ));
    }

    #[test]
    fn test_sort_option() {
        let params = PaginationParams::default().with_sort("lastName,-age");
        assert_eq!(params.sort_option().to_string(), "lastName,-age");
        assert!(PaginationParams::default().sort_option().is_empty());
    }

    #[test]
    fn test_deserialize_from_query_string_shape() {
        let params: PaginationParams =
            serde_json::from_str(r#"{"page":"1","limit":"2","unknown":"x"}"#).unwrap();
        assert_eq!(params.page.as_deref(), Some("1"));
        assert_eq!(params.limit.as_deref(), Some("2"));
        assert_eq!(params.offset, None);
    }
}
