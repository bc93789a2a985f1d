//! Lookup request parameters

use crate::core::field::FieldValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(alias = "asc", alias = "ASC")]
    Asc,
    #[serde(alias = "desc", alias = "DESC")]
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("Asc"),
            SortOrder::Desc => f.write_str("Desc"),
        }
    }
}

/// The filter a client sends with each lookup request
///
/// Only one filtering mode applies per request, in priority order:
///
/// 1. `id` present: only the record with that identifier, every other
///    filter field except paging is ignored
/// 2. at least one additional filter with a non-null value: those
///    equality filters, `search` is ignored
/// 3. otherwise `search`, when non-empty
///
/// # Example
/// ```
/// use lookup::core::LookupFilter;
///
/// let filter: LookupFilter = serde_json::from_str(
///     r#"{"search": "ann", "sortColumn": "name", "sortOrder": "Desc", "page": 1}"#,
/// ).unwrap();
/// assert_eq!(filter.rows, 20);
/// assert_eq!(filter.page, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LookupFilter {
    /// Identifier of a single record to look up
    pub id: Option<String>,

    /// Free-text search across textual columns
    pub search: Option<String>,

    /// Column to sort by, falls back to the lookup's default
    pub sort_column: Option<String>,

    pub sort_order: SortOrder,

    /// Zero-based page index
    pub page: usize,

    /// Page size
    pub rows: usize,

    /// Exact-match constraints by field name. Null values are ignored.
    pub additional_filters: IndexMap<String, Option<FieldValue>>,
}

impl Default for LookupFilter {
    fn default() -> Self {
        Self {
            id: None,
            search: None,
            sort_column: None,
            sort_order: SortOrder::Asc,
            page: 0,
            rows: default_rows(),
            additional_filters: IndexMap::new(),
        }
    }
}

fn default_rows() -> usize {
    20
}

impl LookupFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter for a single record by identifier
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Filter by free-text search
    pub fn by_search(search: impl Into<String>) -> Self {
        Self {
            search: Some(search.into()),
            ..Self::default()
        }
    }

    pub fn with_page(mut self, page: usize, rows: usize) -> Self {
        self.page = page;
        self.rows = rows;
        self
    }

    pub fn with_sort(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.sort_column = Some(column.into());
        self.sort_order = order;
        self
    }

    /// Add (or replace) an additional equality filter
    pub fn with_additional_filter(mut self, field: impl Into<String>, value: Option<FieldValue>) -> Self {
        self.additional_filters.insert(field.into(), value);
        self
    }

    /// Additional filters that actually constrain the result
    pub fn active_additional_filters(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.additional_filters
            .iter()
            .filter_map(|(field, value)| match value {
                Some(value) if !value.is_null() => Some((field.as_str(), value)),
                _ => None,
            })
    }

    /// Whether the additional filters take precedence over `search`
    pub fn has_active_additional_filters(&self) -> bool {
        self.active_additional_filters().next().is_some()
    }

    /// Number of records skipped before the requested page
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.rows)
    }
}
