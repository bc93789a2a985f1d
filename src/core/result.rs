//! Lookup result structures

use crate::core::column::LookupColumns;
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

/// Row key holding the record identifier
pub const ID_KEY: &str = "LookupIdKey";

/// Row key holding the autocomplete display value
pub const AC_KEY: &str = "LookupAcKey";

/// One rendered result row, keyed by column name.
///
/// Values are display-ready strings, `None` for missing or null data.
/// Key order is insertion order: identifier, autocomplete, declared columns,
/// then any extra data a lookup adds.
pub type LookupRow = IndexMap<String, Option<String>>;

/// Paginated, rendered lookup result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupData {
    /// Records matching the filter before paging
    pub filtered_rows: usize,

    /// Column registry snapshot, in registry order
    pub columns: Arc<LookupColumns>,

    /// Rendered page, in the order the source returned it
    pub rows: Vec<LookupRow>,
}

impl LookupData {
    pub fn new(columns: Arc<LookupColumns>) -> Self {
        Self {
            filtered_rows: 0,
            columns,
            rows: Vec::new(),
        }
    }
}
