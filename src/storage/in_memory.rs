//! In-memory implementation of RecordSource for testing and development

use crate::core::field::FieldValue;
use crate::core::filter::SortOrder;
use crate::core::query::LookupQuery;
use crate::core::record::LookupRecord;
use crate::core::store::RecordSource;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// In-memory record source
///
/// Insertion order is the natural order. Useful for testing and development.
/// Uses RwLock for thread-safe access; clones share the same records.
#[derive(Clone)]
pub struct InMemoryRecordSource<R: LookupRecord> {
    records: Arc<RwLock<Vec<R>>>,
}

impl<R: LookupRecord> InMemoryRecordSource<R> {
    /// Create an empty in-memory source
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Create a source holding `records` in the given order
    pub fn with_records(records: Vec<R>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Append a record
    pub fn insert(&self, record: R) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        records.push(record);
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl<R: LookupRecord> Default for InMemoryRecordSource<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: LookupRecord> RecordSource<R> for InMemoryRecordSource<R> {
    async fn count(&self, query: &LookupQuery<R>) -> Result<usize> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.iter().filter(|record| query.matches(record)).count())
    }

    async fn fetch(&self, query: &LookupQuery<R>) -> Result<Vec<R>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut matching: Vec<&R> = records.iter().filter(|record| query.matches(record)).collect();

        if let Some(ordering) = query.ordering() {
            let name = ordering.field.name();
            // Vec::sort_by is stable, equal keys keep insertion order
            matching.sort_by(|a, b| {
                let a = a.field_value(name).unwrap_or(FieldValue::Null);
                let b = b.field_value(name).unwrap_or(FieldValue::Null);
                match ordering.order {
                    SortOrder::Asc => a.compare(&b),
                    SortOrder::Desc => b.compare(&a),
                }
            });
        }

        Ok(matching
            .into_iter()
            .skip(query.skipped())
            .take(query.taken().unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::{ColumnAttr, FieldDef, FieldKind};
    use crate::core::query::FieldRef;
    use std::sync::OnceLock;

    #[derive(Clone, Debug, PartialEq)]
    struct Item {
        sku: &'static str,
        rank: Option<i64>,
    }

    impl LookupRecord for Item {
        fn type_name() -> &'static str {
            "item"
        }

        fn fields() -> &'static [FieldDef] {
            static FIELDS: OnceLock<Vec<FieldDef>> = OnceLock::new();
            FIELDS.get_or_init(|| {
                vec![
                    FieldDef::new("sku", FieldKind::Text).with_column(ColumnAttr::new()),
                    FieldDef::new("rank", FieldKind::Integer).with_column(ColumnAttr::new()),
                ]
            })
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "sku" => Some(FieldValue::String(self.sku.to_string())),
                "rank" => Some(self.rank.map_or(FieldValue::Null, FieldValue::Integer)),
                _ => None,
            }
        }
    }

    fn item(sku: &'static str, rank: Option<i64>) -> Item {
        Item { sku, rank }
    }

    fn source() -> InMemoryRecordSource<Item> {
        InMemoryRecordSource::with_records(vec![
            item("c", Some(2)),
            item("a", None),
            item("b", Some(1)),
            item("d", Some(2)),
        ])
    }

    fn rank() -> FieldRef {
        FieldRef::resolve::<Item>("rank").unwrap()
    }

    fn skus(items: &[Item]) -> Vec<&'static str> {
        items.iter().map(|i| i.sku).collect()
    }

    #[tokio::test]
    async fn test_natural_order_without_ordering() {
        let items = source().fetch(&LookupQuery::new()).await.unwrap();
        assert_eq!(skus(&items), vec!["c", "a", "b", "d"]);
    }

    #[tokio::test]
    async fn test_stable_sort_with_nulls_first() {
        let query = LookupQuery::new().order_by(rank(), SortOrder::Asc);
        let items = source().fetch(&query).await.unwrap();
        assert_eq!(skus(&items), vec!["a", "b", "c", "d"]);

        let query = LookupQuery::new().order_by(rank(), SortOrder::Desc);
        let items = source().fetch(&query).await.unwrap();
        assert_eq!(skus(&items), vec!["c", "d", "b", "a"]);
    }

    #[tokio::test]
    async fn test_count_ignores_paging() {
        let query = LookupQuery::new()
            .filter_equals(rank(), FieldValue::Integer(2))
            .skip(1)
            .take(1);
        let source = source();
        assert_eq!(source.count(&query).await.unwrap(), 2);
        assert_eq!(skus(&source.fetch(&query).await.unwrap()), vec!["d"]);
    }

    #[tokio::test]
    async fn test_insert_is_shared_between_clones() {
        let source = InMemoryRecordSource::new();
        let clone = source.clone();
        assert!(source.is_empty().unwrap());

        clone.insert(item("x", None)).unwrap();
        assert_eq!(source.len().unwrap(), 1);
    }
}
