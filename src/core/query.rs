//! Composed lookup queries handed to record sources
//!
//! The pipeline never evaluates anything itself. Each stage adds to a
//! [`LookupQuery`], and the record source evaluates the finished query only
//! when counting or fetching a page, so filtering, sorting and paging compose
//! into a single query against the backing store.

use crate::core::field::{FieldDef, FieldKind, FieldValue};
use crate::core::filter::SortOrder;
use crate::core::record::LookupRecord;
use std::fmt;
use std::marker::PhantomData;

/// Reference to a field of a record type's static field table.
///
/// Can only be obtained by resolving a name against the table, so a query
/// never references a field the record type does not declare.
#[derive(Clone, Copy, PartialEq)]
pub struct FieldRef(&'static FieldDef);

impl FieldRef {
    /// Resolve a field name against `R`'s field table
    pub fn resolve<R: LookupRecord>(name: &str) -> Option<Self> {
        R::field(name).map(FieldRef)
    }

    pub fn name(&self) -> &'static str {
        self.0.name
    }

    pub fn kind(&self) -> FieldKind {
        self.0.kind
    }
}

impl fmt::Debug for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldRef({})", self.0.name)
    }
}

/// A typed filtering condition
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `field != null && field == value`
    Equals { field: FieldRef, value: FieldValue },

    /// Disjunction over `fields` of `field != null && lower(field) contains needle`.
    /// The needle is already lowercased.
    ContainsText { fields: Vec<FieldRef>, needle: String },
}

impl Predicate {
    /// Evaluate the predicate against a record in process
    pub fn matches<R: LookupRecord>(&self, record: &R) -> bool {
        match self {
            Predicate::Equals { field, value } => record
                .field_value(field.name())
                .is_some_and(|actual| actual.loose_eq(value)),
            Predicate::ContainsText { fields, needle } => fields.iter().any(|field| {
                matches!(
                    record.field_value(field.name()),
                    Some(FieldValue::String(text)) if text.to_lowercase().contains(needle.as_str())
                )
            }),
        }
    }
}

/// Requested ordering of the result set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryOrder {
    pub field: FieldRef,
    pub order: SortOrder,
}

/// A lazily evaluated query over records of type `R`.
///
/// Predicates are combined with logical AND.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupQuery<R> {
    predicates: Vec<Predicate>,
    order: Option<QueryOrder>,
    skip: usize,
    take: Option<usize>,
    _marker: PhantomData<fn() -> R>,
}

impl<R: LookupRecord> Default for LookupQuery<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: LookupRecord> LookupQuery<R> {
    /// Query matching every record in natural order
    pub fn new() -> Self {
        Self {
            predicates: Vec::new(),
            order: None,
            skip: 0,
            take: None,
            _marker: PhantomData,
        }
    }

    /// Keep records whose `field` equals `value`
    pub fn filter_equals(mut self, field: FieldRef, value: FieldValue) -> Self {
        self.predicates.push(Predicate::Equals { field, value });
        self
    }

    /// Keep records where any of `fields` contains `text`, case-insensitively.
    /// An empty field list leaves the query unchanged.
    pub fn filter_text_contains_any(mut self, fields: Vec<FieldRef>, text: &str) -> Self {
        if fields.is_empty() {
            return self;
        }
        self.predicates.push(Predicate::ContainsText {
            fields,
            needle: text.to_lowercase(),
        });
        self
    }

    /// Order by `field`, replacing any previous ordering
    pub fn order_by(mut self, field: FieldRef, order: SortOrder) -> Self {
        self.order = Some(QueryOrder { field, order });
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn take(mut self, take: usize) -> Self {
        self.take = Some(take);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn ordering(&self) -> Option<QueryOrder> {
        self.order
    }

    pub fn skipped(&self) -> usize {
        self.skip
    }

    pub fn taken(&self) -> Option<usize> {
        self.take
    }

    /// Whether a record satisfies every predicate
    pub fn matches(&self, record: &R) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }

    /// The same filtered set without ordering or paging, for counting
    pub fn unpaged(&self) -> Self {
        Self {
            predicates: self.predicates.clone(),
            order: None,
            skip: 0,
            take: None,
            _marker: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::ColumnAttr;
    use std::sync::OnceLock;

    #[derive(Clone, Debug)]
    struct City {
        name: Option<String>,
        zip: i64,
    }

    impl LookupRecord for City {
        fn type_name() -> &'static str {
            "city"
        }

        fn fields() -> &'static [FieldDef] {
            static FIELDS: OnceLock<Vec<FieldDef>> = OnceLock::new();
            FIELDS.get_or_init(|| {
                vec![
                    FieldDef::new("name", FieldKind::Text).with_column(ColumnAttr::new()),
                    FieldDef::new("zip", FieldKind::Integer).with_column(ColumnAttr::new()),
                ]
            })
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "name" => Some(self.name.clone().map_or(FieldValue::Null, FieldValue::String)),
                "zip" => Some(FieldValue::Integer(self.zip)),
                _ => None,
            }
        }
    }

    fn field(name: &str) -> FieldRef {
        FieldRef::resolve::<City>(name).expect("field should resolve")
    }

    #[test]
    fn test_resolve_only_declared_fields() {
        assert!(FieldRef::resolve::<City>("name").is_some());
        assert!(FieldRef::resolve::<City>("name; DROP TABLE city").is_none());
        assert_eq!(field("zip").kind(), FieldKind::Integer);
    }

    #[test]
    fn test_equals_never_matches_null() {
        let city = City { name: None, zip: 1000 };
        let predicate = Predicate::Equals {
            field: field("name"),
            value: FieldValue::Null,
        };
        assert!(!predicate.matches(&city));

        let predicate = Predicate::Equals {
            field: field("zip"),
            value: FieldValue::Float(1000.0),
        };
        assert!(predicate.matches(&city));
    }

    #[test]
    fn test_contains_text_is_case_insensitive_and_skips_null() {
        let brussels = City {
            name: Some("Brussels".to_string()),
            zip: 1000,
        };
        let unnamed = City { name: None, zip: 2000 };

        let query = LookupQuery::<City>::new().filter_text_contains_any(vec![field("name")], "RUSS");
        assert!(query.matches(&brussels));
        assert!(!query.matches(&unnamed));
    }

    #[test]
    fn test_empty_text_field_list_is_noop() {
        let query = LookupQuery::<City>::new().filter_text_contains_any(Vec::new(), "x");
        assert!(query.predicates().is_empty());
    }

    #[test]
    fn test_predicates_are_conjunctive() {
        let city = City {
            name: Some("Ghent".to_string()),
            zip: 9000,
        };
        let query = LookupQuery::<City>::new()
            .filter_equals(field("zip"), FieldValue::Integer(9000))
            .filter_equals(field("name"), FieldValue::String("Bruges".into()));
        assert!(!query.matches(&city));
    }

    #[test]
    fn test_unpaged_drops_order_and_paging() {
        let query = LookupQuery::<City>::new()
            .filter_equals(field("zip"), FieldValue::Integer(1))
            .order_by(field("name"), SortOrder::Desc)
            .skip(10)
            .take(5);
        let unpaged = query.unpaged();

        assert_eq!(unpaged.predicates(), query.predicates());
        assert!(unpaged.ordering().is_none());
        assert_eq!(unpaged.skipped(), 0);
        assert_eq!(unpaged.taken(), None);
        assert_eq!(query.taken(), Some(5));
    }
}
