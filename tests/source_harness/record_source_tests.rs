//! Macro-generated test suite for `RecordSource<TestRecord>` contract validation.
//!
//! The `record_source_tests!` macro generates a test module that validates any
//! `RecordSource<TestRecord>` implementation against the contract the lookup
//! pipeline relies on: predicate semantics, ordering, paging and counting.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod source_harness;
//!
//! use source_harness::*;
//! use lookup::storage::InMemoryRecordSource;
//!
//! record_source_tests!(InMemoryRecordSource::with_records);
//! ```
//!
//! # Generated Tests
//!
//! ## Predicates
//! - `test_count_all` / `test_fetch_natural_order`
//! - `test_equals_string_field` / `test_equals_integer_field`
//! - `test_equals_compares_numbers_by_value`
//! - `test_equals_never_matches_null`
//! - `test_contains_text_any_field`
//! - `test_predicates_are_conjunctive`
//!
//! ## Ordering & paging
//! - `test_order_ascending_nulls_first` / `test_order_descending_is_stable`
//! - `test_order_by_date`
//! - `test_skip_and_take` / `test_skip_past_end`
//! - `test_count_ignores_order_and_paging`
//!
//! ## Edge Cases
//! - `test_empty_source`
//! - `test_concurrent_reads`: parallel fetches from spawned tasks

/// Generate a full `RecordSource<TestRecord>` conformance test suite.
///
/// `$factory` must be a callable taking `Vec<TestRecord>` and returning a
/// source holding those records, with insertion order as natural order. It is
/// called once per test to ensure isolation. The source must be `'static` for
/// the concurrent read test.
#[macro_export]
macro_rules! record_source_tests {
    ($factory:expr) => {
        mod record_source_contract_tests {
            use super::*;
            use lookup::core::field::FieldValue;
            use lookup::core::filter::SortOrder;
            use lookup::core::query::LookupQuery;
            use lookup::core::store::RecordSource;
            use std::sync::Arc;

            fn query() -> LookupQuery<TestRecord> {
                LookupQuery::new()
            }

            // ==================================================================
            // Predicates
            // ==================================================================

            #[tokio::test]
            async fn test_count_all() {
                let source = ($factory)(sample_records());
                assert_eq!(source.count(&query()).await.unwrap(), 5);
            }

            #[tokio::test]
            async fn test_fetch_natural_order() {
                let source = ($factory)(sample_records());
                let records = source.fetch(&query()).await.unwrap();
                assert_eq!(names(&records), vec!["Ann", "Bob", "Joanna", "Carl", "Dora"]);
            }

            #[tokio::test]
            async fn test_equals_string_field() {
                let source = ($factory)(sample_records());
                let q = query().filter_equals(field("name"), FieldValue::String("Carl".into()));
                let records = source.fetch(&q).await.unwrap();
                assert_eq!(names(&records), vec!["Carl"]);
            }

            #[tokio::test]
            async fn test_equals_integer_field() {
                let source = ($factory)(sample_records());
                let q = query().filter_equals(field("age"), FieldValue::Integer(42));
                assert_eq!(source.count(&q).await.unwrap(), 2);
            }

            #[tokio::test]
            async fn test_equals_compares_numbers_by_value() {
                let source = ($factory)(sample_records());
                let q = query().filter_equals(field("id"), FieldValue::Float(7.0));
                let records = source.fetch(&q).await.unwrap();
                assert_eq!(names(&records), vec!["Dora"]);
            }

            #[tokio::test]
            async fn test_equals_never_matches_null() {
                let source = ($factory)(sample_records());
                let q = query().filter_equals(field("email"), FieldValue::Null);
                assert_eq!(source.count(&q).await.unwrap(), 0);
            }

            #[tokio::test]
            async fn test_contains_text_any_field() {
                let source = ($factory)(sample_records());
                let q = query().filter_text_contains_any(vec![field("name"), field("email")], "ANN");
                let records = source.fetch(&q).await.unwrap();
                assert_eq!(names(&records), vec!["Ann", "Joanna", "Carl"]);
            }

            #[tokio::test]
            async fn test_predicates_are_conjunctive() {
                let source = ($factory)(sample_records());
                let q = query()
                    .filter_equals(field("age"), FieldValue::Integer(42))
                    .filter_text_contains_any(vec![field("email")], "annex");
                let records = source.fetch(&q).await.unwrap();
                assert_eq!(names(&records), vec!["Carl"]);
            }

            // ==================================================================
            // Ordering & paging
            // ==================================================================

            #[tokio::test]
            async fn test_order_ascending_nulls_first() {
                let source = ($factory)(sample_records());
                let q = query().order_by(field("email"), SortOrder::Asc);
                let records = source.fetch(&q).await.unwrap();
                assert_eq!(names(&records), vec!["Joanna", "Ann", "Bob", "Carl", "Dora"]);
            }

            #[tokio::test]
            async fn test_order_descending_is_stable() {
                let source = ($factory)(sample_records());
                let q = query().order_by(field("age"), SortOrder::Desc);
                let records = source.fetch(&q).await.unwrap();
                assert_eq!(names(&records), vec!["Bob", "Carl", "Ann", "Joanna", "Dora"]);
            }

            #[tokio::test]
            async fn test_order_by_date() {
                let source = ($factory)(sample_records());
                let q = query().order_by(field("joined_on"), SortOrder::Asc);
                let records = source.fetch(&q).await.unwrap();
                assert_eq!(ids(&records), vec!["2", "3", "5", "7", "9"]);
            }

            #[tokio::test]
            async fn test_skip_and_take() {
                let source = ($factory)(sample_records());
                let q = query().order_by(field("name"), SortOrder::Asc).skip(1).take(2);
                let records = source.fetch(&q).await.unwrap();
                assert_eq!(names(&records), vec!["Bob", "Carl"]);
            }

            #[tokio::test]
            async fn test_skip_past_end() {
                let source = ($factory)(sample_records());
                let q = query().skip(50).take(10);
                assert!(source.fetch(&q).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_count_ignores_order_and_paging() {
                let source = ($factory)(sample_records());
                let q = query()
                    .filter_text_contains_any(vec![field("name")], "a")
                    .order_by(field("name"), SortOrder::Desc)
                    .skip(1)
                    .take(1);
                assert_eq!(source.count(&q).await.unwrap(), 4);
                assert_eq!(source.fetch(&q).await.unwrap().len(), 1);
            }

            // ==================================================================
            // Edge Cases
            // ==================================================================

            #[tokio::test]
            async fn test_empty_source() {
                let source = ($factory)(Vec::new());
                assert_eq!(source.count(&query()).await.unwrap(), 0);
                assert!(source.fetch(&query().take(10)).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_concurrent_reads() {
                let source = Arc::new(($factory)(sample_records()));
                let mut handles = Vec::new();

                for i in 0..8 {
                    let source = Arc::clone(&source);
                    handles.push(tokio::spawn(async move {
                        let q = query().order_by(field("id"), SortOrder::Asc).skip(i % 5).take(1);
                        source.fetch(&q).await.unwrap()
                    }));
                }

                for handle in handles {
                    assert_eq!(handle.await.unwrap().len(), 1);
                }
            }
        }
    };
}
