//! Shared test harness for record source and lookup testing
//!
//! Provides `TestRecord`, a lookup record with fields covering every
//! `FieldValue` kind and a mix of formatted, hidden and plain columns, plus
//! helpers for building fixtures.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod source_harness;
//! use source_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod record_source_tests;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use lookup::core::query::FieldRef;
use lookup::core::record::LookupRecord;
use lookup::impl_lookup_record;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// TestRecord: covers all FieldValue kinds
// ---------------------------------------------------------------------------

impl_lookup_record!(
    TestRecord,
    "test_record",
    {
        id: i64,
        name: String => { position: 1, label: "Name" },
        email: Option<String> => { position: 2, label: "Email" },
        age: i64 => { format: "{0:000}" },
        score: f64 => { format: "{0:F1}" },
        active: bool,
        token: Uuid => { hidden: true },
        joined_on: NaiveDate => { format: "{0:dd/MM/yyyy}" },
        updated_at: DateTime<Utc>,
    }
);

// Labelled records keyed by `code`, for textual identifiers
impl_lookup_record!(
    TestCountry,
    "test_country",
    id = code,
    {
        code: String,
        label: String => {},
    }
);

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Create a `TestRecord` with deterministic defaults for the other fields
pub fn create_test_record(id: i64, name: &str, email: Option<&str>, age: i64) -> TestRecord {
    TestRecord {
        id,
        name: name.to_string(),
        email: email.map(str::to_string),
        age,
        score: age as f64 / 10.0,
        active: age % 2 == 0,
        token: Uuid::from_u128(id as u128),
        joined_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(id as u64),
        updated_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    }
}

/// Five records in a deliberately unsorted natural order
pub fn sample_records() -> Vec<TestRecord> {
    vec![
        create_test_record(5, "Ann", Some("a@x.com"), 31),
        create_test_record(2, "Bob", Some("bob@y.org"), 42),
        create_test_record(9, "Joanna", None, 27),
        create_test_record(3, "Carl", Some("carl@annex.io"), 42),
        create_test_record(7, "Dora", Some("dora@z.net"), 8),
    ]
}

pub fn sample_countries() -> Vec<TestCountry> {
    vec![
        TestCountry::new("BE".to_string(), "Belgium".to_string()),
        TestCountry::new("NL".to_string(), "Netherlands".to_string()),
        TestCountry::new("FR".to_string(), "France".to_string()),
    ]
}

/// Resolve a `TestRecord` field
pub fn field(name: &str) -> FieldRef {
    FieldRef::resolve::<TestRecord>(name).expect("TestRecord declares the field")
}

pub fn names(records: &[TestRecord]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
}

pub fn ids<R: LookupRecord>(records: &[R]) -> Vec<String> {
    records
        .iter()
        .map(|r| {
            r.field_value(R::id_field())
                .and_then(|v| v.render())
                .unwrap_or_default()
        })
        .collect()
}
