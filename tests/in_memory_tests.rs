//! Integration tests for InMemoryRecordSource using the source test harness.
//!
//! This file invokes `record_source_tests!` to validate that
//! InMemoryRecordSource fully conforms to the RecordSource<R> contract.

#[macro_use]
mod source_harness;

use lookup::storage::InMemoryRecordSource;
use source_harness::*;

record_source_tests!(InMemoryRecordSource::<TestRecord>::with_records);
