//! # Lookup-RS
//!
//! A declarative, storage-agnostic query engine for autocomplete and lookup
//! controls in Rust.
//!
//! ## Features
//!
//! - **Declarative Columns**: Derive a lookup's column registry from field metadata
//! - **Filter Precedence**: Id lookup, then exact-match filters, then free-text search
//! - **Composable Queries**: Filtering, sorting and paging compose into one query
//! - **Storage-Agnostic**: Any backend implementing `RecordSource` can serve a lookup
//! - **Display Formats**: Positional format templates for numbers and dates
//! - **Overridable Pipeline**: Every step is a `LookupHandlers` hook
//! - **Configuration-Based**: Define lookup settings via YAML configuration
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lookup::prelude::*;
//!
//! impl_lookup_record!(
//!     Person,
//!     "person",
//!     {
//!         id: i64,
//!         name: String => { position: 1, label: "Name" },
//!         email: Option<String> => { position: 2 },
//!     }
//! );
//!
//! let lookup = Lookup::<Person>::new()?;
//! let source = InMemoryRecordSource::with_records(vec![
//!     Person::new(5, "Ann".to_string(), Some("a@x.com".to_string())),
//! ]);
//!
//! let data = lookup.get_data(&LookupFilter::by_search("ann"), &source).await?;
//! assert_eq!(data.filtered_rows, 1);
//! assert_eq!(data.rows[0][AC_KEY].as_deref(), Some("Ann"));
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        column::{LookupColumn, LookupColumns},
        error::{ConfigError, InputError, LookupError},
        field::{ColumnAttr, FieldDef, FieldKind, FieldValue, IntoFieldValue},
        filter::{LookupFilter, SortOrder},
        format::FormatTemplate,
        handlers::{DefaultHandlers, LookupContext, LookupHandlers},
        lookup::Lookup,
        query::{FieldRef, LookupQuery, Predicate},
        record::LookupRecord,
        result::{AC_KEY, ID_KEY, LookupData, LookupRow},
        store::RecordSource,
    };

    // === Macros ===
    pub use crate::impl_lookup_record;

    // === Storage ===
    pub use crate::storage::{InMemoryRecordSource, SqlQuery, SqlStatement};

    // === Config ===
    pub use crate::config::{LookupConfig, LookupsConfig};

    // === Server ===
    pub use crate::server::{BoundLookup, LookupRegistry, LookupService};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, NaiveDate, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
