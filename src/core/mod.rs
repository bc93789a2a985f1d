//! Core module containing the lookup model and query pipeline

pub mod column;
pub mod error;
pub mod field;
pub mod filter;
pub mod format;
pub mod handlers;
pub mod lookup;
pub mod query;
pub mod record;
pub mod result;
pub mod store;

pub use column::{LookupColumn, LookupColumns};
pub use error::{ConfigError, InputError, LookupError};
pub use field::{ColumnAttr, FieldDef, FieldKind, FieldValue, IntoFieldValue};
pub use filter::{LookupFilter, SortOrder};
pub use format::FormatTemplate;
pub use handlers::{DefaultHandlers, LookupContext, LookupHandlers};
pub use lookup::Lookup;
pub use query::{FieldRef, LookupQuery, Predicate, QueryOrder};
pub use record::LookupRecord;
pub use result::{AC_KEY, ID_KEY, LookupData, LookupRow};
pub use store::RecordSource;
