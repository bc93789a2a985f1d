//! Record source implementations and query renderers

pub mod in_memory;
pub mod sql;

pub use in_memory::InMemoryRecordSource;
pub use sql::{SqlQuery, SqlStatement};
