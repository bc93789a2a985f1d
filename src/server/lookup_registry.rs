//! Lookup registry for serving several lookups by name

use crate::config::LookupConfig;
use crate::core::column::LookupColumns;
use crate::core::error::LookupError;
use crate::core::filter::LookupFilter;
use crate::core::handlers::{DefaultHandlers, LookupHandlers};
use crate::core::lookup::Lookup;
use crate::core::record::LookupRecord;
use crate::core::result::LookupData;
use crate::core::store::RecordSource;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A lookup bound to its record source, callable without knowing the record type
///
/// Transport layers (HTTP handlers, RPC services) hold lookups through this
/// trait so that a single endpoint can dispatch to any registered lookup.
#[async_trait]
pub trait LookupService: Send + Sync {
    /// Registry name (e.g., "people")
    fn name(&self) -> &str;

    fn config(&self) -> &LookupConfig;

    fn columns(&self) -> &LookupColumns;

    /// Run the lookup pipeline for one request
    async fn get_data(&self, filter: &LookupFilter) -> Result<LookupData, LookupError>;
}

/// A [`Lookup`] paired with the source it reads from
pub struct BoundLookup<R, S, H = DefaultHandlers>
where
    R: LookupRecord,
    S: RecordSource<R>,
    H: LookupHandlers<R>,
{
    name: String,
    lookup: Lookup<R, H>,
    source: S,
}

impl<R, S, H> BoundLookup<R, S, H>
where
    R: LookupRecord,
    S: RecordSource<R>,
    H: LookupHandlers<R>,
{
    pub fn new(name: impl Into<String>, lookup: Lookup<R, H>, source: S) -> Self {
        Self {
            name: name.into(),
            lookup,
            source,
        }
    }

    pub fn lookup(&self) -> &Lookup<R, H> {
        &self.lookup
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[async_trait]
impl<R, S, H> LookupService for BoundLookup<R, S, H>
where
    R: LookupRecord,
    S: RecordSource<R>,
    H: LookupHandlers<R>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> &LookupConfig {
        self.lookup.config()
    }

    fn columns(&self) -> &LookupColumns {
        self.lookup.columns()
    }

    async fn get_data(&self, filter: &LookupFilter) -> Result<LookupData, LookupError> {
        self.lookup.get_data(filter, &self.source).await
    }
}

/// Registry for all lookups in the application
///
/// Built once at startup, then shared read-only (typically behind an `Arc`).
#[derive(Default)]
pub struct LookupRegistry {
    lookups: HashMap<String, Arc<dyn LookupService>>,
}

impl LookupRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            lookups: HashMap::new(),
        }
    }

    /// Register a lookup
    ///
    /// The lookup name is used as the key; registering a name twice replaces
    /// the earlier lookup.
    pub fn register(&mut self, lookup: impl LookupService + 'static) {
        let name = lookup.name().to_string();
        debug!(lookup = %name, "Registering lookup");
        self.lookups.insert(name, Arc::new(lookup));
    }

    /// Get a registered lookup by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn LookupService>> {
        self.lookups.get(name).cloned()
    }

    /// Names of all registered lookups, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.lookups.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.lookups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookups.is_empty()
    }

    /// Run the lookup registered under `name`
    pub async fn get_data(&self, name: &str, filter: &LookupFilter) -> Result<LookupData, LookupError> {
        let lookup = self
            .lookups
            .get(name)
            .ok_or_else(|| LookupError::UnknownLookup {
                name: name.to_string(),
            })?;

        lookup.get_data(filter).await
    }
}
