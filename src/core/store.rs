//! Record source trait evaluating composed lookup queries

use crate::core::query::LookupQuery;
use crate::core::record::LookupRecord;
use anyhow::Result;
use async_trait::async_trait;

/// Backing store a lookup reads records from.
///
/// A source receives a fully composed [`LookupQuery`] and is expected to
/// evaluate it in as few round-trips as possible. `count` and `fetch` are the
/// only evaluation points; both are called with queries built from the same
/// predicates, so the count always describes the set the page is cut from.
///
/// # Contract
/// - `count` honours every predicate and ignores ordering and paging
/// - `fetch` honours predicates, then ordering, then `skip`/`take`
/// - without an ordering, records come back in the source's natural order
/// - a null field value never satisfies an equality or text predicate
#[async_trait]
pub trait RecordSource<R: LookupRecord>: Send + Sync {
    /// Number of records matching the query's predicates
    async fn count(&self, query: &LookupQuery<R>) -> Result<usize>;

    /// Records matching the query, ordered and paged
    async fn fetch(&self, query: &LookupQuery<R>) -> Result<Vec<R>>;
}
