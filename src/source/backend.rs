//! Data source abstraction.
//!
//! This module defines the [`DataSource`] trait the fetch coordinator and the
//! adjacency navigator talk to. The trait is deliberately minimal: one call per
//! use case, no generic ORM. Implementations decide how a query is answered:
//! over the network ([`ApiSource`](super::ApiSource)) or from items held in
//! memory ([`MemorySource`](super::MemorySource)).

use crate::domain::error::Result;
use crate::domain::{AdjacencyResult, Query, ResultPage};
use crate::source::datasets::DatasetConfig;
use futures_util::future::BoxFuture;

/// Maximum number of items the default adjacency lookup requests.
///
/// Orderings longer than this cannot resolve neighbours for items past the cap.
pub const ADJACENCY_LOOKUP_LIMIT: u32 = 1000;

/// Abstraction over the backend that answers dataset queries.
///
/// Every failure is reported as [`DexError::Unavailable`](crate::DexError::Unavailable);
/// callers never need to distinguish transport from server problems.
///
/// # Examples
///
/// ```no_run
/// use dexquery::source::{DataSource, DatasetRegistry, MemorySource};
/// use dexquery::Query;
///
/// # async fn run() -> dexquery::Result<()> {
/// let registry = DatasetRegistry::builtin();
/// let abilities = registry.get("abilities")?;
/// let source = MemorySource::from_json_file("abilities.json")?;
///
/// let page = source.fetch_page(&abilities, &Query::new("name", 24)).await?;
/// println!("{} abilities", page.total_items);
/// # Ok(())
/// # }
/// ```
pub trait DataSource: Send + Sync {
    /// Fetches the page of `dataset` described by `query`.
    ///
    /// # Errors
    ///
    /// Returns `DexError::Unavailable` if the source cannot answer.
    fn fetch_page<'a>(
        &'a self,
        dataset: &'a DatasetConfig,
        query: &'a Query,
    ) -> BoxFuture<'a, Result<ResultPage>>;

    /// Finds the neighbours of `item_id` in the full ordering selected by `query`.
    ///
    /// The default implementation requests the first [`ADJACENCY_LOOKUP_LIMIT`]
    /// items of the ordering and locates the item among them. `query.page` and
    /// `query.page_size` are ignored.
    ///
    /// # Errors
    ///
    /// Returns `DexError::Unavailable` if the lookup fails.
    fn fetch_adjacent<'a>(
        &'a self,
        dataset: &'a DatasetConfig,
        item_id: &'a str,
        query: &'a Query,
    ) -> BoxFuture<'a, Result<AdjacencyResult>> {
        Box::pin(async move {
            let lookup = query.for_lookup(ADJACENCY_LOOKUP_LIMIT);
            let page = self.fetch_page(dataset, &lookup).await?;
            Ok(AdjacencyResult::locate(&page.items, &dataset.id_field, item_id))
        })
    }
}
