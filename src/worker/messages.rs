//! Request and response types exchanged with the fetch worker.
//!
//! Every request carries a sequence number assigned when it was issued; the
//! matching response echoes it so the state handler can tell current answers
//! from superseded ones.

use crate::domain::{AdjacencyResult, Query, ResultPage};
use crate::source::DatasetConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Work handed to the worker.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerMessage {
    /// Fetch one page of a dataset.
    FetchPage {
        seq: u64,
        dataset: Arc<DatasetConfig>,
        query: Query,
    },

    /// Find the neighbours of an item in the ordering of a query.
    ResolveAdjacency {
        seq: u64,
        dataset: Arc<DatasetConfig>,
        item_id: String,
        query: Query,
    },
}

/// Outcomes reported back to the state handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkerResponse {
    /// A debounced fetch left the timer and is now in flight.
    FetchIssued {
        seq: u64,
    },

    /// A fetch succeeded.
    PageLoaded {
        seq: u64,

        /// Dataset key and query the page answers.
        dataset: String,
        query: Query,
        page: ResultPage,
    },

    /// A fetch failed.
    PageFailed {
        seq: u64,

        /// Diagnostic detail, for logs only.
        message: String,
    },

    /// A neighbour lookup finished. Lookups never fail; a failed one resolves
    /// to [`AdjacencyResult::unavailable`].
    AdjacencyResolved {
        seq: u64,
        result: AdjacencyResult,
    },
}
