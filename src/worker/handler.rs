//! Fetch worker: runs data source calls as tokio tasks.
//!
//! [`DexWorker`] turns one [`WorkerMessage`] into one [`WorkerResponse`].
//! [`WorkerHandle`] spawns that work, counts the requests still in flight and
//! reports every response on a single channel, in completion order. Requests
//! are never aborted; answers nobody wants any more are filtered out later by
//! sequence number.

use crate::domain::error::Result;
use crate::domain::{Query, ResultPage};
use crate::source::{DataSource, DatasetConfig};
use crate::worker::navigator;
use crate::worker::{WorkerMessage, WorkerResponse};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::Instrument;

/// Executes worker messages against a data source.
#[derive(Clone)]
pub struct DexWorker {
    source: Arc<dyn DataSource>,
}

impl std::fmt::Debug for DexWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DexWorker").finish_non_exhaustive()
    }
}

impl DexWorker {
    #[must_use]
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source }
    }

    /// Maps a page fetch outcome to its response, logging failures.
    fn handle_fetch_result(
        seq: u64,
        dataset: &DatasetConfig,
        query: Query,
        result: Result<ResultPage>,
    ) -> WorkerResponse {
        match result {
            Ok(page) => {
                tracing::debug!(seq, items = page.items.len(), "page fetched");
                WorkerResponse::PageLoaded {
                    seq,
                    dataset: dataset.key.clone(),
                    query,
                    page,
                }
            }
            Err(e) => {
                tracing::warn!(seq, error = %e, "page fetch failed");
                WorkerResponse::PageFailed {
                    seq,
                    message: e.to_string(),
                }
            }
        }
    }

    /// Processes one message and returns its response.
    pub async fn handle_message(&self, message: WorkerMessage) -> WorkerResponse {
        match message {
            WorkerMessage::FetchPage {
                seq,
                dataset,
                query,
            } => {
                let result = self.source.fetch_page(&dataset, &query).await;
                Self::handle_fetch_result(seq, &dataset, query, result)
            }
            WorkerMessage::ResolveAdjacency {
                seq,
                dataset,
                item_id,
                query,
            } => {
                let result =
                    navigator::resolve(self.source.as_ref(), &dataset, &item_id, &query).await;
                WorkerResponse::AdjacencyResolved { seq, result }
            }
        }
    }
}

/// Spawns worker messages and reports their responses.
///
/// Cloning the handle shares the channel and the in-flight counter.
#[derive(Debug, Clone)]
pub struct WorkerHandle {
    worker: DexWorker,
    responses: UnboundedSender<WorkerResponse>,
    in_flight: Arc<AtomicUsize>,
}

impl WorkerHandle {
    #[must_use]
    pub fn new(worker: DexWorker, responses: UnboundedSender<WorkerResponse>) -> Self {
        Self {
            worker,
            responses,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Starts `message` on a new task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn post(&self, message: WorkerMessage) {
        let span = match &message {
            WorkerMessage::FetchPage { seq, dataset, .. } => {
                tracing::debug_span!("fetch_page", seq, dataset = %dataset.key)
            }
            WorkerMessage::ResolveAdjacency {
                seq,
                dataset,
                item_id,
                ..
            } => tracing::debug_span!("resolve_adjacency", seq, dataset = %dataset.key, item_id = %item_id),
        };

        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let this = self.clone();
        tokio::spawn(
            async move {
                let response = this.worker.handle_message(message).await;
                // Decrement and send within one poll so an idle handle never
                // has an unsent response.
                this.in_flight.fetch_sub(1, Ordering::SeqCst);
                this.report(response);
            }
            .instrument(span),
        );
    }

    /// Sends a response directly, without running anything.
    pub fn report(&self, response: WorkerResponse) {
        if self.responses.send(response).is_err() {
            tracing::debug!("response receiver dropped");
        }
    }

    /// Number of posted messages whose response has not been sent yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}
