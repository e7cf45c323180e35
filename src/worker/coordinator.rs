//! Fetch coordinator: debounces queries and sequence-tags the ones it sends.
//!
//! At most one timer is pending. Scheduling a query while a timer is armed
//! aborts that timer, so a burst of changes within the debounce window sends
//! only the last query. When the timer fires it takes the next sequence
//! number, reports [`WorkerResponse::FetchIssued`] and posts the fetch.
//!
//! ```text
//! schedule(q1) ─┐
//! schedule(q2) ─┼─ timer re-armed ── 300 ms ──▶ FetchIssued{n} ─▶ fetch(q3) ─▶ PageLoaded{n}
//! schedule(q3) ─┘
//! ```

use crate::domain::Query;
use crate::source::DatasetConfig;
use crate::worker::{WorkerHandle, WorkerMessage, WorkerResponse};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Default quiet period before a scheduled query is sent.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Debounced, sequence-tagged page fetching.
#[derive(Debug)]
pub struct FetchCoordinator {
    handle: WorkerHandle,
    delay: Duration,
    timer: Option<JoinHandle<()>>,
    issued: Arc<AtomicU64>,
}

impl FetchCoordinator {
    #[must_use]
    pub fn new(handle: WorkerHandle, delay: Duration) -> Self {
        Self {
            handle,
            delay,
            timer: None,
            issued: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Arms the timer for `query`, replacing any query still waiting.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, dataset: Arc<DatasetConfig>, query: Query) {
        if self.cancel_pending() {
            tracing::trace!("debounce timer re-armed");
        }

        let handle = self.handle.clone();
        let issued = Arc::clone(&self.issued);
        let delay = self.delay;

        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let seq = issued.fetch_add(1, Ordering::SeqCst) + 1;
            tracing::debug!(
                seq,
                dataset = %dataset.key,
                page = query.page,
                search = %query.search_text,
                sort = %query.sort_field,
                "fetch issued"
            );

            handle.report(WorkerResponse::FetchIssued { seq });
            handle.post(WorkerMessage::FetchPage {
                seq,
                dataset,
                query,
            });
        }));
    }

    /// Aborts the pending timer. Returns `true` if one was still waiting.
    pub fn cancel_pending(&mut self) -> bool {
        match self.timer.take() {
            Some(timer) => {
                let waiting = !timer.is_finished();
                timer.abort();
                waiting
            }
            None => false,
        }
    }

    /// Returns `true` while a scheduled query has not been sent yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    /// Sequence number of the most recently issued fetch.
    #[must_use]
    pub fn last_issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }
}

impl Drop for FetchCoordinator {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
