//! The browser driver: state, fetch coordinator and response channel in one.
//!
//! [`Browser`] is what a presentation layer talks to. Intents go in through
//! [`Browser::dispatch`]; worker responses are pulled with
//! [`Browser::next_response`] (or drained with [`Browser::settle`]) and fed
//! back through the same event handler. Snapshots come out of
//! [`Browser::viewmodel`].
//!
//! The driver must live inside a tokio runtime, and is meant for a
//! current-thread one: state is only touched from the task that owns it.

use crate::app::{handle_event, Action, AppState, Event};
use crate::domain::error::Result;
use crate::source::{DataSource, DatasetRegistry};
use crate::ui::viewmodel::BrowserViewModel;
use crate::worker::{DexWorker, FetchCoordinator, WorkerHandle, WorkerMessage, WorkerResponse};
use crate::Config;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// One dataset browser bound to a data source.
#[derive(Debug)]
pub struct Browser {
    state: AppState,
    coordinator: FetchCoordinator,
    worker: WorkerHandle,
    responses: UnboundedReceiver<WorkerResponse>,
}

impl Browser {
    /// Creates a browser on the configured default dataset.
    ///
    /// Nothing is fetched until [`start`](Self::start) or the first intent.
    ///
    /// # Errors
    ///
    /// Returns `DexError::UnknownDataset` if `config.default_dataset` is not
    /// registered.
    pub fn new(config: &Config, source: Arc<dyn DataSource>) -> Result<Self> {
        Self::with_registry(config, config.registry(), source)
    }

    /// Creates a browser over an explicit dataset registry.
    ///
    /// # Errors
    ///
    /// Returns `DexError::UnknownDataset` if `config.default_dataset` is not
    /// in `registry`.
    pub fn with_registry(
        config: &Config,
        registry: DatasetRegistry,
        source: Arc<dyn DataSource>,
    ) -> Result<Self> {
        let dataset = registry.get(&config.default_dataset)?;
        tracing::debug!(
            dataset = %dataset.key,
            debounce_ms = config.debounce_ms,
            "creating browser"
        );

        let (tx, responses) = mpsc::unbounded_channel();
        let worker = WorkerHandle::new(DexWorker::new(source), tx);
        let coordinator = FetchCoordinator::new(worker.clone(), config.debounce());

        Ok(Self {
            state: AppState::new(registry, dataset),
            coordinator,
            worker,
            responses,
        })
    }

    /// Schedules the first fetch of the default query.
    ///
    /// # Errors
    ///
    /// Propagates handler errors (none are expected for this event).
    pub fn start(&mut self) -> Result<bool> {
        self.dispatch(&Event::Retry)
    }

    /// Applies an event and runs the actions it produces.
    ///
    /// Returns `true` if the snapshot changed.
    ///
    /// # Errors
    ///
    /// Returns `DexError::UnknownDataset` for an unknown `SelectDataset` key;
    /// the state is left unchanged in that case.
    pub fn dispatch(&mut self, event: &Event) -> Result<bool> {
        let (render, actions) = handle_event(&mut self.state, event)?;
        for action in actions {
            self.execute(action);
        }
        Ok(render)
    }

    fn execute(&mut self, action: Action) {
        match action {
            Action::ScheduleFetch { dataset, query } => self.coordinator.schedule(dataset, query),
            Action::ResolveAdjacency {
                seq,
                dataset,
                item_id,
                query,
            } => self.worker.post(WorkerMessage::ResolveAdjacency {
                seq,
                dataset,
                item_id,
                query,
            }),
        }
    }

    /// Waits for the next worker response.
    ///
    /// Returns `None` only if every sender is gone, which cannot happen while
    /// the browser is alive.
    pub async fn next_response(&mut self) -> Option<WorkerResponse> {
        self.responses.recv().await
    }

    /// Waits for one worker response and applies it.
    ///
    /// # Errors
    ///
    /// Propagates handler errors.
    pub async fn step(&mut self) -> Result<bool> {
        match self.responses.recv().await {
            Some(response) => self.dispatch(&Event::WorkerResponse(response)),
            None => Ok(false),
        }
    }

    /// Returns `true` while a debounced fetch is waiting or any request is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.coordinator.is_pending() || self.worker.in_flight() > 0
    }

    /// Applies responses until no timer is pending and nothing is in flight.
    ///
    /// Returns `true` if any applied response changed the snapshot.
    ///
    /// # Errors
    ///
    /// Propagates handler errors.
    pub async fn settle(&mut self) -> Result<bool> {
        let mut rendered = false;
        loop {
            while let Ok(response) = self.responses.try_recv() {
                rendered |= self.dispatch(&Event::WorkerResponse(response))?;
            }
            if !self.is_busy() {
                return Ok(rendered);
            }
            match self.responses.recv().await {
                Some(response) => rendered |= self.dispatch(&Event::WorkerResponse(response))?,
                None => return Ok(rendered),
            }
        }
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Snapshot for the presentation layer.
    #[must_use]
    pub fn viewmodel(&self) -> BrowserViewModel {
        self.state.compute_viewmodel()
    }

    /// Sequence number of the latest fetch the coordinator issued.
    #[must_use]
    pub fn last_issued(&self) -> u64 {
        self.coordinator.last_issued()
    }
}
