//! Browser state and view model computation.
//!
//! [`AppState`] is the single source of truth for one dataset browser: which
//! dataset is selected, the query being built, the committed results and the
//! detail view. The event handler mutates it; the presentation layer only ever
//! sees the snapshot returned by [`AppState::compute_viewmodel`].

use super::actions::Action;
use super::builder::{QueryBuilder, QueryChange};
use super::modes::DetailView;
use super::store::ResultStore;
use crate::domain::error::Result;
use crate::domain::{Item, Query};
use crate::source::{DatasetConfig, DatasetRegistry};
use crate::ui::viewmodel::{BrowserViewModel, DetailViewModel, QueryViewModel, ResultViewModel};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Central browser state container.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Datasets that can be selected.
    pub registry: DatasetRegistry,

    /// The selected dataset.
    pub dataset: Arc<DatasetConfig>,

    /// Query under construction for the selected dataset.
    pub builder: QueryBuilder,

    /// Results of the latest accepted fetch.
    pub store: ResultStore,

    /// Detail view of a selected item.
    pub detail: DetailView,

    lookups_issued: u64,
}

impl AppState {
    /// Creates a browser on `dataset` with its default query and no results.
    #[must_use]
    pub fn new(registry: DatasetRegistry, dataset: Arc<DatasetConfig>) -> Self {
        Self {
            registry,
            builder: QueryBuilder::for_dataset(&dataset),
            dataset,
            store: ResultStore::new(),
            detail: DetailView::Closed,
            lookups_issued: 0,
        }
    }

    /// The active query.
    #[must_use]
    pub const fn query(&self) -> &Query {
        self.builder.query()
    }

    /// Action that (re)schedules the fetch of the active query.
    #[must_use]
    pub fn fetch_action(&self) -> Action {
        Action::ScheduleFetch {
            dataset: Arc::clone(&self.dataset),
            query: self.builder.build(),
        }
    }

    /// Switches to the dataset registered under `key` and resets the query.
    ///
    /// The committed results stay visible until the new dataset's first page
    /// arrives.
    ///
    /// # Errors
    ///
    /// Returns `DexError::UnknownDataset` if no dataset has that key.
    pub fn select_dataset(&mut self, key: &str) -> Result<QueryChange> {
        if self.dataset.key == key {
            return Ok(QueryChange::Unchanged);
        }
        let dataset = self.registry.get(key)?;
        tracing::debug!(from = %self.dataset.key, to = %dataset.key, "dataset selected");

        let change = self.builder.reset(&dataset);
        self.dataset = dataset;
        Ok(match change {
            QueryChange::Unchanged => QueryChange::Dimensions,
            other => other,
        })
    }

    /// Opens the detail view on `item` and returns the neighbour lookup for it.
    ///
    /// Items without an identifier open with no lookup; their neighbours stay
    /// unknown.
    pub fn open_detail(&mut self, item: Item) -> Option<Action> {
        let item_id = item.id(&self.dataset.id_field);
        let Some(id) = item_id.clone() else {
            tracing::debug!(id_field = %self.dataset.id_field, "selected item has no id");
            self.detail.open(item, None, None);
            return None;
        };

        let seq = self.next_lookup();
        self.detail.open(item, item_id, Some(seq));
        Some(self.lookup_action(seq, id))
    }

    /// Re-runs the neighbour lookup of the open item against the active query.
    pub fn refresh_adjacency(&mut self) -> Option<Action> {
        let id = self.detail.current()?.item_id.clone()?;
        let seq = self.next_lookup();
        self.detail.await_adjacency(seq);
        Some(self.lookup_action(seq, id))
    }

    fn next_lookup(&mut self) -> u64 {
        self.lookups_issued += 1;
        self.lookups_issued
    }

    fn lookup_action(&self, seq: u64, item_id: String) -> Action {
        Action::ResolveAdjacency {
            seq,
            dataset: Arc::clone(&self.dataset),
            item_id,
            query: self.builder.build(),
        }
    }

    /// Computes the snapshot shown to the presentation layer.
    #[must_use]
    pub fn compute_viewmodel(&self) -> BrowserViewModel {
        self.compute_viewmodel_at(Utc::now())
    }

    /// Same as [`compute_viewmodel`](Self::compute_viewmodel) with an explicit clock.
    #[must_use]
    pub fn compute_viewmodel_at(&self, now: DateTime<Utc>) -> BrowserViewModel {
        BrowserViewModel {
            query: self.compute_query(),
            results: self.compute_results(now),
            detail: self.compute_detail(),
        }
    }

    fn compute_query(&self) -> QueryViewModel {
        let query = self.builder.query();
        QueryViewModel {
            dataset: self.dataset.key.clone(),
            dataset_name: self.dataset.name.clone(),
            search_text: query.search_text.clone(),
            filters: query.filters.clone(),
            sort_field: query.sort_field.clone(),
            sort_order: query.sort_order,
            page: query.page,
            page_size: query.page_size,
            filter_options: self.dataset.filter_options(),
        }
    }

    fn compute_results(&self, now: DateTime<Utc>) -> ResultViewModel {
        ResultViewModel {
            items: self.store.items().to_vec(),
            total: self.store.total(),
            total_pages: self.store.total_pages(),
            loading: self.store.loading(),
            error: self.store.error().map(str::to_string),
            updated: self.store.updated_label(now),
        }
    }

    fn compute_detail(&self) -> Option<DetailViewModel> {
        self.detail.current().map(|detail| DetailViewModel {
            selected_item: detail.item.clone(),
            previous: detail.adjacency.previous.clone(),
            next: detail.adjacency.next.clone(),
            current_index: detail.adjacency.current_index,
            total_count: detail.adjacency.total_count,
            adjacency_loading: detail.pending.is_some(),
        })
    }
}
