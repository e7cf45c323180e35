//! Snapshot types handed to the presentation layer.
//!
//! View models are computed from [`AppState`](crate::app::AppState) on demand
//! and carry no behaviour, only display-ready data. They serialize to JSON so a
//! presentation layer in another process can consume them as-is.

use crate::domain::{Item, SortOrder};
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything a presentation layer needs to draw the browser.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowserViewModel {
    pub query: QueryViewModel,
    pub results: ResultViewModel,

    /// Present only while a detail view is open.
    pub detail: Option<DetailViewModel>,
}

/// The active query and the controls that shape it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryViewModel {
    /// Key of the selected dataset.
    pub dataset: String,

    /// Display name of the selected dataset.
    pub dataset_name: String,

    pub search_text: String,
    pub filters: BTreeMap<String, String>,
    pub sort_field: String,
    pub sort_order: SortOrder,
    pub page: u32,
    pub page_size: u32,

    /// Fixed option lists for choice filters, keyed by filter key.
    pub filter_options: BTreeMap<String, Vec<String>>,
}

/// The committed page and its fetch status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultViewModel {
    pub items: Vec<Item>,
    pub total: u64,
    pub total_pages: u32,
    pub loading: bool,
    pub error: Option<String>,

    /// Age of the committed page, e.g. "just now" or "5m ago".
    pub updated: Option<String>,
}

/// The selected item and its neighbours.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailViewModel {
    pub selected_item: Item,
    pub previous: Option<Item>,
    pub next: Option<Item>,
    pub current_index: Option<usize>,
    pub total_count: Option<usize>,

    /// `true` while the neighbour lookup for the selected item is outstanding.
    pub adjacency_loading: bool,
}
