#![allow(dead_code)]

use dexquery::source::{DataSource, DatasetConfig, MemorySource};
use dexquery::{AdjacencyResult, Browser, Config, DexError, Item, Query, Result, ResultPage};
use futures_util::future::BoxFuture;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Memory-backed source that records calls and can be slowed down or broken.
#[derive(Default)]
pub struct ScriptedSource {
    inner: MemorySource,
    calls: Mutex<Vec<Query>>,
    delays: Mutex<HashMap<String, Duration>>,
    failing: AtomicBool,
    adjacency_failing: AtomicBool,
}

impl ScriptedSource {
    pub fn new(inner: MemorySource) -> Arc<Self> {
        Arc::new(Self {
            inner,
            ..Self::default()
        })
    }

    /// Delays every page fetch whose search text is `search`.
    pub fn delay(&self, search: &str, delay: Duration) {
        self.delays
            .lock()
            .expect("delays lock")
            .insert(search.to_string(), delay);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_adjacency_failing(&self, failing: bool) {
        self.adjacency_failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Query> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().expect("calls lock").clear();
    }
}

impl DataSource for ScriptedSource {
    fn fetch_page<'a>(
        &'a self,
        dataset: &'a DatasetConfig,
        query: &'a Query,
    ) -> BoxFuture<'a, Result<ResultPage>> {
        Box::pin(async move {
            self.calls.lock().expect("calls lock").push(query.clone());
            let delay = self
                .delays
                .lock()
                .expect("delays lock")
                .get(&query.search_text)
                .copied();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if self.failing.load(Ordering::SeqCst) {
                return Err(DexError::Unavailable("scripted outage".to_string()));
            }
            self.inner.fetch_page(dataset, query).await
        })
    }

    fn fetch_adjacent<'a>(
        &'a self,
        dataset: &'a DatasetConfig,
        item_id: &'a str,
        query: &'a Query,
    ) -> BoxFuture<'a, Result<AdjacencyResult>> {
        Box::pin(async move {
            if self.adjacency_failing.load(Ordering::SeqCst) {
                return Err(DexError::Unavailable("scripted outage".to_string()));
            }
            self.inner.fetch_adjacent(dataset, item_id, query).await
        })
    }
}

/// `count` abilities named "Ability 01".., alternating Fire and Water.
pub fn abilities(count: usize) -> Vec<Item> {
    (1..=count)
        .map(|n| {
            let kind = if n % 2 == 0 { "Water" } else { "Fire" };
            Item::from_value(json!({ "name": format!("Ability {n:02}"), "type": kind }))
                .expect("ability object")
        })
        .collect()
}

/// `count` nexomon numbered 1..=count.
pub fn nexomon(count: u64) -> Vec<Item> {
    (1..=count)
        .map(|nr| {
            Item::from_value(json!({ "nr": nr, "name": format!("Nexomon {nr}") }))
                .expect("nexomon object")
        })
        .collect()
}

pub fn library(ability_count: usize, nexomon_count: u64) -> MemorySource {
    MemorySource::new()
        .with_items("abilities", abilities(ability_count))
        .with_items("nexomon", nexomon(nexomon_count))
}

pub fn browser(source: Arc<ScriptedSource>, dataset: &str) -> Browser {
    let config = Config {
        default_dataset: dataset.to_string(),
        ..Config::default()
    };
    Browser::new(&config, source).expect("browser")
}

/// Browser with its first page loaded and the call log cleared.
pub async fn loaded_browser(source: &Arc<ScriptedSource>, dataset: &str) -> Browser {
    let mut browser = browser(Arc::clone(source), dataset);
    browser.start().expect("start");
    browser.settle().await.expect("settle");
    source.clear_calls();
    browser
}

pub fn names(items: &[Item]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.text("name").map(str::to_string))
        .collect()
}

pub fn id(item: Option<&Item>, field: &str) -> Option<String> {
    item.and_then(|item| item.id(field))
}
