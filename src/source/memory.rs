//! In-memory data source.
//!
//! Answers queries over item sets held in memory, typically loaded from a JSON
//! file. The whole dataset is filtered and sorted per request, which is fine for
//! the few thousand entries a species list holds.
//!
//! # File Format
//!
//! ```json
//! {
//!   "abilities": [
//!     { "name": "Blaze", "type": "Fire", "effect": "..." }
//!   ],
//!   "nexomon": [
//!     { "nr": 1, "name": "Drakling", "typePrimary": "Fire" }
//!   ]
//! }
//! ```

use crate::domain::error::{DexError, Result};
use crate::domain::item::render_key;
use crate::domain::{AdjacencyResult, Item, Query, ResultPage, SortOrder};
use crate::source::backend::DataSource;
use crate::source::datasets::{DatasetConfig, FilterKind};
use futures_util::future::BoxFuture;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

/// Data source backed by items held in memory, keyed by dataset.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    datasets: HashMap<String, Vec<Item>>,
}

impl MemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the items of `dataset`.
    #[must_use]
    pub fn with_items(mut self, dataset: impl Into<String>, items: Vec<Item>) -> Self {
        self.insert(dataset, items);
        self
    }

    /// Replaces the items of `dataset`.
    pub fn insert(&mut self, dataset: impl Into<String>, items: Vec<Item>) {
        let dataset = dataset.into();
        tracing::debug!(dataset = %dataset, item_count = items.len(), "loading items");
        self.datasets.insert(dataset, items);
    }

    /// Parses a JSON document mapping dataset keys to item arrays.
    ///
    /// Array entries that are not JSON objects are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON or not an object of arrays.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: HashMap<String, Vec<Value>> = serde_json::from_str(json)?;
        let mut source = Self::new();
        for (dataset, values) in raw {
            let items = values.into_iter().filter_map(Item::from_value).collect();
            source.insert(dataset, items);
        }
        Ok(source)
    }

    /// Loads a JSON dataset file (see the module docs for the format).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "reading dataset file");
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Returns every item of `dataset` matching `query`, in query order.
    fn ordered(&self, dataset: &DatasetConfig, query: &Query) -> Result<Vec<Item>> {
        let items = self.datasets.get(&dataset.key).ok_or_else(|| {
            DexError::Unavailable(format!("no items loaded for dataset {}", dataset.key))
        })?;

        let needle = query.search_text.trim().to_lowercase();

        let mut matched: Vec<Item> = items
            .iter()
            .filter(|item| {
                needle.is_empty()
                    || item
                        .text(&dataset.name_field)
                        .is_some_and(|name| name.to_lowercase().contains(&needle))
            })
            .filter(|item| {
                query
                    .filters
                    .iter()
                    .filter(|(_, value)| !value.is_empty())
                    .all(|(key, value)| matches_filter(item, dataset, key, value))
            })
            .cloned()
            .collect();

        matched.sort_by(|a, b| {
            compare_values(
                a.field(&query.sort_field),
                b.field(&query.sort_field),
                query.sort_order,
            )
        });

        Ok(matched)
    }
}

impl DataSource for MemorySource {
    fn fetch_page<'a>(
        &'a self,
        dataset: &'a DatasetConfig,
        query: &'a Query,
    ) -> BoxFuture<'a, Result<ResultPage>> {
        Box::pin(async move {
            let ordered = self.ordered(dataset, query)?;
            let total = ordered.len() as u64;
            let items: Vec<Item> = ordered
                .into_iter()
                .skip(query.offset())
                .take(query.page_size as usize)
                .collect();

            tracing::trace!(
                dataset = %dataset.key,
                page = query.page,
                returned = items.len(),
                total = total,
                "memory page served"
            );

            Ok(ResultPage::new(items, total, query.page_size))
        })
    }

    /// Looks the item up in the full ordering, without the default lookup cap.
    fn fetch_adjacent<'a>(
        &'a self,
        dataset: &'a DatasetConfig,
        item_id: &'a str,
        query: &'a Query,
    ) -> BoxFuture<'a, Result<AdjacencyResult>> {
        Box::pin(async move {
            let ordered = self.ordered(dataset, query)?;
            Ok(AdjacencyResult::locate(&ordered, &dataset.id_field, item_id))
        })
    }
}

fn matches_filter(item: &Item, dataset: &DatasetConfig, key: &str, value: &str) -> bool {
    let (fields, kind) = dataset
        .filter(key)
        .map_or_else(|| (vec![key], FilterKind::Choice), |f| (f.target_fields(), f.kind));

    match kind {
        FilterKind::Boolean => {
            let wanted = value.eq_ignore_ascii_case("true");
            let actual = fields
                .iter()
                .any(|field| item.field(field).is_some_and(is_truthy));
            actual == wanted
        }
        FilterKind::Choice => fields.iter().any(|field| match item.field(field) {
            Some(Value::Array(values)) => values.iter().any(|v| equals_ignore_case(v, value)),
            Some(v) => equals_ignore_case(v, value),
            None => false,
        }),
    }
}

fn equals_ignore_case(candidate: &Value, value: &str) -> bool {
    render_key(candidate).is_some_and(|s| s.eq_ignore_ascii_case(value))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(s.to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
        _ => false,
    }
}

/// Sortable projection of a field value. Numbers (and numeric strings such as
/// `"007"`) order numerically and before text.
#[derive(Debug, PartialEq)]
enum SortKey {
    Number(f64),
    Text(String),
}

impl SortKey {
    fn of(value: Option<&Value>) -> Option<Self> {
        match value? {
            Value::Null => None,
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::String(s) => Some(
                s.trim()
                    .parse::<f64>()
                    .map_or_else(|_| Self::Text(s.to_lowercase()), Self::Number),
            ),
            Value::Bool(b) => Some(Self::Number(if *b { 1.0 } else { 0.0 })),
            other => Some(Self::Text(other.to_string())),
        }
    }

    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
        }
    }
}

/// Orders two field values; items missing the field sort last in both directions.
fn compare_values(a: Option<&Value>, b: Option<&Value>, order: SortOrder) -> Ordering {
    match (SortKey::of(a), SortKey::of(b)) {
        (Some(a), Some(b)) => match order {
            SortOrder::Ascending => a.cmp(&b),
            SortOrder::Descending => b.cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
