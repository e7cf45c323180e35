//! dexquery: the query and navigation core of a monster database browser.
//!
//! A presentation layer sends intents (search text, filters, sort, page,
//! dataset, item selection) and reads snapshots. dexquery turns those intents
//! into debounced, sequence-tagged fetches against a pluggable data source and
//! keeps the observable state consistent:
//! - bursts of changes within the debounce window send only the last query
//! - a slow response to an older query never overwrites a newer one
//! - fetch failures keep the previous results and raise an error flag
//! - the detail view knows the previous and next entry in the full ordering
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Presentation layer (main.rs CLI, or your own)      │  ← Intents / snapshots
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Browser driver (browser.rs)                        │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ App Layer     │   │ Worker Layer  │   │ Source Layer  │
//! │ (app/)        │   │ (worker/)     │   │ (source/)     │
//! │ - Query build │   │ - Debounce    │   │ - DataSource  │
//! │ - Result store│   │ - Sequencing  │   │ - API / memory│
//! │ - Detail view │   │ - Adjacency   │   │ - Datasets    │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (domain/): Item, Query, ResultPage, errors  │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: browser state machine with event/action model
//! - [`domain`]: core types (items, queries, pages, errors)
//! - [`source`]: data source trait, dataset catalogue, API and memory sources
//! - [`worker`]: debounced fetching and neighbour lookups on tokio tasks
//! - [`ui`]: snapshot types and a plain-text renderer
//! - [`observability`]: tracing subscriber setup
//!
//! # Example
//!
//! ```rust
//! use dexquery::source::MemorySource;
//! use dexquery::{Browser, Config, Event};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> dexquery::Result<()> {
//! let source = MemorySource::from_json_str(
//!     r#"{ "abilities": [{ "name": "Blaze", "type": "Fire" }] }"#,
//! )?;
//! let mut browser = Browser::new(&Config::default(), Arc::new(source))?;
//!
//! browser.start()?;
//! browser.dispatch(&Event::SetSearchText { text: "bla".into() })?;
//! browser.settle().await?;
//!
//! assert_eq!(browser.viewmodel().results.total, 1);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod browser;
pub mod domain;
pub mod observability;
pub mod source;
pub mod ui;
pub mod worker;

pub use app::{handle_event, Action, AppState, Event};
pub use browser::Browser;
pub use domain::{AdjacencyResult, DexError, Item, Query, Result, ResultPage, SortOrder};

use serde::{Deserialize, Serialize};
use source::{DatasetConfig, DatasetRegistry};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default debounce window in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Dataset shown when none is configured.
pub const DEFAULT_DATASET: &str = "abilities";

/// Browser configuration.
///
/// Loaded from a TOML file, from a flat key/value map, or left at defaults.
///
/// ```toml
/// debounce_ms = 250
/// default_dataset = "pokemon"
/// log_level = "debug"
/// log_file = "/tmp/dexquery.log"
///
/// [[datasets]]
/// key = "custom"
/// name = "Custom Dex"
/// endpoint = "/custom"
/// id_field = "id"
/// name_field = "name"
/// sort_default = "id"
/// page_size = 20
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Quiet period before a changed query is sent. Default: 300
    pub debounce_ms: u64,

    /// Key of the dataset shown first. Default: `"abilities"`
    pub default_dataset: String,

    /// Tracing filter directive (`trace`, `debug`, `info`, ...). `RUST_LOG`
    /// takes precedence. Default: `"info"`
    pub log_level: Option<String>,

    /// Log file path. Logs go to stderr when unset.
    pub log_file: Option<PathBuf>,

    /// Extra datasets, merged over the built-ins by key.
    pub datasets: Vec<DatasetConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            default_dataset: DEFAULT_DATASET.to_string(),
            log_level: None,
            log_file: None,
            datasets: Vec::new(),
        }
    }
}

impl Config {
    /// Applies `key=value` overrides on top of this configuration.
    ///
    /// Recognized keys are `debounce_ms`, `default_dataset`, `log_level` and
    /// `log_file`. Unknown keys are ignored and unparsable or blank values
    /// keep the current setting.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use dexquery::Config;
    ///
    /// let mut overrides = BTreeMap::new();
    /// overrides.insert("debounce_ms".to_string(), "150".to_string());
    /// overrides.insert("default_dataset".to_string(), "pals".to_string());
    ///
    /// let config = Config::default().with_overrides(&overrides);
    /// assert_eq!(config.debounce_ms, 150);
    /// assert_eq!(config.default_dataset, "pals");
    /// ```
    #[must_use]
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        if let Some(ms) = overrides
            .get("debounce_ms")
            .and_then(|s| s.trim().parse::<u64>().ok())
        {
            self.debounce_ms = ms;
        }

        if let Some(dataset) = overrides
            .get("default_dataset")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
        {
            self.default_dataset = dataset.to_string();
        }

        if let Some(level) = overrides.get("log_level").filter(|s| !s.trim().is_empty()) {
            self.log_level = Some(level.trim().to_string());
        }

        if let Some(file) = overrides.get("log_file").filter(|s| !s.trim().is_empty()) {
            self.log_file = Some(PathBuf::from(file.trim()));
        }

        for key in overrides.keys() {
            if !matches!(
                key.as_str(),
                "debounce_ms" | "default_dataset" | "log_level" | "log_file"
            ) {
                tracing::warn!(key = %key, "ignoring unknown configuration key");
            }
        }

        self
    }

    /// Checks the configured datasets.
    ///
    /// # Errors
    ///
    /// Returns `DexError::Config` for a dataset with an empty key or id field,
    /// or a page size of zero.
    pub fn validate(&self) -> Result<()> {
        for dataset in &self.datasets {
            if dataset.key.trim().is_empty() {
                return Err(DexError::Config("dataset with an empty key".to_string()));
            }
            if dataset.id_field.trim().is_empty() {
                return Err(DexError::Config(format!(
                    "dataset {} has no id_field",
                    dataset.key
                )));
            }
            if dataset.page_size == 0 {
                return Err(DexError::Config(format!(
                    "dataset {} has page_size 0",
                    dataset.key
                )));
            }
        }
        Ok(())
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `DexError::Toml` if the text is not valid configuration and
    /// `DexError::Config` if a declared dataset fails [`validate`](Self::validate).
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `DexError::Io` if the file cannot be read and `DexError::Toml`
    /// if it cannot be parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "loading configuration");
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Built-in datasets plus the configured ones.
    #[must_use]
    pub fn registry(&self) -> DatasetRegistry {
        let mut registry = DatasetRegistry::builtin();
        registry.extend(self.datasets.iter().cloned());
        registry
    }

    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Builds the initial browser state for `config`.
///
/// # Errors
///
/// Returns `DexError::UnknownDataset` if the default dataset is not registered.
///
/// # Example
///
/// ```rust
/// use dexquery::{initialize, Config};
///
/// let state = initialize(&Config::default())?;
/// assert_eq!(state.dataset.key, "abilities");
/// # Ok::<(), dexquery::DexError>(())
/// ```
pub fn initialize(config: &Config) -> Result<AppState> {
    tracing::debug!(dataset = %config.default_dataset, "initializing browser state");
    let registry = config.registry();
    let dataset = registry.get(&config.default_dataset)?;
    Ok(AppState::new(registry, dataset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_fall_back_per_key() {
        let base = Config {
            debounce_ms: 120,
            default_dataset: "pokemon".to_string(),
            ..Config::default()
        };
        let mut map = BTreeMap::new();
        map.insert("debounce_ms".to_string(), "soon".to_string());
        map.insert("default_dataset".to_string(), "  ".to_string());
        map.insert("log_level".to_string(), "trace".to_string());
        map.insert("colour".to_string(), "blue".to_string());

        let config = base.with_overrides(&map);
        assert_eq!(config.debounce_ms, 120);
        assert_eq!(config.default_dataset, "pokemon");
        assert_eq!(config.log_level.as_deref(), Some("trace"));
        assert!(config.log_file.is_none());
    }

    #[test]
    fn dataset_with_zero_page_size_is_rejected() {
        let err = Config::from_toml_str(
            r#"
            [[datasets]]
            key = "broken"
            name = "Broken"
            endpoint = "/broken"
            id_field = "id"
            name_field = "name"
            sort_default = "id"
            page_size = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, DexError::Config(msg) if msg.contains("broken")));
    }

    #[test]
    fn toml_datasets_merge_over_builtins() {
        let config = Config::from_toml_str(
            r#"
            default_dataset = "custom"

            [[datasets]]
            key = "custom"
            name = "Custom Dex"
            endpoint = "/custom"
            id_field = "id"
            name_field = "title"
            sort_default = "id"
            page_size = 12

            [[datasets]]
            key = "pals"
            name = "Pals"
            endpoint = "/palworld"
            id_field = "id"
            name_field = "name"
            sort_default = "id"
            page_size = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
        let registry = config.registry();
        assert_eq!(registry.get("custom").unwrap().page_size, 12);
        assert_eq!(registry.get("pals").unwrap().endpoint, "/palworld");
        assert!(registry.get("digimon").is_ok());
        assert_eq!(initialize(&config).unwrap().dataset.key, "custom");
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let err = Config::from_toml_str("debounce_ms = \"fast\"").unwrap_err();
        assert!(matches!(err, DexError::Toml(_)));
    }

    #[test]
    fn config_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dexquery.toml");
        std::fs::write(&path, "debounce_ms = 50\n").unwrap();

        assert_eq!(Config::from_file(&path).unwrap().debounce(), Duration::from_millis(50));
        assert!(matches!(
            Config::from_file(dir.path().join("missing.toml")),
            Err(DexError::Io(_))
        ));
    }
}
