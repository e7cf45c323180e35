//! Dataset catalogue.
//!
//! Each database page browses one dataset: the ability list or the species list
//! of one franchise. A [`DatasetConfig`] carries everything the core needs to
//! query it: endpoint, identifying and display fields, default sort, page size,
//! and the filters the page offers.

use crate::domain::error::{DexError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Page size of the ability database.
pub const ABILITY_PAGE_SIZE: u32 = 24;

/// Page size of the species databases.
pub const SPECIES_PAGE_SIZE: u32 = 30;

/// How a filter's value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// Value compared case-insensitively with the item field.
    #[default]
    Choice,

    /// `"true"`/`"false"` compared with a boolean item field.
    Boolean,
}

/// One filter a dataset page offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Key used in the query and in API parameters.
    pub key: String,

    /// Human-readable label.
    pub label: String,

    /// Item fields the filter matches against; an item passes if any of them matches.
    ///
    /// Empty means "the field named like the key".
    #[serde(default)]
    pub fields: Vec<String>,

    /// Fixed option list, when the options are not discovered from the data.
    #[serde(default)]
    pub options: Option<Vec<String>>,

    /// Interpretation of the filter value.
    #[serde(default)]
    pub kind: FilterKind,
}

impl FilterConfig {
    fn choice(key: &str, label: &str, fields: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            fields: fields.iter().map(|f| (*f).to_string()).collect(),
            options: None,
            kind: FilterKind::Choice,
        }
    }

    fn boolean(key: &str, label: &str, field: &str) -> Self {
        Self {
            kind: FilterKind::Boolean,
            ..Self::choice(key, label, &[field])
        }
    }

    fn with_options(mut self, options: &[&str]) -> Self {
        self.options = Some(options.iter().map(|o| (*o).to_string()).collect());
        self
    }

    /// Item fields this filter inspects.
    #[must_use]
    pub fn target_fields(&self) -> Vec<&str> {
        if self.fields.is_empty() {
            vec![self.key.as_str()]
        } else {
            self.fields.iter().map(String::as_str).collect()
        }
    }
}

/// Static description of one browsable dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Registry key (`abilities`, `pokemon`, `fakemon`, ...).
    pub key: String,

    /// Display name.
    pub name: String,

    /// API endpoint the list is served from.
    pub endpoint: String,

    /// Field identifying an item within the dataset.
    pub id_field: String,

    /// Field holding the item name; the search text matches against it.
    pub name_field: String,

    /// Sort field used when none is chosen.
    pub sort_default: String,

    /// Items per page.
    pub page_size: u32,

    /// Response key holding the item list for endpoints that do not use `data`.
    #[serde(default)]
    pub collection_key: Option<String>,

    /// Filters offered on the page.
    #[serde(default)]
    pub filters: Vec<FilterConfig>,
}

impl DatasetConfig {
    fn species(key: &str, name: &str, id_field: &str, sort_default: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            endpoint: format!("/{key}-monsters"),
            id_field: id_field.to_string(),
            name_field: "name".to_string(),
            sort_default: sort_default.to_string(),
            page_size: SPECIES_PAGE_SIZE,
            collection_key: None,
            filters: Vec::new(),
        }
    }

    fn with_filters(mut self, filters: Vec<FilterConfig>) -> Self {
        self.filters = filters;
        self
    }

    /// Looks up the filter definition for `key`.
    #[must_use]
    pub fn filter(&self, key: &str) -> Option<&FilterConfig> {
        self.filters.iter().find(|f| f.key == key)
    }

    /// Returns the fixed option lists of the filters that have one.
    ///
    /// Filters whose options come from the data are left out.
    #[must_use]
    pub fn filter_options(&self) -> BTreeMap<String, Vec<String>> {
        self.filters
            .iter()
            .filter_map(|f| f.options.clone().map(|options| (f.key.clone(), options)))
            .collect()
    }
}

/// The ability database plus the species database of every supported franchise.
#[must_use]
pub fn builtin_datasets() -> Vec<DatasetConfig> {
    vec![
        DatasetConfig {
            key: "abilities".to_string(),
            name: "Abilities".to_string(),
            endpoint: "/abilities".to_string(),
            id_field: "name".to_string(),
            name_field: "name".to_string(),
            sort_default: "name".to_string(),
            page_size: ABILITY_PAGE_SIZE,
            collection_key: Some("abilities".to_string()),
            filters: vec![FilterConfig::choice("type", "Type", &["type", "secondaryType"])],
        },
        DatasetConfig::species("pokemon", "Pokemon", "id", "ndex").with_filters(vec![
            FilterConfig::choice("type", "Type", &["typePrimary", "typeSecondary"]),
            FilterConfig::choice("stage", "Stage", &["stage"]).with_options(&[
                "Base Stage",
                "Middle Stage",
                "Final Stage",
                "Doesn't Evolve",
            ]),
            FilterConfig::boolean("legendary", "Legendary", "isLegendary"),
            FilterConfig::boolean("mythical", "Mythical", "isMythical"),
        ]),
        DatasetConfig::species("digimon", "Digimon", "id", "name").with_filters(vec![
            FilterConfig::choice("rank", "Rank", &["rank"]),
            FilterConfig::choice("attribute", "Attribute", &["attribute"]),
        ]),
        DatasetConfig::species("nexomon", "Nexomon", "nr", "nr").with_filters(vec![
            FilterConfig::choice("type", "Type", &["typePrimary", "typeSecondary"]),
            FilterConfig::choice("stage", "Stage", &["stage"]),
            FilterConfig::boolean("legendary", "Legendary", "isLegendary"),
        ]),
        DatasetConfig::species("yokai", "Yokai Watch", "id", "name").with_filters(vec![
            FilterConfig::choice("tribe", "Tribe", &["tribe"]),
            FilterConfig::choice("rank", "Rank", &["rank"]),
            FilterConfig::choice("stage", "Stage", &["stage"]),
        ]),
        DatasetConfig::species("monsterhunter", "Monster Hunter", "id", "name").with_filters(vec![
            FilterConfig::choice("rank", "Rank", &["rank"]),
            FilterConfig::choice("element", "Element", &["element"]),
        ]),
        DatasetConfig::species("finalfantasy", "Final Fantasy", "id", "name")
            .with_filters(vec![FilterConfig::choice("stage", "Stage", &["stage"])]),
        DatasetConfig::species("pals", "Palworld", "id", "name"),
        DatasetConfig {
            endpoint: "/fakedex".to_string(),
            collection_key: Some("fakemon".to_string()),
            ..DatasetConfig::species("fakemon", "Fakemon", "number", "number")
        }
        .with_filters(vec![
            FilterConfig::choice("type", "Type", &["type1", "type2", "type3", "type4", "type5"]),
            FilterConfig::choice("category", "Category", &["category"]),
            FilterConfig::choice("attribute", "Attribute", &["attribute"]).with_options(&[
                "Data", "Vaccine", "Variable", "Free", "Virus",
            ]),
        ]),
    ]
}

/// Lookup table of datasets by key.
///
/// Cheap to clone; datasets are shared behind `Arc`.
#[derive(Debug, Clone, Default)]
pub struct DatasetRegistry {
    datasets: BTreeMap<String, Arc<DatasetConfig>>,
}

impl DatasetRegistry {
    /// Creates a registry holding the built-in datasets.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_datasets(builtin_datasets())
    }

    /// Creates a registry from explicit definitions. Later entries replace
    /// earlier ones with the same key.
    #[must_use]
    pub fn from_datasets(datasets: impl IntoIterator<Item = DatasetConfig>) -> Self {
        let mut registry = Self::default();
        registry.extend(datasets);
        registry
    }

    /// Adds or replaces datasets by key.
    pub fn extend(&mut self, datasets: impl IntoIterator<Item = DatasetConfig>) {
        for dataset in datasets {
            tracing::debug!(dataset = %dataset.key, "registering dataset");
            self.datasets.insert(dataset.key.clone(), Arc::new(dataset));
        }
    }

    /// Returns the dataset registered under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownDataset`] if no dataset has that key.
    pub fn get(&self, key: &str) -> Result<Arc<DatasetConfig>> {
        self.datasets
            .get(key)
            .cloned()
            .ok_or_else(|| DexError::UnknownDataset(key.to_string()))
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }
}
