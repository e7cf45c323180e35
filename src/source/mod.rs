//! Data source layer: where pages and adjacency lookups come from.
//!
//! # Modules
//!
//! - `backend`: the [`DataSource`] trait the core consumes
//! - `datasets`: the dataset catalogue and registry
//! - `api`: API-backed source over an abstract transport
//! - `normalize`: folding the backend's list response shapes into pages
//! - `memory`: in-memory source loaded from JSON

pub mod api;
pub mod backend;
pub mod datasets;
pub mod memory;
pub mod normalize;

pub use api::{ApiSource, Transport};
pub use backend::{DataSource, ADJACENCY_LOOKUP_LIMIT};
pub use datasets::{builtin_datasets, DatasetConfig, DatasetRegistry, FilterConfig, FilterKind};
pub use memory::MemorySource;
pub use normalize::normalize_list;
