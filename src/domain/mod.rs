//! Domain layer for dexquery.
//!
//! This module contains the core value types shared by every other layer,
//! independent of timers, channels, or transports.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`item`]: Opaque dataset records
//! - [`query`]: The canonical filter/sort/pagination request
//! - [`page`]: Result pages and adjacency lookups

pub mod error;
pub mod item;
pub mod page;
pub mod query;

pub use error::{DexError, Result};
pub use item::Item;
pub use page::{page_count, AdjacencyResult, ResultPage};
pub use query::{Query, SortOrder};
