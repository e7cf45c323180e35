//! Error types for dexquery.
//!
//! This module defines the centralized error type [`DexError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! Data-fetch failures never reach the presentation layer as errors: the fetch
//! coordinator and adjacency navigator turn them into observable state flags.
//! `DexError` is what the data sources return before that conversion, and what
//! configuration loading returns to its caller.

use thiserror::Error;

/// The main error type for dexquery operations.
///
/// # Examples
///
/// ```
/// use dexquery::DexError;
///
/// fn fetch() -> Result<(), DexError> {
///     Err(DexError::Unavailable("connection refused".to_string()))
/// }
/// assert!(fetch().is_err());
/// ```
#[derive(Debug, Error)]
pub enum DexError {
    /// The data source could not answer (transport or server failure).
    ///
    /// This is the single failure kind of `fetch_page` and `fetch_adjacent`.
    #[error("Data source unavailable: {0}")]
    Unavailable(String),

    /// No dataset is registered under the requested key.
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON document could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A TOML configuration file could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for dexquery operations.
pub type Result<T> = std::result::Result<T, DexError>;
