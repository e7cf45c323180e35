//! Presentation-facing output.
//!
//! ```text
//! AppState → compute_viewmodel → BrowserViewModel → JSON | render → text
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: snapshot types the presentation layer consumes
//! - [`renderer`]: plain-text rendering of a snapshot

pub mod renderer;
pub mod viewmodel;

pub use renderer::{render, render_viewmodel};
pub use viewmodel::{BrowserViewModel, DetailViewModel, QueryViewModel, ResultViewModel};
