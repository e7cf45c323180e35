//! Application layer: browser state, intents and the transitions between them.
//!
//! The layer is synchronous and free of I/O. It sits between the presentation
//! layer (which sends intents and reads snapshots) and the worker layer (which
//! runs fetches and reports back).
//!
//! ```text
//! Intents → Events → handle_event → State mutations → Actions → Worker
//!                          ↑                                      ↓
//!                          └────────── Worker responses ──────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: side effects emitted by the event handler
//! - [`builder`]: query construction from independent UI state
//! - [`handler`]: event processing and state transitions
//! - [`modes`]: detail view state machine
//! - [`state`]: central state container and view model computation
//! - [`store`]: committed results with sequence-gated updates

pub mod actions;
pub mod builder;
pub mod handler;
pub mod modes;
pub mod state;
pub mod store;

pub use actions::Action;
pub use builder::{QueryBuilder, QueryChange};
pub use handler::{handle_event, Event};
pub use modes::{DetailView, OpenDetail};
pub use state::AppState;
pub use store::{ResultStore, FETCH_FAILED_MESSAGE};
