//! Background work: debounced page fetches and neighbour lookups.
//!
//! Nothing in here mutates browser state. Work runs on tokio tasks and every
//! outcome comes back as a [`WorkerResponse`] on one channel, which the
//! driver feeds into the event handler.
//!
//! # Modules
//!
//! - `messages`: request/response types, sequence-tagged
//! - `handler`: the worker that runs requests against a data source
//! - `coordinator`: debounce timer and sequence numbering for page fetches
//! - `navigator`: neighbour lookups that resolve to "unavailable" on failure

pub mod coordinator;
pub mod handler;
pub mod messages;
pub mod navigator;

pub use coordinator::{FetchCoordinator, DEFAULT_DEBOUNCE};
pub use handler::{DexWorker, WorkerHandle};
pub use messages::{WorkerMessage, WorkerResponse};
