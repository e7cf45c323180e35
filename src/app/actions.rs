//! Side effects produced by the event handler.
//!
//! The handler never talks to a data source itself. It returns [`Action`]s and
//! the [`Browser`](crate::Browser) driver hands them to the worker layer.

use crate::domain::Query;
use crate::source::DatasetConfig;
use std::sync::Arc;

/// Commands the driver executes after an event has been handled.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// (Re)arms the debounced fetch for `query`.
    ///
    /// Only the last query scheduled within one debounce window is sent.
    ScheduleFetch {
        dataset: Arc<DatasetConfig>,
        query: Query,
    },

    /// Looks up the neighbours of `item_id` in the ordering of `query`.
    ///
    /// Runs immediately; `seq` identifies the lookup so the detail view can
    /// tell whether the answer still applies.
    ResolveAdjacency {
        seq: u64,
        dataset: Arc<DatasetConfig>,
        item_id: String,
        query: Query,
    },
}
