//! Detail view state machine.
//!
//! ```text
//! Closed ──select──▶ Open(item) ──previous/next──▶ Open(adjacent) ...
//!   ▲                    │
//!   └──────clear─────────┘
//! ```
//!
//! While open, the view waits for at most one adjacency lookup at a time. The
//! lookup is identified by a sequence number; a result for any other number
//! belongs to an item that is no longer selected and is dropped.

use crate::domain::{AdjacencyResult, Item};

/// An open detail view.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenDetail {
    /// The selected item.
    pub item: Item,

    /// Identifier of the selected item, if it has one.
    pub item_id: Option<String>,

    /// Neighbours of the item; all absent until the lookup resolves.
    pub adjacency: AdjacencyResult,

    /// Sequence number of the outstanding adjacency lookup.
    pub pending: Option<u64>,
}

/// Whether a detail view is showing, and for which item.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DetailView {
    #[default]
    Closed,

    Open(OpenDetail),
}

impl DetailView {
    /// Opens the view on `item`, discarding any previous adjacency.
    ///
    /// `pending` is the sequence number of the lookup started for this item,
    /// or `None` when no lookup can be made.
    pub fn open(&mut self, item: Item, item_id: Option<String>, pending: Option<u64>) {
        *self = Self::Open(OpenDetail {
            item,
            item_id,
            adjacency: AdjacencyResult::unavailable(),
            pending,
        });
    }

    /// Closes the view. Returns `true` if it was open.
    pub fn close(&mut self) -> bool {
        matches!(std::mem::take(self), Self::Open(_))
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    #[must_use]
    pub const fn current(&self) -> Option<&OpenDetail> {
        match self {
            Self::Open(detail) => Some(detail),
            Self::Closed => None,
        }
    }

    /// Marks a fresh lookup for the open item.
    pub fn await_adjacency(&mut self, seq: u64) {
        if let Self::Open(detail) = self {
            detail.adjacency = AdjacencyResult::unavailable();
            detail.pending = Some(seq);
        }
    }

    /// Stores `result` if it answers the outstanding lookup.
    ///
    /// Returns `true` if the result was accepted.
    pub fn accept_adjacency(&mut self, seq: u64, result: &AdjacencyResult) -> bool {
        match self {
            Self::Open(detail) if detail.pending == Some(seq) => {
                detail.adjacency = result.clone();
                detail.pending = None;
                true
            }
            _ => {
                tracing::debug!(seq, "dropping adjacency for a stale selection");
                false
            }
        }
    }

    /// The item before the selected one, once known.
    #[must_use]
    pub fn previous(&self) -> Option<&Item> {
        self.current().and_then(|d| d.adjacency.previous.as_ref())
    }

    /// The item after the selected one, once known.
    #[must_use]
    pub fn next(&self) -> Option<&Item> {
        self.current().and_then(|d| d.adjacency.next.as_ref())
    }
}
