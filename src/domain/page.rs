//! Result pages and adjacency lookups.

use super::item::Item;
use serde::{Deserialize, Serialize};

/// One page of a dataset as answered by a data source.
///
/// Pages are replaced wholesale on every accepted fetch and never edited.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultPage {
    /// Items of the requested page, in query order.
    pub items: Vec<Item>,

    /// Number of items matching the query across all pages.
    pub total_items: u64,

    /// Number of pages at the query's page size.
    pub total_pages: u32,
}

impl ResultPage {
    /// Builds a page and derives `total_pages` from `total_items` and `page_size`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dexquery::ResultPage;
    ///
    /// let page = ResultPage::new(vec![], 30, 24);
    /// assert_eq!(page.total_pages, 2);
    /// ```
    #[must_use]
    pub fn new(items: Vec<Item>, total_items: u64, page_size: u32) -> Self {
        Self {
            items,
            total_items,
            total_pages: page_count(total_items, page_size),
        }
    }
}

/// Number of pages needed to show `total_items` at `page_size` per page.
#[must_use]
pub fn page_count(total_items: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    u32::try_from(total_items.div_ceil(page_size)).unwrap_or(u32::MAX)
}

/// Previous/next neighbours of an item within a full ordered result set.
///
/// Every field is optional: a failed lookup leaves all of them absent, and an
/// item that is not part of the ordering only reports `total_count`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AdjacencyResult {
    /// Item immediately before the current one, absent for the first item.
    pub previous: Option<Item>,

    /// Item immediately after the current one, absent for the last item.
    pub next: Option<Item>,

    /// Zero-based position of the current item in the ordering.
    pub current_index: Option<usize>,

    /// Length of the ordering the lookup ran against.
    pub total_count: Option<usize>,
}

impl AdjacencyResult {
    /// Result used when the lookup itself failed: nothing is known.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Locates `item_id` in `ordered` and returns its neighbours.
    ///
    /// # Examples
    ///
    /// ```
    /// use dexquery::{AdjacencyResult, Item};
    /// use serde_json::json;
    ///
    /// let items: Vec<Item> = ["a", "b", "c"]
    ///     .iter()
    ///     .map(|n| Item::from_value(json!({ "name": n })).unwrap())
    ///     .collect();
    ///
    /// let last = AdjacencyResult::locate(&items, "name", "c");
    /// assert!(last.next.is_none());
    /// assert_eq!(last.previous.as_ref().and_then(|i| i.text("name")), Some("b"));
    /// ```
    #[must_use]
    pub fn locate(ordered: &[Item], id_field: &str, item_id: &str) -> Self {
        let total_count = Some(ordered.len());
        let Some(index) = ordered
            .iter()
            .position(|item| item.id(id_field).as_deref() == Some(item_id))
        else {
            return Self {
                total_count,
                ..Self::default()
            };
        };

        Self {
            previous: index.checked_sub(1).and_then(|i| ordered.get(i)).cloned(),
            next: ordered.get(index + 1).cloned(),
            current_index: Some(index),
            total_count,
        }
    }
}
