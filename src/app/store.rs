//! Result store: the committed page plus loading and error flags.
//!
//! The store only ever accepts the outcome of the most recently issued fetch.
//! Each fetch carries a sequence number; [`ResultStore::mark_issued`] records it
//! and [`ResultStore::commit`] / [`ResultStore::fail`] compare against it, so a
//! slow response to an older query can never overwrite a newer one.

use crate::domain::{Item, Query, ResultPage};
use chrono::{DateTime, Utc};

/// User-facing message shown when the latest fetch failed.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to load entries. Please try again later.";

/// Committed results of the active query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultStore {
    page: ResultPage,
    loading: bool,
    error: Option<String>,
    loaded_at: Option<DateTime<Utc>>,
    latest_issued: u64,

    /// Dataset key and query the committed page answers.
    answers: Option<(String, Query)>,
}

impl ResultStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Items of the committed page, in display order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.page.items
    }

    /// Total items matching the committed query.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.page.total_items
    }

    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.page.total_pages
    }

    #[must_use]
    pub const fn loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Page count that bounds a page request for `query` on `dataset`.
    ///
    /// Returns 0 (unknown) unless the committed page answers the same dataset
    /// with the same search, filters and sort. Old results stay on screen while
    /// a new query loads, and their page count says nothing about it.
    #[must_use]
    pub fn known_total_pages(&self, dataset: &str, query: &Query) -> u32 {
        match &self.answers {
            Some((key, committed)) if key == dataset && committed.same_dimensions(query) => {
                self.page.total_pages
            }
            _ => 0,
        }
    }

    /// Time of the last accepted commit.
    #[must_use]
    pub const fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Sequence number of the latest issued fetch (0 before the first one).
    #[must_use]
    pub const fn latest_issued(&self) -> u64 {
        self.latest_issued
    }

    /// Records that fetch `seq` went out.
    ///
    /// Sets `loading` and clears the error. Returns `false` for a sequence
    /// number that is not newer than the latest one already recorded.
    pub fn mark_issued(&mut self, seq: u64) -> bool {
        if seq <= self.latest_issued {
            tracing::trace!(seq, latest = self.latest_issued, "ignoring out-of-order issue");
            return false;
        }
        self.latest_issued = seq;
        self.loading = true;
        self.error = None;
        true
    }

    /// Replaces the committed page if `seq` is the latest issued fetch.
    ///
    /// `dataset` and `query` are what the page answers. Returns `true` if the
    /// page was committed. Superseded pages are dropped.
    pub fn commit(&mut self, seq: u64, dataset: &str, query: &Query, page: ResultPage) -> bool {
        if seq != self.latest_issued {
            tracing::debug!(seq, latest = self.latest_issued, "dropping superseded page");
            return false;
        }
        tracing::debug!(
            seq,
            items = page.items.len(),
            total = page.total_items,
            total_pages = page.total_pages,
            "page committed"
        );
        self.page = page;
        self.answers = Some((dataset.to_string(), query.clone()));
        self.loading = false;
        self.error = None;
        self.loaded_at = Some(Utc::now());
        true
    }

    /// Marks the latest fetch as failed, keeping the previously committed page.
    ///
    /// Returns `true` if `seq` was the latest issued fetch.
    pub fn fail(&mut self, seq: u64) -> bool {
        if seq != self.latest_issued {
            tracing::debug!(seq, latest = self.latest_issued, "dropping superseded failure");
            return false;
        }
        self.loading = false;
        self.error = Some(FETCH_FAILED_MESSAGE.to_string());
        true
    }

    /// Human-readable age of the committed page ("just now", "5m ago", ...).
    #[must_use]
    pub fn updated_label(&self, now: DateTime<Utc>) -> Option<String> {
        self.loaded_at.map(|at| time_ago(at, now))
    }
}

/// Formats the distance between `then` and `now` the way list footers show it.
///
/// # Examples
///
/// ```rust
/// use chrono::{Duration, Utc};
/// use dexquery::app::store::time_ago;
///
/// let now = Utc::now();
/// assert_eq!(time_ago(now - Duration::seconds(20), now), "just now");
/// assert_eq!(time_ago(now - Duration::minutes(5), now), "5m ago");
/// assert_eq!(time_ago(now - Duration::hours(3), now), "3h ago");
/// assert_eq!(time_ago(now - Duration::days(2), now), "2d ago");
/// ```
#[must_use]
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = now.signed_duration_since(then).num_seconds().max(0);

    if secs < 60 {
        "just now".to_string()
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(names: &[&str]) -> ResultPage {
        let items = names
            .iter()
            .filter_map(|n| Item::from_value(json!({ "name": n })))
            .collect();
        ResultPage::new(items, names.len() as u64, 24)
    }

    fn query() -> Query {
        Query::new("name", 24)
    }

    #[test]
    fn issue_sets_loading_and_clears_error() {
        let mut store = ResultStore::new();
        store.mark_issued(1);
        store.fail(1);
        assert!(store.error().is_some());

        assert!(store.mark_issued(2));
        assert!(store.loading());
        assert!(store.error().is_none());
    }

    #[test]
    fn only_latest_issued_commits() {
        let mut store = ResultStore::new();
        store.mark_issued(1);
        store.mark_issued(2);

        assert!(store.commit(2, "abilities", &query(), page(&["new"])));
        assert!(!store.commit(1, "abilities", &query(), page(&["old"])));

        assert_eq!(store.items()[0].text("name"), Some("new"));
        assert!(!store.loading());
        assert!(store.loaded_at().is_some());
    }

    #[test]
    fn stale_response_leaves_loading_untouched() {
        let mut store = ResultStore::new();
        store.mark_issued(1);
        store.mark_issued(2);
        assert!(!store.commit(1, "abilities", &query(), page(&["old"])));
        assert!(store.loading());
        assert!(store.items().is_empty());
    }

    #[test]
    fn failure_keeps_previous_page() {
        let mut store = ResultStore::new();
        store.mark_issued(1);
        store.commit(1, "abilities", &query(), page(&["a", "b"]));

        store.mark_issued(2);
        assert!(store.fail(2));
        assert_eq!(store.items().len(), 2);
        assert_eq!(store.total(), 2);
        assert!(!store.loading());
        assert_eq!(store.error(), Some(FETCH_FAILED_MESSAGE));
    }

    #[test]
    fn out_of_order_issue_is_ignored() {
        let mut store = ResultStore::new();
        store.mark_issued(3);
        assert!(!store.mark_issued(2));
        assert_eq!(store.latest_issued(), 3);
    }

    #[test]
    fn page_count_only_bounds_the_query_it_answers() {
        let mut store = ResultStore::new();
        store.mark_issued(1);
        store.commit(1, "abilities", &query(), ResultPage::new(vec![], 30, 24));

        let mut next_page = query();
        next_page.page = 2;
        assert_eq!(store.known_total_pages("abilities", &next_page), 2);

        let mut searched = query();
        searched.search_text = "blaze".to_string();
        assert_eq!(store.known_total_pages("abilities", &searched), 0);
        assert_eq!(store.known_total_pages("nexomon", &query()), 0);
    }

    #[test]
    fn updated_label_follows_commit_time() {
        let mut store = ResultStore::new();
        assert!(store.updated_label(Utc::now()).is_none());

        store.mark_issued(1);
        store.commit(1, "abilities", &query(), page(&["a"]));
        let at = store.loaded_at().unwrap();
        assert_eq!(
            store.updated_label(at + chrono::Duration::minutes(90)).as_deref(),
            Some("1h ago")
        );
    }
}
