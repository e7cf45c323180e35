//! The canonical description of "what to show".
//!
//! A [`Query`] is a plain value: the query builder produces a fresh one on every
//! change and the fetch coordinator sends it as-is, so no component ever observes
//! a half-updated query.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Direction of the active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Smallest first. The default for every dataset.
    #[default]
    #[serde(rename = "asc")]
    Ascending,

    /// Largest first.
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    /// Returns the opposite direction.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Wire representation used in query parameters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter, sort, and pagination request for one dataset page.
///
/// Filters live in a `BTreeMap` so that two queries holding the same entries
/// compare equal regardless of the order the user set them in.
///
/// # Examples
///
/// ```
/// use dexquery::{Query, SortOrder};
///
/// let query = Query::new("name", 24);
/// assert_eq!(query.page, 1);
/// assert_eq!(query.sort_order, SortOrder::Ascending);
/// assert!(query.to_params().contains(&("limit".to_string(), "24".to_string())));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Case-insensitive substring matched against the item name.
    pub search_text: String,

    /// Active filters keyed by filter key. Empty values are never stored.
    pub filters: BTreeMap<String, String>,

    /// Field the result set is ordered by.
    pub sort_field: String,

    /// Direction of the ordering.
    pub sort_order: SortOrder,

    /// One-based page number.
    pub page: u32,

    /// Items per page, fixed per dataset.
    pub page_size: u32,
}

impl Query {
    /// Creates the default query of a dataset: first page, no search or filters,
    /// ascending on `sort_field`.
    #[must_use]
    pub fn new(sort_field: impl Into<String>, page_size: u32) -> Self {
        Self {
            search_text: String::new(),
            filters: BTreeMap::new(),
            sort_field: sort_field.into(),
            sort_order: SortOrder::Ascending,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Returns `true` when both queries select the same ordered result set,
    /// i.e. they differ at most in `page`/`page_size`.
    #[must_use]
    pub fn same_dimensions(&self, other: &Self) -> bool {
        self.search_text == other.search_text
            && self.filters == other.filters
            && self.sort_field == other.sort_field
            && self.sort_order == other.sort_order
    }

    /// Returns a copy requesting the first `limit` items of the same ordering.
    ///
    /// Used for adjacency lookups, which need the full order rather than the
    /// page the user is looking at.
    #[must_use]
    pub fn for_lookup(&self, limit: u32) -> Self {
        Self {
            page: 1,
            page_size: limit.max(1),
            ..self.clone()
        }
    }

    /// Zero-based offset of the first item on the requested page.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1) * self.page_size as usize
    }

    /// Renders the query as API parameters.
    ///
    /// `page`, `limit`, `sortBy` and `sortOrder` are always present; `search`
    /// only when non-empty; filters follow in key order.
    #[must_use]
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.page_size.to_string()),
            ("sortBy".to_string(), self.sort_field.clone()),
            ("sortOrder".to_string(), self.sort_order.as_str().to_string()),
        ];

        if !self.search_text.is_empty() {
            params.push(("search".to_string(), self.search_text.clone()));
        }

        params.extend(
            self.filters
                .iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(key, value)| (key.clone(), value.clone())),
        );

        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_skip_empty_search() {
        let query = Query::new("ndex", 30);
        let keys: Vec<_> = query.to_params().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["page", "limit", "sortBy", "sortOrder"]);
    }

    #[test]
    fn params_include_search_and_filters() {
        let mut query = Query::new("name", 24);
        query.search_text = "fira".to_string();
        query.filters.insert("type".to_string(), "Fire".to_string());
        query.sort_order = SortOrder::Descending;

        let params = query.to_params();
        assert!(params.contains(&("search".to_string(), "fira".to_string())));
        assert!(params.contains(&("type".to_string(), "Fire".to_string())));
        assert!(params.contains(&("sortOrder".to_string(), "desc".to_string())));
    }

    #[test]
    fn filter_insertion_order_is_irrelevant() {
        let mut a = Query::new("name", 24);
        a.filters.insert("rank".to_string(), "S".to_string());
        a.filters.insert("element".to_string(), "Ice".to_string());

        let mut b = Query::new("name", 24);
        b.filters.insert("element".to_string(), "Ice".to_string());
        b.filters.insert("rank".to_string(), "S".to_string());

        assert_eq!(a, b);
    }

    #[test]
    fn page_is_not_a_dimension() {
        let a = Query::new("name", 24);
        let mut b = a.clone();
        b.page = 4;
        assert!(a.same_dimensions(&b));

        b.sort_order = SortOrder::Descending;
        assert!(!a.same_dimensions(&b));
    }

    #[test]
    fn lookup_keeps_ordering_and_resets_page() {
        let mut query = Query::new("nr", 30);
        query.page = 5;
        query.search_text = "mon".to_string();

        let lookup = query.for_lookup(1000);
        assert_eq!(lookup.page, 1);
        assert_eq!(lookup.page_size, 1000);
        assert!(lookup.same_dimensions(&query));
    }

    #[test]
    fn sort_order_serializes_as_wire_names() {
        assert_eq!(serde_json::to_string(&SortOrder::Descending).unwrap(), "\"desc\"");
        assert_eq!(SortOrder::Ascending.toggled(), SortOrder::Descending);
    }
}
