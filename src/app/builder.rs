//! Query builder: independent UI state in, one canonical [`Query`] out.
//!
//! Every setter reports what kind of change it made. A [`QueryChange::Dimensions`]
//! change (search, filters, sort, dataset) always puts the query back on page 1;
//! a [`QueryChange::Page`] change only moves the page; setters that leave the
//! query as it was report [`QueryChange::Unchanged`] so nothing gets refetched.

use crate::domain::{Query, SortOrder};
use crate::source::DatasetConfig;

/// Kind of change a builder operation made to the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryChange {
    /// The query is identical to before.
    Unchanged,

    /// Only the page moved.
    Page,

    /// The selected result set changed; the page is back at 1.
    Dimensions,
}

impl QueryChange {
    /// Returns `true` unless the query is unchanged.
    #[must_use]
    pub const fn is_changed(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Holds the query of one dataset page and applies user intents to it.
///
/// # Example
///
/// ```rust
/// use dexquery::app::{QueryBuilder, QueryChange};
/// use dexquery::source::DatasetRegistry;
///
/// let registry = DatasetRegistry::builtin();
/// let mut builder = QueryBuilder::for_dataset(&registry.get("abilities").unwrap());
///
/// builder.set_page(3, 10);
/// assert_eq!(builder.set_search_text("blaze"), QueryChange::Dimensions);
/// assert_eq!(builder.query().page, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBuilder {
    query: Query,
    sort_default: String,
}

impl QueryBuilder {
    /// Creates the default query of `dataset`.
    #[must_use]
    pub fn for_dataset(dataset: &DatasetConfig) -> Self {
        Self {
            query: Query::new(dataset.sort_default.clone(), dataset.page_size),
            sort_default: dataset.sort_default.clone(),
        }
    }

    /// The current query.
    #[must_use]
    pub const fn query(&self) -> &Query {
        &self.query
    }

    /// Returns an owned snapshot of the current query.
    #[must_use]
    pub fn build(&self) -> Query {
        self.query.clone()
    }

    fn dimensions_changed(&mut self) -> QueryChange {
        self.query.page = 1;
        QueryChange::Dimensions
    }

    /// Replaces the search text.
    pub fn set_search_text(&mut self, text: &str) -> QueryChange {
        if self.query.search_text == text {
            return QueryChange::Unchanged;
        }
        self.query.search_text = text.to_string();
        self.dimensions_changed()
    }

    /// Sets or removes a filter. `None` and empty strings remove the key.
    pub fn set_filter(&mut self, key: &str, value: Option<&str>) -> QueryChange {
        let changed = match value.filter(|v| !v.is_empty()) {
            Some(value) => {
                let previous = self.query.filters.insert(key.to_string(), value.to_string());
                previous.as_deref() != Some(value)
            }
            None => self.query.filters.remove(key).is_some(),
        };

        if changed {
            self.dimensions_changed()
        } else {
            QueryChange::Unchanged
        }
    }

    /// Removes every filter.
    pub fn clear_filters(&mut self) -> QueryChange {
        if self.query.filters.is_empty() {
            return QueryChange::Unchanged;
        }
        self.query.filters.clear();
        self.dimensions_changed()
    }

    /// Sorts by `field`.
    ///
    /// Requesting the active field toggles the direction; any other field becomes
    /// active in ascending order. An empty field means the dataset's default.
    pub fn set_sort(&mut self, field: &str) -> QueryChange {
        let field = if field.is_empty() {
            self.sort_default.as_str()
        } else {
            field
        };

        if self.query.sort_field == field {
            self.query.sort_order = self.query.sort_order.toggled();
        } else {
            self.query.sort_field = field.to_string();
            self.query.sort_order = SortOrder::Ascending;
        }

        tracing::trace!(
            sort_field = %self.query.sort_field,
            sort_order = %self.query.sort_order,
            "sort updated"
        );

        self.dimensions_changed()
    }

    /// Moves to `page`, clamped to `1..=total_pages` (`total_pages == 0` means unknown).
    pub fn set_page(&mut self, page: u32, total_pages: u32) -> QueryChange {
        let mut page = page.max(1);
        if total_pages > 0 {
            page = page.min(total_pages);
        }

        if self.query.page == page {
            QueryChange::Unchanged
        } else {
            self.query.page = page;
            QueryChange::Page
        }
    }

    /// Resets everything to the defaults of `dataset`.
    pub fn reset(&mut self, dataset: &DatasetConfig) -> QueryChange {
        let fresh = Self::for_dataset(dataset);
        if *self == fresh {
            return QueryChange::Unchanged;
        }
        *self = fresh;
        QueryChange::Dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DatasetRegistry;

    fn builder(key: &str) -> QueryBuilder {
        QueryBuilder::for_dataset(&DatasetRegistry::builtin().get(key).unwrap())
    }

    #[test]
    fn defaults_come_from_the_dataset() {
        let query = builder("pokemon").build();
        assert_eq!(query.sort_field, "ndex");
        assert_eq!(query.page_size, 30);
        assert_eq!(query.page, 1);
    }

    #[test]
    fn every_filter_dimension_resets_the_page() {
        let mut b = builder("abilities");

        b.set_page(3, 0);
        assert_eq!(b.set_search_text("fire"), QueryChange::Dimensions);
        assert_eq!(b.query().page, 1);

        b.set_page(3, 0);
        assert_eq!(b.set_filter("type", Some("Fire")), QueryChange::Dimensions);
        assert_eq!(b.query().page, 1);

        b.set_page(3, 0);
        assert_eq!(b.clear_filters(), QueryChange::Dimensions);
        assert_eq!(b.query().page, 1);

        b.set_page(3, 0);
        assert_eq!(b.set_sort("effect"), QueryChange::Dimensions);
        assert_eq!(b.query().page, 1);
    }

    #[test]
    fn sorting_the_active_field_toggles() {
        let mut b = builder("abilities");
        b.set_sort("name");
        assert_eq!(b.query().sort_order, SortOrder::Descending);
        b.set_sort("name");
        assert_eq!(b.query().sort_order, SortOrder::Ascending);
    }

    #[test]
    fn sorting_a_new_field_starts_ascending() {
        let mut b = builder("abilities");
        b.set_sort("name");
        assert_eq!(b.query().sort_order, SortOrder::Descending);

        b.set_sort("type");
        assert_eq!(b.query().sort_field, "type");
        assert_eq!(b.query().sort_order, SortOrder::Ascending);
    }

    #[test]
    fn empty_sort_field_means_default() {
        let mut b = builder("nexomon");
        b.set_sort("name");
        b.set_sort("");
        assert_eq!(b.query().sort_field, "nr");
    }

    #[test]
    fn repeated_values_are_unchanged() {
        let mut b = builder("abilities");
        assert_eq!(b.set_search_text(""), QueryChange::Unchanged);
        b.set_filter("type", Some("Fire"));
        assert_eq!(b.set_filter("type", Some("Fire")), QueryChange::Unchanged);
        assert_eq!(b.set_filter("rank", None), QueryChange::Unchanged);
        assert_eq!(b.set_page(1, 5), QueryChange::Unchanged);
    }

    #[test]
    fn empty_filter_value_removes_the_key() {
        let mut b = builder("abilities");
        b.set_filter("type", Some("Fire"));
        assert_eq!(b.set_filter("type", Some("")), QueryChange::Dimensions);
        assert!(b.query().filters.is_empty());
        assert_eq!(b.clear_filters(), QueryChange::Unchanged);
    }

    #[test]
    fn page_is_clamped() {
        let mut b = builder("abilities");
        assert_eq!(b.set_page(0, 5), QueryChange::Unchanged);
        assert_eq!(b.set_page(9, 5), QueryChange::Page);
        assert_eq!(b.query().page, 5);
        b.set_page(40, 0);
        assert_eq!(b.query().page, 40);
    }

    #[test]
    fn reset_restores_dataset_defaults() {
        let registry = DatasetRegistry::builtin();
        let mut b = builder("abilities");
        b.set_search_text("x");
        b.set_filter("type", Some("Ice"));

        assert_eq!(b.reset(&registry.get("fakemon").unwrap()), QueryChange::Dimensions);
        let query = b.build();
        assert_eq!(query.sort_field, "number");
        assert_eq!(query.page_size, 30);
        assert!(query.search_text.is_empty());
        assert!(query.filters.is_empty());

        assert_eq!(b.reset(&registry.get("fakemon").unwrap()), QueryChange::Unchanged);
    }
}
