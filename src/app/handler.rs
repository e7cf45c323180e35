//! Event handling and state transition logic.
//!
//! Intents from the presentation layer and responses from the worker arrive as
//! [`Event`]s. [`handle_event`] applies each one to the [`AppState`] and returns
//! whether a new snapshot should be rendered plus the [`Action`]s to run.
//!
//! ```text
//! Intent ──▶ handle_event ──▶ state change ──▶ Action::ScheduleFetch ──▶ worker
//!                 ▲                                                        │
//!                 └─────────────── Event::WorkerResponse ◀─────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use dexquery::app::{handle_event, Action, AppState, Event};
//! use dexquery::source::DatasetRegistry;
//!
//! let registry = DatasetRegistry::builtin();
//! let abilities = registry.get("abilities")?;
//! let mut state = AppState::new(registry, abilities);
//!
//! let (render, actions) = handle_event(
//!     &mut state,
//!     &Event::SetSearchText { text: "blaze".into() },
//! )?;
//! assert!(render);
//! assert!(matches!(actions[0], Action::ScheduleFetch { .. }));
//! # Ok::<(), dexquery::DexError>(())
//! ```

use super::builder::QueryChange;
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::Item;
use crate::worker::WorkerResponse;
use serde::{Deserialize, Serialize};

/// Intents and worker responses, processed one at a time.
///
/// Intents deserialize from JSON tagged by `intent`, e.g.
/// `{"intent":"set_filter","key":"type","value":"Fire"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Event {
    /// Replaces the search text.
    SetSearchText { text: String },

    /// Sets a filter, or removes it when `value` is absent or empty.
    SetFilter {
        key: String,
        #[serde(default)]
        value: Option<String>,
    },

    /// Removes every filter.
    ClearFilters,

    /// Sorts by `field`, toggling direction if it is already active.
    SetSort { field: String },

    /// Moves to a one-based page.
    SetPage { page: u32 },

    /// Switches to another dataset with its default query.
    SelectDataset { key: String },

    /// Opens the detail view on an item.
    SelectItem { item: Item },

    /// Closes the detail view.
    ClearSelection,

    /// Moves the detail view to the previous item, if known.
    GoToPrevious,

    /// Moves the detail view to the next item, if known.
    GoToNext,

    /// Fetches the active query again. Also used for the initial load.
    Retry,

    /// Outcome of background work.
    #[serde(skip)]
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates state, and returns the actions to execute.
///
/// The returned flag is `true` when the state visibly changed and a new
/// snapshot should be rendered.
///
/// # Errors
///
/// Returns `DexError::UnknownDataset` for a `SelectDataset` naming no
/// registered dataset. Fetch and lookup failures are never errors here; they
/// are folded into the state.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::SetSearchText { text } => {
            let change = state.builder.set_search_text(text);
            tracing::trace!(query = %text, "search text updated");
            Ok(on_query_change(state, change))
        }
        Event::SetFilter { key, value } => {
            let change = state.builder.set_filter(key, value.as_deref());
            tracing::debug!(filter = %key, value = ?value, "filter updated");
            Ok(on_query_change(state, change))
        }
        Event::ClearFilters => {
            let change = state.builder.clear_filters();
            Ok(on_query_change(state, change))
        }
        Event::SetSort { field } => {
            let change = state.builder.set_sort(field);
            let (render, mut actions) = on_sort_change(state, change);
            if render {
                actions.extend(state.refresh_adjacency());
            }
            Ok((render, actions))
        }
        Event::SetPage { page } => {
            let total_pages = state.store.known_total_pages(&state.dataset.key, state.query());
            let change = state.builder.set_page(*page, total_pages);
            tracing::debug!(requested = page, page = state.query().page, "page updated");
            Ok(on_query_change(state, change))
        }
        Event::SelectDataset { key } => {
            let change = state.select_dataset(key)?;
            Ok(on_query_change(state, change))
        }
        Event::SelectItem { item } => {
            tracing::debug!(item_id = ?item.id(&state.dataset.id_field), "item selected");
            let actions = state.open_detail(item.clone()).into_iter().collect();
            Ok((true, actions))
        }
        Event::ClearSelection => Ok((state.detail.close(), vec![])),
        Event::GoToPrevious => {
            let Some(previous) = state.detail.previous().cloned() else {
                tracing::debug!("no previous item");
                return Ok((false, vec![]));
            };
            let actions = state.open_detail(previous).into_iter().collect();
            Ok((true, actions))
        }
        Event::GoToNext => {
            let Some(next) = state.detail.next().cloned() else {
                tracing::debug!("no next item");
                return Ok((false, vec![]));
            };
            let actions = state.open_detail(next).into_iter().collect();
            Ok((true, actions))
        }
        Event::Retry => {
            tracing::debug!(page = state.query().page, "refetching current query");
            Ok((false, vec![state.fetch_action()]))
        }
        Event::WorkerResponse(response) => Ok(handle_worker_response(state, response)),
    }
}

/// Search, filter, page and dataset changes: a changed query is refetched,
/// and a changed result set closes the detail view.
fn on_query_change(state: &mut AppState, change: QueryChange) -> (bool, Vec<Action>) {
    match change {
        QueryChange::Unchanged => {
            tracing::trace!("query unchanged, skipping fetch");
            (false, vec![])
        }
        QueryChange::Page => (true, vec![state.fetch_action()]),
        QueryChange::Dimensions => {
            if state.detail.close() {
                tracing::debug!("selection cleared by query change");
            }
            (true, vec![state.fetch_action()])
        }
    }
}

/// Sort changes refetch but keep the selected item open.
fn on_sort_change(state: &AppState, change: QueryChange) -> (bool, Vec<Action>) {
    if change.is_changed() {
        (true, vec![state.fetch_action()])
    } else {
        (false, vec![])
    }
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> (bool, Vec<Action>) {
    match response {
        WorkerResponse::FetchIssued { seq } => (state.store.mark_issued(*seq), vec![]),
        WorkerResponse::PageLoaded {
            seq,
            dataset,
            query,
            page,
        } => (state.store.commit(*seq, dataset, query, page.clone()), vec![]),
        WorkerResponse::PageFailed { seq, message } => {
            let latest = state.store.fail(*seq);
            if latest {
                tracing::warn!(seq, error = %message, "latest fetch failed, keeping previous results");
            }
            (latest, vec![])
        }
        WorkerResponse::AdjacencyResolved { seq, result } => {
            (state.detail.accept_adjacency(*seq, result), vec![])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AdjacencyResult, ResultPage, SortOrder};
    use crate::source::DatasetRegistry;
    use serde_json::json;

    fn state() -> AppState {
        let registry = DatasetRegistry::builtin();
        let abilities = registry.get("abilities").unwrap();
        AppState::new(registry, abilities)
    }

    fn ability(name: &str) -> Item {
        Item::from_value(json!({ "name": name })).unwrap()
    }

    fn handle(state: &mut AppState, event: Event) -> (bool, Vec<Action>) {
        handle_event(state, &event).unwrap()
    }

    /// Commits `page` as the answer to the current query.
    fn commit(state: &mut AppState, page: ResultPage) {
        let seq = state.store.latest_issued() + 1;
        let query = state.query().clone();
        state.store.mark_issued(seq);
        state.store.commit(seq, &state.dataset.key, &query, page);
    }

    fn scheduled_query(actions: &[Action]) -> crate::domain::Query {
        match actions {
            [Action::ScheduleFetch { query, .. }] => query.clone(),
            other => panic!("expected one fetch, got {other:?}"),
        }
    }

    #[test]
    fn filter_change_resets_page_and_schedules() {
        let mut state = state();
        commit(&mut state, ResultPage::new(vec![], 120, 24));
        handle(&mut state, Event::SetPage { page: 3 });

        let (render, actions) = handle(
            &mut state,
            Event::SetFilter {
                key: "type".into(),
                value: Some("Fire".into()),
            },
        );

        assert!(render);
        let query = scheduled_query(&actions);
        assert_eq!(query.page, 1);
        assert_eq!(query.filters.get("type").map(String::as_str), Some("Fire"));
    }

    #[test]
    fn unchanged_intent_schedules_nothing() {
        let mut state = state();
        let (render, actions) = handle(&mut state, Event::SetSearchText { text: String::new() });
        assert!(!render);
        assert!(actions.is_empty());

        let (_, actions) = handle(&mut state, Event::ClearFilters);
        assert!(actions.is_empty());
    }

    #[test]
    fn sort_toggles_on_the_same_field() {
        let mut state = state();
        let (_, actions) = handle(&mut state, Event::SetSort { field: "name".into() });
        assert_eq!(scheduled_query(&actions).sort_order, SortOrder::Descending);

        let (_, actions) = handle(&mut state, Event::SetSort { field: "name".into() });
        assert_eq!(scheduled_query(&actions).sort_order, SortOrder::Ascending);
    }

    #[test]
    fn page_is_clamped_to_known_total() {
        let mut state = state();
        commit(&mut state, ResultPage::new(vec![], 30, 24));

        let (_, actions) = handle(&mut state, Event::SetPage { page: 9 });
        assert_eq!(scheduled_query(&actions).page, 2);
    }

    #[test]
    fn page_count_of_another_query_does_not_bound_the_page() {
        let mut state = state();
        commit(&mut state, ResultPage::new(vec![], 30, 24));
        handle(&mut state, Event::SetSearchText { text: "bl".into() });

        let (render, actions) = handle(&mut state, Event::SetPage { page: 4 });
        assert!(render);
        assert_eq!(scheduled_query(&actions).page, 4);
    }

    #[test]
    fn search_change_closes_detail() {
        let mut state = state();
        handle(&mut state, Event::SelectItem { item: ability("Blaze") });
        assert!(state.detail.is_open());

        handle(&mut state, Event::SetSearchText { text: "bl".into() });
        assert!(!state.detail.is_open());
    }

    #[test]
    fn sort_change_keeps_detail_and_relooks_neighbours() {
        let mut state = state();
        handle(&mut state, Event::SelectItem { item: ability("Blaze") });

        let (_, actions) = handle(&mut state, Event::SetSort { field: "type".into() });
        assert!(state.detail.is_open());
        assert!(matches!(actions[0], Action::ScheduleFetch { .. }));
        assert!(matches!(
            &actions[1],
            Action::ResolveAdjacency { item_id, .. } if item_id == "Blaze"
        ));
    }

    #[test]
    fn unknown_dataset_is_an_error() {
        let mut state = state();
        let result = handle_event(&mut state, &Event::SelectDataset { key: "nope".into() });
        assert!(result.is_err());
        assert_eq!(state.dataset.key, "abilities");
    }

    #[test]
    fn stale_page_is_not_rendered() {
        let mut state = state();
        handle(&mut state, Event::WorkerResponse(WorkerResponse::FetchIssued { seq: 1 }));
        handle(&mut state, Event::WorkerResponse(WorkerResponse::FetchIssued { seq: 2 }));

        let query = state.query().clone();
        let (render, _) = handle(
            &mut state,
            Event::WorkerResponse(WorkerResponse::PageLoaded {
                seq: 1,
                dataset: "abilities".into(),
                query,
                page: ResultPage::new(vec![ability("Old")], 1, 24),
            }),
        );
        assert!(!render);
        assert!(state.store.items().is_empty());
        assert!(state.store.loading());
    }

    #[test]
    fn navigation_follows_resolved_neighbours() {
        let mut state = state();
        let (_, actions) = handle(&mut state, Event::SelectItem { item: ability("Blaze") });
        let Action::ResolveAdjacency { seq, .. } = actions[0] else {
            panic!("expected a lookup");
        };

        let (render, _) = handle(&mut state, Event::GoToNext);
        assert!(!render);

        handle(
            &mut state,
            Event::WorkerResponse(WorkerResponse::AdjacencyResolved {
                seq,
                result: AdjacencyResult {
                    previous: Some(ability("Aftermath")),
                    next: Some(ability("Chlorophyll")),
                    current_index: Some(1),
                    total_count: Some(3),
                },
            }),
        );

        let (render, actions) = handle(&mut state, Event::GoToNext);
        assert!(render);
        assert_eq!(state.detail.current().unwrap().item, ability("Chlorophyll"));
        assert!(matches!(
            &actions[0],
            Action::ResolveAdjacency { item_id, .. } if item_id == "Chlorophyll"
        ));
    }

    #[test]
    fn intents_parse_from_json() {
        let event: Event =
            serde_json::from_str(r#"{"intent":"set_filter","key":"type","value":"Fire"}"#).unwrap();
        assert_eq!(
            event,
            Event::SetFilter {
                key: "type".into(),
                value: Some("Fire".into())
            }
        );

        let event: Event = serde_json::from_str(r#"{"intent":"set_filter","key":"type"}"#).unwrap();
        assert_eq!(event, Event::SetFilter { key: "type".into(), value: None });

        let event: Event = serde_json::from_str(r#"{"intent":"go_to_next"}"#).unwrap();
        assert_eq!(event, Event::GoToNext);
    }
}
