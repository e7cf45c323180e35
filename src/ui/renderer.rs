//! Plain-text rendering of a browser snapshot.
//!
//! Used by the CLI's `--format text` mode. Layout:
//!
//! ```text
//!  Abilities (30) · page 1/2 · name asc · updated just now
//!  search: "fire"  filters: type=Fire
//!  [loading]
//!   001  Blaze
//!   002  Chlorophyll
//!  ─ detail: Blaze (1 of 30) · prev: - · next: Chlorophyll
//! ```

use crate::app::AppState;
use crate::domain::Item;
use crate::ui::viewmodel::{BrowserViewModel, DetailViewModel};
use std::fmt::Write;

/// Longest name shown before truncation.
const NAME_WIDTH: usize = 35;

/// Renders the current state of `state` as text.
#[must_use]
pub fn render(state: &AppState) -> String {
    let vm = state.compute_viewmodel();
    render_viewmodel(&vm, &state.dataset.id_field, &state.dataset.name_field)
}

/// Renders a computed view model. `id_field` and `name_field` select the
/// columns of each item row.
#[must_use]
pub fn render_viewmodel(vm: &BrowserViewModel, id_field: &str, name_field: &str) -> String {
    let mut out = String::new();
    let results = &vm.results;
    let query = &vm.query;

    let _ = write!(
        out,
        " {} ({}) · page {}/{} · {} {}",
        query.dataset_name,
        results.total,
        query.page,
        results.total_pages.max(1),
        query.sort_field,
        query.sort_order
    );
    if let Some(updated) = &results.updated {
        let _ = write!(out, " · updated {updated}");
    }
    out.push('\n');

    if !query.search_text.is_empty() || !query.filters.is_empty() {
        let filters: Vec<String> = query
            .filters
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        let _ = writeln!(
            out,
            " search: {:?}  filters: {}",
            query.search_text,
            if filters.is_empty() {
                "-".to_string()
            } else {
                filters.join(", ")
            }
        );
    }

    if results.loading {
        out.push_str(" [loading]\n");
    }
    if let Some(error) = &results.error {
        let _ = writeln!(out, " ! {error}");
    }

    if results.items.is_empty() && !results.loading {
        out.push_str("  No entries found\n");
    }
    for item in &results.items {
        let _ = writeln!(
            out,
            "  {:>4}  {}",
            item.id(id_field).unwrap_or_default(),
            display_name(item, name_field)
        );
    }

    if let Some(detail) = &vm.detail {
        out.push_str(&render_detail(detail, name_field));
    }

    out
}

fn render_detail(detail: &DetailViewModel, name_field: &str) -> String {
    let position = match (detail.current_index, detail.total_count) {
        (Some(index), Some(total)) => format!(" ({} of {total})", index + 1),
        _ => String::new(),
    };
    let neighbour = |item: Option<&Item>| {
        item.map_or_else(|| "-".to_string(), |i| display_name(i, name_field))
    };

    let mut line = format!(
        " ─ detail: {}{position}",
        display_name(&detail.selected_item, name_field)
    );
    if detail.adjacency_loading {
        line.push_str(" · resolving neighbours");
    } else {
        let _ = write!(
            line,
            " · prev: {} · next: {}",
            neighbour(detail.previous.as_ref()),
            neighbour(detail.next.as_ref())
        );
    }
    line.push('\n');
    line
}

fn display_name(item: &Item, name_field: &str) -> String {
    let name = item.text(name_field).unwrap_or("?");
    if name.chars().count() > NAME_WIDTH {
        let kept: String = name.chars().take(NAME_WIDTH - 3).collect();
        format!("{kept}...")
    } else {
        name.to_string()
    }
}
