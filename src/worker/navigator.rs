//! Adjacency navigator: neighbour lookups that never fail.

use crate::domain::{AdjacencyResult, Query};
use crate::source::{DataSource, DatasetConfig};

/// Resolves the neighbours of `item_id` within the full ordering of `query`.
///
/// A failed lookup resolves to [`AdjacencyResult::unavailable`]: the detail
/// view simply shows no previous or next entry.
pub async fn resolve(
    source: &dyn DataSource,
    dataset: &DatasetConfig,
    item_id: &str,
    query: &Query,
) -> AdjacencyResult {
    match source.fetch_adjacent(dataset, item_id, query).await {
        Ok(result) => {
            tracing::debug!(
                item_id,
                current_index = ?result.current_index,
                total_count = ?result.total_count,
                "adjacency resolved"
            );
            result
        }
        Err(e) => {
            tracing::debug!(item_id, error = %e, "adjacency lookup failed");
            AdjacencyResult::unavailable()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Item;
    use crate::source::{DatasetRegistry, MemorySource};
    use serde_json::json;

    fn nexomon(count: u64) -> MemorySource {
        let items = (1..=count)
            .filter_map(|nr| Item::from_value(json!({ "nr": nr, "name": format!("N{nr}") })))
            .collect();
        MemorySource::new().with_items("nexomon", items)
    }

    #[tokio::test]
    async fn last_item_has_no_next() {
        let dataset = DatasetRegistry::builtin().get("nexomon").unwrap();
        let result = resolve(&nexomon(30), &dataset, "30", &Query::new("nr", 30)).await;

        assert!(result.next.is_none());
        assert_eq!(result.previous.and_then(|i| i.id("nr")).as_deref(), Some("29"));
        assert_eq!(result.current_index, Some(29));
        assert_eq!(result.total_count, Some(30));
    }

    #[tokio::test]
    async fn first_item_has_no_previous() {
        let dataset = DatasetRegistry::builtin().get("nexomon").unwrap();
        let result = resolve(&nexomon(3), &dataset, "1", &Query::new("nr", 30)).await;

        assert!(result.previous.is_none());
        assert_eq!(result.next.and_then(|i| i.id("nr")).as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn missing_item_reports_only_the_count() {
        let dataset = DatasetRegistry::builtin().get("nexomon").unwrap();
        let result = resolve(&nexomon(3), &dataset, "99", &Query::new("nr", 30)).await;

        assert!(result.previous.is_none());
        assert!(result.next.is_none());
        assert!(result.current_index.is_none());
        assert_eq!(result.total_count, Some(3));
    }

    #[tokio::test]
    async fn failure_is_unavailable() {
        let dataset = DatasetRegistry::builtin().get("nexomon").unwrap();
        let result = resolve(&MemorySource::new(), &dataset, "1", &Query::new("nr", 30)).await;
        assert_eq!(result, AdjacencyResult::unavailable());
    }
}
