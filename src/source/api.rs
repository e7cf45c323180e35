//! API-backed data source.
//!
//! [`ApiSource`] turns queries into request parameters and list responses into
//! pages. The transport itself is abstract: anything that can `GET` an endpoint
//! with query parameters and hand back JSON implements [`Transport`].

use crate::domain::error::{DexError, Result};
use crate::domain::{Query, ResultPage};
use crate::source::backend::DataSource;
use crate::source::datasets::DatasetConfig;
use crate::source::normalize::normalize_list;
use futures_util::future::BoxFuture;
use serde_json::Value;

/// Minimal request interface to the backend API.
pub trait Transport: Send + Sync {
    /// Performs a `GET` on `endpoint` with `params` and returns the decoded body.
    ///
    /// # Errors
    ///
    /// Returns an error on any transport, status, or decoding failure.
    fn get<'a>(
        &'a self,
        endpoint: &'a str,
        params: &'a [(String, String)],
    ) -> BoxFuture<'a, Result<Value>>;
}

/// Data source that queries the backend API through a [`Transport`].
///
/// Adjacency lookups use the trait's default: the first
/// [`ADJACENCY_LOOKUP_LIMIT`](super::ADJACENCY_LOOKUP_LIMIT) items of the ordering.
#[derive(Debug, Clone)]
pub struct ApiSource<T> {
    transport: T,
}

impl<T: Transport> ApiSource<T> {
    /// Wraps a transport.
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Returns the underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport> DataSource for ApiSource<T> {
    fn fetch_page<'a>(
        &'a self,
        dataset: &'a DatasetConfig,
        query: &'a Query,
    ) -> BoxFuture<'a, Result<ResultPage>> {
        Box::pin(async move {
            let params = query.to_params();
            tracing::debug!(
                endpoint = %dataset.endpoint,
                params = ?params,
                "requesting dataset page"
            );

            let body = self
                .transport
                .get(&dataset.endpoint, &params)
                .await
                .map_err(|e| match e {
                    DexError::Unavailable(_) => e,
                    other => DexError::Unavailable(other.to_string()),
                })?;

            Ok(normalize_list(
                body,
                dataset.collection_key.as_deref(),
                query.page_size,
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DatasetRegistry;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records requests and answers with a canned body.
    struct CannedTransport {
        body: Option<Value>,
        requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl CannedTransport {
        fn answering(body: Value) -> Self {
            Self {
                body: Some(body),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                body: None,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for CannedTransport {
        fn get<'a>(
            &'a self,
            endpoint: &'a str,
            params: &'a [(String, String)],
        ) -> BoxFuture<'a, Result<Value>> {
            self.requests
                .lock()
                .unwrap()
                .push((endpoint.to_string(), params.to_vec()));
            let body = self.body.clone();
            Box::pin(async move {
                body.ok_or_else(|| DexError::Unavailable("simulated outage".to_string()))
            })
        }
    }

    #[tokio::test]
    async fn sends_query_params_to_dataset_endpoint() {
        let dataset = DatasetRegistry::builtin().get("fakemon").unwrap();
        let source = ApiSource::new(CannedTransport::answering(json!({
            "fakemon": [{ "number": 1, "name": "Leafeon" }],
            "totalItems": 1,
            "totalPages": 1
        })));

        let mut query = Query::new("number", 30);
        query.filters.insert("category".to_string(), "Digimon".to_string());
        let page = source.fetch_page(&dataset, &query).await.unwrap();

        assert_eq!(page.items.len(), 1);
        let requests = source.transport().requests.lock().unwrap();
        assert_eq!(requests[0].0, "/fakedex");
        assert!(requests[0].1.contains(&("category".to_string(), "Digimon".to_string())));
    }

    #[tokio::test]
    async fn any_failure_becomes_unavailable() {
        let dataset = DatasetRegistry::builtin().get("pokemon").unwrap();
        let source = ApiSource::new(CannedTransport::failing());
        let err = source
            .fetch_page(&dataset, &Query::new("ndex", 30))
            .await
            .unwrap_err();
        assert!(matches!(err, DexError::Unavailable(_)));
    }

    #[tokio::test]
    async fn default_adjacency_requests_the_lookup_window() {
        let dataset = DatasetRegistry::builtin().get("nexomon").unwrap();
        let source = ApiSource::new(CannedTransport::answering(json!({
            "data": [{ "nr": 1 }, { "nr": 2 }, { "nr": 3 }],
            "pagination": { "total": 3, "totalPages": 1 }
        })));

        let mut query = Query::new("nr", 30);
        query.page = 4;
        let result = source.fetch_adjacent(&dataset, "3", &query).await.unwrap();

        assert!(result.next.is_none());
        assert_eq!(result.previous.and_then(|i| i.id("nr")).as_deref(), Some("2"));

        let requests = source.transport().requests.lock().unwrap();
        let params = &requests[0].1;
        assert!(params.contains(&("page".to_string(), "1".to_string())));
        assert!(params.contains(&("limit".to_string(), "1000".to_string())));
    }
}
