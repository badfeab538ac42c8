//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchEngine` and
//! `EngineConnector` using the OpenSearch Rust client.

use std::sync::Arc;

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::{
        request::JsonBody,
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
        StatusCode,
    },
    indices::{
        IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts, IndicesGetAliasParts,
        IndicesGetParts, IndicesRefreshParts,
    },
    BulkParts, OpenSearch, SearchParts,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::config::EngineConfig;
use crate::errors::SearchError;
use crate::interfaces::{EngineConnector, SearchEngine};
use crate::opensearch::responses::{error_reason, parse_bulk_response};
use crate::types::{BulkDocument, BulkOutcome, SearchPage};

/// OpenSearch client implementation.
///
/// Talks to a single node over HTTP. Sniffing is never enabled and the
/// transport does not retry; the client manager decides when to try again.
///
/// # Example
///
/// ```ignore
/// use product_search_repository::config::EngineConfig;
/// let engine = OpenSearchEngine::new(&EngineConfig::from_url(Some("http://localhost:9200")))?;
/// assert!(engine.ping().await?);
/// ```
pub struct OpenSearchEngine {
    client: OpenSearch,
}

impl OpenSearchEngine {
    /// Create a new OpenSearch client for the configured URL.
    ///
    /// # Arguments
    ///
    /// * `config` - Endpoint and request timeout
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchEngine)` - A new client instance
    /// * `Err(SearchError)` - If the URL is invalid or the transport cannot be built
    pub fn new(config: &EngineConfig) -> Result<Self, SearchError> {
        let parsed_url = Url::parse(&config.url).map_err(|e| {
            SearchError::engine_unavailable(format!("Invalid engine URL '{}': {}", config.url, e))
        })?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .timeout(config.request_timeout)
            .disable_proxy()
            .build()
            .map_err(|e| SearchError::engine_unavailable(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %config.url, "Created OpenSearch client");

        Ok(Self { client })
    }
}

/// Map an error status and body to the error taxonomy.
fn status_error(status: StatusCode, body: &Value) -> SearchError {
    let reason = error_reason(body);

    match status.as_u16() {
        404 => SearchError::not_found(reason),
        400 => SearchError::invalid_request(reason),
        401 | 403 | 502 | 503 | 504 => {
            SearchError::service_unavailable(format!("status {}: {}", status, reason))
        }
        _ => SearchError::internal(format!("status {}: {}", status, reason)),
    }
}

/// Map a transport-level failure. Errors without a status mean the engine
/// could not be reached.
fn transport_error(err: opensearch::Error) -> SearchError {
    match err.status_code() {
        Some(status) => status_error(status, &Value::Null),
        None => SearchError::service_unavailable(err.to_string()),
    }
}

/// Pass successful responses through; turn failures into errors.
async fn ensure_success(response: Response) -> Result<Response, SearchError> {
    let status = response.status_code();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.json::<Value>().await.unwrap_or(Value::Null);
    let err = status_error(status, &body);
    debug!(status = %status, error = %err, "Engine request failed");
    Err(err)
}

/// Read a successful response body as JSON.
async fn read_json(response: Response) -> Result<Value, SearchError> {
    ensure_success(response)
        .await?
        .json::<Value>()
        .await
        .map_err(|e| SearchError::internal(format!("Failed to parse engine response: {}", e)))
}

/// Action and source lines of a bulk index request, keyed by document id.
fn bulk_lines(documents: &[BulkDocument]) -> Vec<Value> {
    documents
        .iter()
        .flat_map(|doc| [json!({ "index": { "_id": doc.id } }), doc.source.clone()])
        .collect()
}

#[async_trait]
impl SearchEngine for OpenSearchEngine {
    async fn ping(&self) -> Result<bool, SearchError> {
        let response = self.client.ping().send().await.map_err(transport_error)?;
        Ok(response.status_code().is_success())
    }

    async fn info(&self) -> Result<Value, SearchError> {
        let response = self.client.info().send().await.map_err(transport_error)?;
        read_json(response).await
    }

    async fn cluster_health(&self) -> Result<Value, SearchError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(transport_error)?;
        read_json(response).await
    }

    async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(transport_error)?;

        match response.status_code() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(status_error(status, &Value::Null)),
        }
    }

    #[instrument(skip(self, body))]
    async fn create_index(&self, index: &str, body: Value) -> Result<(), SearchError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;

        ensure_success(response).await?;
        info!(index = %index, "Created index");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_index(&self, index: &str) -> Result<(), SearchError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await
            .map_err(transport_error)?;

        ensure_success(response).await?;
        info!(index = %index, "Deleted index");
        Ok(())
    }

    async fn alias_targets(&self, alias: &str) -> Result<Vec<String>, SearchError> {
        let response = self
            .client
            .indices()
            .get_alias(IndicesGetAliasParts::Name(&[alias]))
            .send()
            .await
            .map_err(transport_error)?;

        if response.status_code() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        let body = read_json(response).await?;
        let mut targets: Vec<String> = body
            .as_object()
            .map(|indices| indices.keys().cloned().collect())
            .unwrap_or_default();
        targets.sort();
        Ok(targets)
    }

    async fn indices_with_prefix(&self, prefix: &str) -> Result<Vec<String>, SearchError> {
        let pattern = format!("{}*", prefix);
        let patterns = [pattern.as_str()];
        let response = self
            .client
            .indices()
            .get(IndicesGetParts::Index(&patterns))
            .allow_no_indices(true)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status_code() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        let body = read_json(response).await?;
        let mut indices: Vec<String> = body
            .as_object()
            .map(|indices| indices.keys().cloned().collect())
            .unwrap_or_default();
        indices.sort();
        Ok(indices)
    }

    #[instrument(skip(self, actions))]
    async fn update_aliases(&self, actions: Value) -> Result<(), SearchError> {
        let response = self
            .client
            .indices()
            .update_aliases()
            .body(actions)
            .send()
            .await
            .map_err(transport_error)?;

        ensure_success(response).await?;
        Ok(())
    }

    async fn refresh(&self, index: &str) -> Result<(), SearchError> {
        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[index]))
            .send()
            .await
            .map_err(transport_error)?;

        ensure_success(response).await?;
        Ok(())
    }

    async fn bulk_index(
        &self,
        index: &str,
        documents: &[BulkDocument],
    ) -> Result<BulkOutcome, SearchError> {
        if documents.is_empty() {
            return Ok(BulkOutcome::default());
        }

        debug!(index = %index, count = documents.len(), "Sending bulk request");

        let body: Vec<JsonBody<Value>> = bulk_lines(documents)
            .into_iter()
            .map(JsonBody::from)
            .collect();

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;

        let result = read_json(response).await?;
        let outcome = parse_bulk_response(&result);

        if !outcome.is_complete() {
            error!(
                index = %index,
                failed = outcome.failures.len(),
                succeeded = outcome.succeeded,
                "Bulk request had rejected documents"
            );
        }

        Ok(outcome)
    }

    async fn search(
        &self,
        index: &str,
        body: Value,
        page: Option<SearchPage>,
    ) -> Result<Value, SearchError> {
        let indices = [index];
        let mut request = self
            .client
            .search(SearchParts::Index(&indices))
            .rest_total_hits_as_int(true)
            .body(body);

        if let Some(page) = page {
            request = request.size(page.size).from(page.from);
        }

        let response = request.send().await.map_err(transport_error)?;
        read_json(response).await
    }
}

/// Connector producing [`OpenSearchEngine`] handles.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenSearchConnector;

#[async_trait]
impl EngineConnector for OpenSearchConnector {
    async fn connect(&self, config: &EngineConfig) -> Result<Arc<dyn SearchEngine>, SearchError> {
        let engine = OpenSearchEngine::new(config)?;
        Ok(Arc::new(engine))
    }
}
