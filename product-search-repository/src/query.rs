//! Query service.
//!
//! Executes caller-supplied search bodies, completion suggestions and health
//! checks against the product index, translating engine failures into the
//! error taxonomy callers map to responses.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use product_search_shared::{
    ClusterHealth, SearchOptions, SearchResponse, SuggestOptions, MAX_PAGE_SIZE, PRODUCT_INDEX,
};

use crate::client::ClientManager;
use crate::errors::SearchError;
use crate::interfaces::SearchEngine;
use crate::opensearch::queries::{build_suggest_query, inject_default_highlight};
use crate::opensearch::responses::{
    parse_cluster_health, parse_search_response, parse_suggestions,
};
use crate::types::SearchPage;

/// Minimum number of characters (after trimming) a suggestion prefix needs.
const MIN_SUGGEST_CHARS: usize = 2;

/// Completion texts, in engine order. Can be consumed once.
#[derive(Debug, Default)]
pub struct Suggestions(std::vec::IntoIter<String>);

impl Suggestions {
    /// No suggestions.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl From<Vec<String>> for Suggestions {
    fn from(texts: Vec<String>) -> Self {
        Self(texts.into_iter())
    }
}

impl Iterator for Suggestions {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for Suggestions {}

/// What [`QueryService::suggest`] returns when a suggestion request fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SuggestFallback {
    /// Log the failure and return no suggestions.
    #[default]
    DegradeToEmpty,
}

impl SuggestFallback {
    /// Resolve a suggestion result according to this policy.
    pub fn apply(self, result: Result<Suggestions, SearchError>) -> Suggestions {
        match (self, result) {
            (_, Ok(suggestions)) => suggestions,
            (Self::DegradeToEmpty, Err(e)) => {
                warn!(error = %e, "Suggestion request failed, returning no suggestions");
                Suggestions::empty()
            }
        }
    }
}

/// Search, suggest and health operations over the product index.
///
/// Uses the connection already established by the [`ClientManager`] and
/// never connects on its own.
pub struct QueryService {
    clients: Arc<ClientManager>,
    index: String,
    fallback: SuggestFallback,
}

impl QueryService {
    /// Query service for the `products` index.
    pub fn new(clients: Arc<ClientManager>) -> Self {
        Self {
            clients,
            index: PRODUCT_INDEX.to_string(),
            fallback: SuggestFallback::default(),
        }
    }

    /// Use a different default index.
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    /// Default index searched by [`search`](Self::search).
    pub fn index(&self) -> &str {
        &self.index
    }

    async fn engine(&self) -> Result<Arc<dyn SearchEngine>, SearchError> {
        self.clients
            .current()
            .await
            .ok_or_else(|| SearchError::service_unavailable("Search engine is not connected"))
    }

    /// Run a search against the default index.
    ///
    /// # Arguments
    ///
    /// * `query` - Raw query DSL body; must be a JSON object
    /// * `options` - Page size and offset, and whether to add default highlighting
    ///
    /// # Returns
    ///
    /// * `Ok(SearchResponse)` - Total, timing and ranked hits
    /// * `Err(SearchError)` - `InvalidRequest`, `NotFound`, `ServiceUnavailable`
    ///   or `InternalError`
    pub async fn search(
        &self,
        query: Value,
        options: SearchOptions,
    ) -> Result<SearchResponse, SearchError> {
        self.search_in(&self.index, query, options).await
    }

    /// Run a search against an explicit index.
    #[instrument(skip(self, query), fields(size = options.size, from = options.from))]
    pub async fn search_in(
        &self,
        index: &str,
        query: Value,
        options: SearchOptions,
    ) -> Result<SearchResponse, SearchError> {
        if options.size > MAX_PAGE_SIZE {
            return Err(SearchError::invalid_request(format!(
                "Maximum size is {}",
                MAX_PAGE_SIZE
            )));
        }

        let Value::Object(mut body) = query else {
            return Err(SearchError::invalid_request(
                "Invalid search query: body must be a JSON object",
            ));
        };

        if options.highlight {
            inject_default_highlight(&mut body);
        }

        let page =
            SearchPage::new(options.size, options.from).map_err(|e| search_failure(index, e))?;

        let engine = self.engine().await?;

        let raw = engine
            .search(index, Value::Object(body), Some(page))
            .await
            .map_err(|e| search_failure(index, e))?;

        let response = parse_search_response(&raw).map_err(|e| {
            error!(index = %index, error = %e, "Unreadable search response");
            SearchError::internal("Search failed")
        })?;

        debug!(index = %index, total = response.total, took_ms = response.took_ms, "Search completed");
        Ok(response)
    }

    /// Completion suggestions for a prefix, surfacing failures.
    ///
    /// Prefixes shorter than two characters after trimming return nothing
    /// without contacting the engine.
    pub async fn try_suggest(
        &self,
        text: &str,
        options: &SuggestOptions,
    ) -> Result<Suggestions, SearchError> {
        let prefix = text.trim();
        if prefix.chars().count() < MIN_SUGGEST_CHARS {
            return Ok(Suggestions::empty());
        }

        let engine = self.engine().await?;
        let body = build_suggest_query(prefix, options.size, options.category.as_deref());
        let raw = engine.search(&self.index, body, None).await?;

        Ok(parse_suggestions(&raw).into())
    }

    /// Completion suggestions for a prefix; failures yield no suggestions.
    pub async fn suggest(&self, text: &str, options: &SuggestOptions) -> Suggestions {
        self.fallback.apply(self.try_suggest(text, options).await)
    }

    /// Combined engine info and cluster health.
    ///
    /// # Returns
    ///
    /// * `Ok(ClusterHealth)` - The engine answered both checks
    /// * `Err(SearchError::ServiceUnavailable)` - No connection, or the
    ///   engine could not be reached
    /// * `Err(SearchError::InternalError)` - Any other failure
    pub async fn health(&self) -> Result<ClusterHealth, SearchError> {
        let engine = self.engine().await?;

        let info = engine.info().await.map_err(health_failure)?;
        let health = engine.cluster_health().await.map_err(health_failure)?;

        parse_cluster_health(&info, &health).map_err(health_failure)
    }
}

/// Map an engine failure during search to a caller-safe error.
fn search_failure(index: &str, err: SearchError) -> SearchError {
    match err {
        SearchError::NotFound(_) => {
            warn!(index = %index, "Search against missing index");
            SearchError::not_found(format!("Index '{}' not found", index))
        }
        SearchError::InvalidRequest(reason) => {
            warn!(index = %index, reason = %reason, "Engine rejected search query");
            SearchError::invalid_request(format!("Invalid search query: {}", reason))
        }
        e if e.is_unavailable() => {
            error!(index = %index, error = %e, "Search engine unreachable");
            SearchError::service_unavailable("Search temporarily unavailable")
        }
        e => {
            error!(index = %index, error = %e, "Search failed");
            SearchError::internal("Search failed")
        }
    }
}

/// Map an engine failure during the health check to a caller-safe error.
fn health_failure(err: SearchError) -> SearchError {
    if err.is_unavailable() {
        error!(error = %err, "Health check could not reach the search engine");
        SearchError::service_unavailable("Search engine unavailable")
    } else {
        error!(error = %err, "Health check failed");
        SearchError::internal("Health check failed")
    }
}
