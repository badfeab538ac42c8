//! HTTP handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, warn};

use crate::api::{ApiError, AppState};
use product_search_shared::{ClusterHealth, SearchOptions, SearchResponse, SuggestOptions};
use product_search_sync::ReindexReport;

/// Engine and cluster health.
pub async fn health(State(state): State<AppState>) -> Result<Json<ClusterHealth>, ApiError> {
    Ok(Json(state.queries.health().await?))
}

/// Run a raw query DSL body against the product index.
pub async fn search(
    State(state): State<AppState>,
    options: Result<Query<SearchOptions>, QueryRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Query(options) = options.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let Json(query) = body.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

    Ok(Json(state.queries.search(query, options).await?))
}

/// Query parameters of `/suggest`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SuggestParams {
    /// Prefix typed so far.
    pub text: String,
    /// Maximum number of completions.
    pub size: Option<usize>,
    /// Restrict completions to a category.
    pub category: Option<String>,
}

/// Autocomplete. Always answers with a list, possibly empty.
pub async fn suggest(
    State(state): State<AppState>,
    params: Result<Query<SuggestParams>, QueryRejection>,
) -> Json<Vec<String>> {
    let params = match params {
        Ok(Query(params)) => params,
        Err(e) => {
            warn!(error = %e, "Invalid suggest parameters");
            return Json(Vec::new());
        }
    };

    let mut options = SuggestOptions::default();
    if let Some(size) = params.size {
        options = options.with_size(size);
    }
    options.category = params.category.filter(|c| !c.trim().is_empty());

    Json(state.queries.suggest(&params.text, &options).await.collect())
}

/// Rebuild the index from the product store.
///
/// Connects first when startup could not, so search can be recovered
/// without a restart.
pub async fn reindex(State(state): State<AppState>) -> Result<Json<ReindexReport>, ApiError> {
    let engine = state.clients.acquire().await.map_err(|e| {
        warn!(error = %e, "Reindex requested while the search engine is unreachable");
        ApiError::from(e)
    })?;

    let report = state.reindexer.run(engine).await.map_err(|e| {
        error!(error = %e, "Reindex failed");
        ApiError::Internal(e.to_string())
    })?;

    Ok(Json(report))
}
