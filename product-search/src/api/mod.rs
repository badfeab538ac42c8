//! HTTP boundary for product search.
//!
//! The router is prefix-free; the caller nests it under whatever path the
//! surrounding application uses.

mod error;
mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use product_search_repository::{ClientManager, QueryService};
use product_search_sync::Reindexer;

pub use error::ApiError;

/// Shared state of the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Owner of the search engine connection.
    pub clients: Arc<ClientManager>,
    /// Search, suggest and health operations.
    pub queries: Arc<QueryService>,
    /// Index rebuild.
    pub reindexer: Arc<Reindexer>,
}

/// Build the product search router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/search", post(handlers::search))
        .route("/suggest", get(handlers::suggest))
        .route("/reindex", post(handlers::reindex))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
