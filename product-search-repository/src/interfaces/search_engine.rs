//! Search engine trait definition.
//!
//! This module defines the abstract interface for document-search engine
//! operations, allowing for different backend implementations (OpenSearch,
//! in-memory, etc.).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchError;
use crate::types::{BulkDocument, BulkOutcome, SearchPage};

/// Abstract interface for the document-search engine.
///
/// Every component in this crate talks to the engine through this trait, so
/// a single `Arc<dyn SearchEngine>` can be shared by concurrent requests.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// Implementations classify failures into [`SearchError`]:
///
/// * transport failures → `ServiceUnavailable`
/// * missing index → `NotFound`
/// * rejected request (HTTP 400) → `InvalidRequest` with the engine's reason
/// * anything else → `InternalError`
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Liveness check.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The engine answered with a success status
    /// * `Ok(false)` - The engine answered with a failure status
    /// * `Err(SearchError)` - The engine could not be reached
    async fn ping(&self) -> Result<bool, SearchError>;

    /// Engine information (`GET /`), including cluster name and version.
    async fn info(&self) -> Result<Value, SearchError>;

    /// Cluster health (`GET /_cluster/health`).
    async fn cluster_health(&self) -> Result<Value, SearchError>;

    /// Check whether an index (or alias) with this name exists.
    async fn index_exists(&self, index: &str) -> Result<bool, SearchError>;

    /// Create an index with the given settings and mappings body.
    async fn create_index(&self, index: &str, body: Value) -> Result<(), SearchError>;

    /// Delete a concrete index.
    async fn delete_index(&self, index: &str) -> Result<(), SearchError>;

    /// Concrete indices an alias points to; empty when no such alias exists.
    async fn alias_targets(&self, alias: &str) -> Result<Vec<String>, SearchError>;

    /// Concrete indices whose names start with `prefix`, sorted.
    async fn indices_with_prefix(&self, prefix: &str) -> Result<Vec<String>, SearchError>;

    /// Apply a batch of alias actions atomically (`POST /_aliases`).
    async fn update_aliases(&self, actions: Value) -> Result<(), SearchError>;

    /// Make recent writes to an index visible to search.
    async fn refresh(&self, index: &str) -> Result<(), SearchError>;

    /// Index many documents in a single bulk request, keyed by document id.
    ///
    /// # Returns
    ///
    /// * `Ok(BulkOutcome)` - The request was processed; per-document
    ///   rejections are listed in the outcome
    /// * `Err(SearchError)` - The request failed as a whole
    async fn bulk_index(
        &self,
        index: &str,
        documents: &[BulkDocument],
    ) -> Result<BulkOutcome, SearchError>;

    /// Execute a search body against an index and return the raw response.
    ///
    /// Totals are requested as plain integers.
    async fn search(
        &self,
        index: &str,
        body: Value,
        page: Option<SearchPage>,
    ) -> Result<Value, SearchError>;
}
