//! Loader module for product synchronization.
//!
//! Loads processed documents into the search index.

use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use crate::errors::SyncError;
use product_search_repository::{BulkDocument, BulkOutcome, SearchEngine};

/// Loader that indexes documents into the search engine.
///
/// The whole snapshot goes out in one bulk request keyed by document id,
/// followed by a refresh so the documents are searchable when `load`
/// returns. Documents rejected by the engine are reported, not retried.
pub struct BulkLoader {
    engine: Arc<dyn SearchEngine>,
}

impl BulkLoader {
    /// Create a new loader for the given engine.
    pub fn new(engine: Arc<dyn SearchEngine>) -> Self {
        Self { engine }
    }

    /// Index documents into `index` and make them visible to search.
    ///
    /// An empty batch sends nothing.
    ///
    /// # Returns
    ///
    /// * `Ok(BulkOutcome)` - Counts and per-document rejections
    /// * `Err(SyncError::Search)` - The bulk or refresh request failed as a whole
    #[instrument(skip(self, documents), fields(count = documents.len()))]
    pub async fn load(
        &self,
        index: &str,
        documents: &[BulkDocument],
    ) -> Result<BulkOutcome, SyncError> {
        if documents.is_empty() {
            debug!(index = %index, "Nothing to load");
            return Ok(BulkOutcome::default());
        }

        info!(index = %index, count = documents.len(), "Loading documents into search index");

        let outcome = self
            .engine
            .bulk_index(index, documents)
            .await
            .inspect_err(|e| error!(index = %index, error = %e, "Bulk request failed"))?;

        for failure in &outcome.failures {
            error!(
                index = %index,
                product_id = %failure.id,
                status = failure.status,
                reason = %failure.reason,
                "Document rejected"
            );
        }

        self.engine.refresh(index).await?;

        debug!(
            index = %index,
            succeeded = outcome.succeeded,
            failed = outcome.failures.len(),
            "Bulk load completed"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use product_search_repository::testing::MemoryEngine;
    use serde_json::json;

    fn doc(id: &str) -> BulkDocument {
        BulkDocument {
            id: id.to_string(),
            source: json!({ "id": id, "name": format!("Product {}", id) }),
        }
    }

    #[tokio::test]
    async fn test_load_makes_documents_searchable() {
        let engine = Arc::new(MemoryEngine::new());
        let loader = BulkLoader::new(engine.clone());

        let outcome = loader.load("products", &[doc("1"), doc("2")]).await.unwrap();

        assert_eq!(outcome.succeeded, 2);
        assert!(outcome.is_complete());
        assert_eq!(engine.documents("products").len(), 2);
        assert_eq!(engine.bulk_calls(), 1);
    }

    #[tokio::test]
    async fn test_load_empty_batch_sends_nothing() {
        let engine = Arc::new(MemoryEngine::new());
        let loader = BulkLoader::new(engine.clone());

        let outcome = loader.load("products", &[]).await.unwrap();

        assert_eq!(outcome, BulkOutcome::default());
        assert_eq!(engine.bulk_calls(), 0);
    }

    #[tokio::test]
    async fn test_load_reports_rejected_documents() {
        let engine = Arc::new(MemoryEngine::new());
        engine.reject_documents(["2"]);
        let loader = BulkLoader::new(engine.clone());

        let outcome = loader.load("products", &[doc("1"), doc("2")]).await.unwrap();

        assert_eq!(outcome.succeeded, 1);
        assert_eq!(outcome.failures[0].id, "2");
        assert_eq!(engine.documents("products").len(), 1);
    }

    #[tokio::test]
    async fn test_load_fails_when_engine_unreachable() {
        let engine = Arc::new(MemoryEngine::new());
        engine.set_reachable(false);
        let loader = BulkLoader::new(engine);

        let err = loader.load("products", &[doc("1")]).await.unwrap_err();

        assert!(matches!(err, SyncError::Search(e) if e.is_unavailable()));
    }
}
