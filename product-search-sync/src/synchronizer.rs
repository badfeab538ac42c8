//! Bulk synchronizer.
//!
//! Rebuilds the contents of the product index from a full snapshot of the
//! relational product store.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::errors::SyncError;
use crate::loader::BulkLoader;
use crate::processor::ProductProcessor;
use crate::source::ProductSource;
use product_search_repository::SearchEngine;
use product_search_shared::PRODUCT_INDEX;

/// Maximum number of rejected or skipped ids sampled into a report.
pub const FAILED_ID_SAMPLE: usize = 10;

/// Summary of one synchronization run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncReport {
    /// Rows read from the source.
    pub total: usize,
    /// Documents the engine accepted.
    pub indexed: usize,
    /// Documents the engine rejected.
    pub failed: usize,
    /// Rows that were not sent because they cannot be indexed.
    pub skipped: usize,
    /// Sample of skipped row ids.
    pub skipped_ids: Vec<String>,
    /// Sample of rejected document ids.
    pub failed_ids: Vec<String>,
    /// Wall-clock duration of the run in milliseconds.
    pub took_ms: u64,
}

/// Result of [`BulkSynchronizer::resync`].
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// The snapshot was loaded.
    Completed(SyncReport),
    /// No engine connection was available; nothing happened.
    Skipped,
}

/// Loads the full product snapshot into the index.
pub struct BulkSynchronizer {
    source: Arc<dyn ProductSource>,
    processor: ProductProcessor,
    index: String,
}

impl BulkSynchronizer {
    /// Synchronizer writing into the `products` index.
    pub fn new(source: Arc<dyn ProductSource>) -> Self {
        Self {
            source,
            processor: ProductProcessor::new(),
            index: PRODUCT_INDEX.to_string(),
        }
    }

    /// Use a different default index.
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    /// Default target index.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Rebuild the default index from the product source.
    ///
    /// # Arguments
    ///
    /// * `engine` - The connected engine, or `None` when search is disabled
    ///
    /// # Returns
    ///
    /// * `Ok(SyncOutcome::Skipped)` - No engine; a warning is logged
    /// * `Ok(SyncOutcome::Completed(report))` - The snapshot was loaded;
    ///   per-document failures are listed in the report
    /// * `Err(SyncError)` - The source or the engine failed as a whole
    pub async fn resync(
        &self,
        engine: Option<Arc<dyn SearchEngine>>,
    ) -> Result<SyncOutcome, SyncError> {
        let Some(engine) = engine else {
            warn!(index = %self.index, "Search engine not connected, skipping synchronization");
            return Ok(SyncOutcome::Skipped);
        };

        let report = self.resync_into(engine, &self.index).await?;
        Ok(SyncOutcome::Completed(report))
    }

    /// Load the full snapshot into an explicit index.
    #[instrument(skip(self, engine))]
    pub async fn resync_into(
        &self,
        engine: Arc<dyn SearchEngine>,
        index: &str,
    ) -> Result<SyncReport, SyncError> {
        let started = Instant::now();

        let rows = self.source.fetch_all().await?;
        let batch = self.processor.process_batch(&rows)?;

        let outcome = BulkLoader::new(engine)
            .load(index, &batch.documents)
            .await?;

        let report = SyncReport {
            total: rows.len(),
            indexed: outcome.succeeded,
            failed: outcome.failures.len(),
            skipped: batch.skipped.len(),
            skipped_ids: batch
                .skipped
                .iter()
                .take(FAILED_ID_SAMPLE)
                .map(i64::to_string)
                .collect(),
            failed_ids: outcome
                .failures
                .iter()
                .take(FAILED_ID_SAMPLE)
                .map(|f| f.id.clone())
                .collect(),
            took_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };

        if report.failed > 0 || report.skipped > 0 {
            warn!(
                index = %index,
                total = report.total,
                indexed = report.indexed,
                failed = report.failed,
                skipped = report.skipped,
                failed_ids = ?report.failed_ids,
                skipped_ids = ?report.skipped_ids,
                "Synchronization finished with errors"
            );
        } else {
            info!(
                index = %index,
                total = report.total,
                indexed = report.indexed,
                took_ms = report.took_ms,
                "Synchronization finished"
            );
        }

        Ok(report)
    }
}
