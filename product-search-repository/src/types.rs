//! Request and response types for engine-level operations.

use serde_json::Value;

use crate::errors::SearchError;

/// Paging parameters sent alongside a search body, in the engine's integer width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPage {
    /// Number of hits to return.
    pub size: i64,
    /// Offset of the first hit.
    pub from: i64,
}

impl SearchPage {
    /// Build a page from caller-supplied values.
    ///
    /// # Returns
    ///
    /// * `Ok(SearchPage)` - Both values fit the engine's parameters
    /// * `Err(SearchError::InvalidRequest)` - `size` or `from` is out of range
    pub fn new(size: usize, from: usize) -> Result<Self, SearchError> {
        let size = i64::try_from(size)
            .map_err(|_| SearchError::invalid_request(format!("size {} is out of range", size)))?;
        let from = i64::try_from(from)
            .map_err(|_| SearchError::invalid_request(format!("from {} is out of range", from)))?;
        Ok(Self { size, from })
    }
}

/// A document queued for a bulk index request.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkDocument {
    /// Document `_id`.
    pub id: String,
    /// Document source.
    pub source: Value,
}

/// A single document the engine refused during a bulk request.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkFailure {
    /// Id of the rejected document.
    pub id: String,
    /// HTTP status reported for the item.
    pub status: u16,
    /// Reason reported by the engine.
    pub reason: String,
}

/// Outcome of a bulk index request.
///
/// The request as a whole succeeded; individual documents may still have
/// been rejected and are listed in `failures`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkOutcome {
    /// Engine-side execution time in milliseconds.
    pub took_ms: u64,
    /// Number of documents indexed.
    pub succeeded: usize,
    /// Documents the engine rejected.
    pub failures: Vec<BulkFailure>,
}

impl BulkOutcome {
    /// Whether every document was indexed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
