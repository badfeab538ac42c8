//! Product processor implementation.
//!
//! Transforms product rows into bulk documents for indexing.

use tracing::{debug, instrument};

use crate::errors::SyncError;
use product_search_repository::BulkDocument;
use product_search_shared::{ProductDocument, ProductRow};

/// Result of processing a snapshot.
#[derive(Debug, Default)]
pub struct ProcessedBatch {
    /// Documents ready for the bulk request, in snapshot order.
    pub documents: Vec<BulkDocument>,
    /// Ids of rows that could not be indexed.
    pub skipped: Vec<i64>,
}

/// Processor that transforms product rows into search documents.
///
/// The processor is responsible for:
/// - Converting rows to `ProductDocument` structures, including their
///   completion contexts
/// - Filtering out rows that shouldn't be indexed
#[derive(Debug, Default)]
pub struct ProductProcessor {}

impl ProductProcessor {
    /// Create a new product processor.
    pub fn new() -> Self {
        Self {}
    }

    /// Process a snapshot of product rows.
    ///
    /// # Arguments
    ///
    /// * `rows` - The rows to process
    ///
    /// # Returns
    ///
    /// The documents ready for loading and the ids of skipped rows.
    #[instrument(skip(self, rows), fields(row_count = rows.len()))]
    pub fn process_batch(&self, rows: &[ProductRow]) -> Result<ProcessedBatch, SyncError> {
        let mut batch = ProcessedBatch {
            documents: Vec::with_capacity(rows.len()),
            skipped: Vec::new(),
        };

        for row in rows {
            match self.process_row(row)? {
                Some(doc) => batch.documents.push(doc),
                None => batch.skipped.push(row.id),
            }
        }

        debug!(
            processed_count = batch.documents.len(),
            skipped_count = batch.skipped.len(),
            "Processed product snapshot"
        );
        Ok(batch)
    }

    /// Process a single row.
    fn process_row(&self, row: &ProductRow) -> Result<Option<BulkDocument>, SyncError> {
        // Need at least a name to index
        if row.name.trim().is_empty() {
            debug!(product_id = row.id, "Skipping product with no name");
            return Ok(None);
        }

        if !row.price.is_finite() || row.price < 0.0 {
            debug!(product_id = row.id, price = row.price, "Skipping product with invalid price");
            return Ok(None);
        }

        let doc = ProductDocument::from(row);
        let source = serde_json::to_value(&doc).map_err(|e| {
            SyncError::fetch(format!("Failed to serialize product {}: {}", row.id, e))
        })?;

        Ok(Some(BulkDocument { id: doc.id, source }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_rows_into_documents() {
        let processor = ProductProcessor::new();
        let rows = vec![
            ProductRow::new(1, "Red Shoes", 49.99, true).with_category("Footwear"),
            ProductRow::new(2, "Mug", 8.0, false),
        ];

        let batch = processor.process_batch(&rows).unwrap();

        assert_eq!(batch.documents.len(), 2);
        assert!(batch.skipped.is_empty());
        assert_eq!(batch.documents[0].id, "1");
        assert_eq!(batch.documents[0].source["category"], "Footwear");
        assert_eq!(
            batch.documents[1].source["suggest"]["contexts"]["category"],
            serde_json::json!(["General", "all"])
        );
    }

    #[test]
    fn test_skip_invalid_rows() {
        let processor = ProductProcessor::new();
        let rows = vec![
            ProductRow::new(1, "  ", 10.0, true),
            ProductRow::new(2, "Broken", f64::NAN, true),
            ProductRow::new(3, "Refund", -1.0, true),
            ProductRow::new(4, "Valid", 0.0, true),
        ];

        let batch = processor.process_batch(&rows).unwrap();

        assert_eq!(batch.skipped, vec![1, 2, 3]);
        assert_eq!(batch.documents.len(), 1);
        assert_eq!(batch.documents[0].id, "4");
    }

    #[test]
    fn test_empty_snapshot() {
        let batch = ProductProcessor::new().process_batch(&[]).unwrap();
        assert!(batch.documents.is_empty());
        assert!(batch.skipped.is_empty());
    }
}
