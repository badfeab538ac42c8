//! In-memory product source.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::errors::SyncError;
use crate::source::ProductSource;
use product_search_shared::ProductRow;

/// Product source backed by a vector; useful for tests and seeding.
#[derive(Debug, Default)]
pub struct InMemoryProductSource {
    rows: RwLock<Vec<ProductRow>>,
    failure: RwLock<Option<String>>,
}

impl InMemoryProductSource {
    /// Source returning the given rows.
    pub fn new(rows: Vec<ProductRow>) -> Self {
        Self {
            rows: RwLock::new(rows),
            failure: RwLock::new(None),
        }
    }

    /// Replace the snapshot.
    pub fn set_rows(&self, rows: Vec<ProductRow>) {
        if let Ok(mut current) = self.rows.write() {
            *current = rows;
        }
    }

    /// Make every fetch fail with this message, or succeed again with `None`.
    pub fn set_failure(&self, failure: Option<&str>) {
        if let Ok(mut current) = self.failure.write() {
            *current = failure.map(String::from);
        }
    }
}

#[async_trait]
impl ProductSource for InMemoryProductSource {
    async fn fetch_all(&self) -> Result<Vec<ProductRow>, SyncError> {
        if let Some(message) = self.failure.read().ok().and_then(|f| f.clone()) {
            return Err(SyncError::fetch(message));
        }

        let mut rows = self
            .rows
            .read()
            .map(|rows| rows.clone())
            .map_err(|e| SyncError::fetch(e.to_string()))?;
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }
}
