//! Product source module.
//!
//! Reads the product snapshot the index is built from.

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::errors::SyncError;
use product_search_shared::ProductRow;

pub use memory::InMemoryProductSource;
pub use postgres::{PostgresProductSource, PRODUCTS_QUERY};

/// Read-only access to the relational product store.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Read every product, with its category name resolved.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ProductRow>)` - The full snapshot, ordered by id
    /// * `Err(SyncError::SourceError)` - The store could not be read
    async fn fetch_all(&self) -> Result<Vec<ProductRow>, SyncError>;
}
