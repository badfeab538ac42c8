//! Postgres product source.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;
use tracing::{debug, info, instrument};

use crate::errors::SyncError;
use crate::source::ProductSource;
use product_search_shared::ProductRow;

/// Snapshot query. Categories are joined in so there is one round trip.
pub const PRODUCTS_QUERY: &str = "SELECT p.id::BIGINT AS id, p.name, p.description, \
     c.name AS category, p.price::FLOAT8 AS price, p.in_stock \
     FROM products p LEFT JOIN categories c ON c.id = p.category_id \
     ORDER BY p.id";

/// Raw row as returned by [`PRODUCTS_QUERY`]; nullable columns stay optional
/// so one bad row cannot fail the whole snapshot.
#[derive(Debug, FromRow)]
struct ProductRecord {
    id: i64,
    name: Option<String>,
    description: Option<String>,
    category: Option<String>,
    price: Option<f64>,
    in_stock: Option<bool>,
}

impl From<ProductRecord> for ProductRow {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.unwrap_or_default(),
            description: record.description,
            category: record.category,
            // A missing price is not indexable; the processor skips it.
            price: record.price.unwrap_or(f64::NAN),
            in_stock: record.in_stock.unwrap_or(false),
        }
    }
}

/// Reads products from Postgres.
#[derive(Debug, Clone)]
pub struct PostgresProductSource {
    pool: PgPool,
}

impl PostgresProductSource {
    /// Create a source with a lazily connecting pool.
    ///
    /// No connection is opened until the first fetch, so a database outage
    /// does not prevent the service from starting.
    ///
    /// # Arguments
    ///
    /// * `database_url` - Postgres connection string
    ///
    /// # Returns
    ///
    /// * `Ok(PostgresProductSource)` - A new source
    /// * `Err(SyncError::ConfigError)` - If the connection string is invalid
    pub fn connect_lazy(database_url: &str) -> Result<Self, SyncError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect_lazy(database_url)
            .map_err(|e| SyncError::config(format!("Invalid database URL: {}", e)))?;

        info!("Created Postgres product source");
        Ok(Self { pool })
    }
}

#[async_trait]
impl ProductSource for PostgresProductSource {
    #[instrument(skip(self))]
    async fn fetch_all(&self) -> Result<Vec<ProductRow>, SyncError> {
        let records = sqlx::query_as::<_, ProductRecord>(PRODUCTS_QUERY)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = records.len(), "Fetched product snapshot");
        Ok(records.into_iter().map(ProductRow::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_conversion_keeps_nullable_columns() {
        let row = ProductRow::from(ProductRecord {
            id: 9,
            name: Some("Desk".to_string()),
            description: None,
            category: None,
            price: Some(120.0),
            in_stock: None,
        });

        assert_eq!(row.id, 9);
        assert_eq!(row.name, "Desk");
        assert!(row.category.is_none());
        assert_eq!(row.price, 120.0);
        assert!(!row.in_stock);
    }

    #[test]
    fn test_record_without_price_is_not_finite() {
        let row = ProductRow::from(ProductRecord {
            id: 10,
            name: None,
            description: None,
            category: None,
            price: None,
            in_stock: Some(true),
        });

        assert!(row.name.is_empty());
        assert!(!row.price.is_finite());
    }

    #[test]
    fn test_query_joins_categories_in_one_statement() {
        assert!(PRODUCTS_QUERY.contains("LEFT JOIN categories"));
        assert!(PRODUCTS_QUERY.ends_with("ORDER BY p.id"));
    }

    #[tokio::test]
    async fn test_connect_lazy_rejects_invalid_url() {
        let err = PostgresProductSource::connect_lazy("not-a-url").unwrap_err();
        assert!(matches!(err, SyncError::ConfigError(_)));
    }
}
