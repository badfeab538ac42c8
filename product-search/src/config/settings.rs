//! Settings read from the environment.

use std::env;
use std::net::SocketAddr;

use product_search_repository::EngineConfig;
use product_search_sync::ReindexStrategy;

use crate::telemetry::LogFormat;
use crate::ServiceError;

/// Default listen address.
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8000";

/// Service settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Search engine connection settings.
    pub engine: EngineConfig,
    /// Postgres connection string of the product store.
    pub database_url: String,
    /// Address the HTTP server listens on.
    pub http_addr: SocketAddr,
    /// How `/reindex` and startup rebuild the index.
    pub reindex_strategy: ReindexStrategy,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Settings {
    /// Read settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `DATABASE_URL`: Postgres URL of the product store (required)
    /// - `HTTP_ADDR`: Listen address (default: 0.0.0.0:8000)
    /// - `REINDEX_STRATEGY`: `recreate` or `alias_swap` (default: recreate)
    /// - `LOG_FORMAT`: `pretty` or `json` (default: pretty)
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - Parsed settings
    /// * `Err(ServiceError)` - If a variable is missing or invalid
    pub fn from_env() -> Result<Self, ServiceError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through a lookup function instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let engine = EngineConfig::from_url(value("OPENSEARCH_URL").as_deref());

        let database_url = value("DATABASE_URL")
            .ok_or_else(|| ServiceError::config("DATABASE_URL is not set"))?;

        let http_addr = value("HTTP_ADDR")
            .unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ServiceError::config(format!("Invalid HTTP_ADDR: {}", e)))?;

        let reindex_strategy = value("REINDEX_STRATEGY")
            .map(|s| s.parse::<ReindexStrategy>())
            .transpose()?
            .unwrap_or_default();

        let log_format = value("LOG_FORMAT")
            .map(|s| s.parse::<LogFormat>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            engine,
            database_url,
            http_addr,
            reindex_strategy,
            log_format,
        })
    }
}
