//! Synchronization error types.

use product_search_repository::SearchError;
use thiserror::Error;

/// Errors that can occur while reading products and loading them into the index.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    /// The relational product source failed.
    #[error("Product source error: {0}")]
    SourceError(String),

    /// The search engine rejected or failed a request as a whole.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SyncError {
    /// Create a product source error.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::SourceError(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Whether the index schema could not be provisioned.
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Search(SearchError::SchemaError(_)))
    }
}

impl From<sqlx::Error> for SyncError {
    fn from(err: sqlx::Error) -> Self {
        Self::SourceError(err.to_string())
    }
}
