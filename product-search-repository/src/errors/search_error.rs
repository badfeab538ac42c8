//! Search error types.
//!
//! This module defines the error taxonomy shared by the client manager, the
//! schema manager and the query service.

use thiserror::Error;

/// Errors that can occur while talking to the search engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// The engine could not be reached or never answered the health check.
    #[error("Search engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The engine rejected an index mapping or a provisioning step failed.
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// The queried index does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request was malformed or exceeded a limit.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The connection was lost while serving a request.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Any other failure.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl SearchError {
    /// Create an engine unavailable error.
    pub fn engine_unavailable(msg: impl Into<String>) -> Self {
        Self::EngineUnavailable(msg.into())
    }

    /// Create a schema error.
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::SchemaError(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a service unavailable error.
    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    /// Whether the error means the engine cannot be reached at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::EngineUnavailable(_) | Self::ServiceUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_unavailable() {
        assert!(SearchError::engine_unavailable("down").is_unavailable());
        assert!(SearchError::service_unavailable("reset").is_unavailable());
        assert!(!SearchError::not_found("products").is_unavailable());
        assert!(!SearchError::internal("boom").is_unavailable());
    }

    #[test]
    fn test_display() {
        let err = SearchError::invalid_request("Maximum size is 100");
        assert_eq!(err.to_string(), "Invalid request: Maximum size is 100");
    }
}
