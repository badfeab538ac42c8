//! Engine connector trait definition.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::EngineConfig;
use crate::errors::SearchError;
use crate::interfaces::SearchEngine;

/// Opens connections to a search engine.
///
/// The client manager owns the retry policy; a connector only builds
/// the handle and does not verify that the engine is reachable.
#[async_trait]
pub trait EngineConnector: Send + Sync {
    /// Build a connection handle for the configured endpoint.
    async fn connect(&self, config: &EngineConfig) -> Result<Arc<dyn SearchEngine>, SearchError>;
}
