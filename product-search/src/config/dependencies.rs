//! Dependency initialization and wiring for the product search service.

use std::sync::Arc;
use tracing::info;

use crate::api::AppState;
use crate::config::Settings;
use crate::ServiceError;
use product_search_repository::{
    ClientManager, EngineConnector, OpenSearchConnector, QueryService, SchemaManager,
};
use product_search_sync::{
    BulkSynchronizer, PostgresProductSource, ProductSource, Reindexer, StartupOrchestrator,
};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Owner of the search engine connection.
    pub clients: Arc<ClientManager>,
    /// Search, suggest and health operations.
    pub queries: Arc<QueryService>,
    /// Index rebuild, shared by startup and `/reindex`.
    pub reindexer: Arc<Reindexer>,
}

impl Dependencies {
    /// Initialize all dependencies from settings.
    ///
    /// Nothing here contacts the search engine or the database; connections
    /// are opened by the startup sequence and on first use.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(ServiceError)` - If initialization fails
    pub fn new(settings: &Settings) -> Result<Self, ServiceError> {
        info!(
            opensearch_url = %settings.engine.url,
            reindex_strategy = %settings.reindex_strategy,
            "Initializing dependencies"
        );

        let source = PostgresProductSource::connect_lazy(&settings.database_url)?;

        Ok(Self::with_components(
            settings,
            Arc::new(OpenSearchConnector),
            Arc::new(source),
        ))
    }

    /// Wire dependencies around an explicit connector and product source.
    pub fn with_components(
        settings: &Settings,
        connector: Arc<dyn EngineConnector>,
        source: Arc<dyn ProductSource>,
    ) -> Self {
        let clients = Arc::new(ClientManager::new(connector, settings.engine.clone()));
        let queries = Arc::new(QueryService::new(Arc::clone(&clients)));
        let synchronizer = Arc::new(BulkSynchronizer::new(source));
        let reindexer = Arc::new(Reindexer::new(
            SchemaManager::new(),
            synchronizer,
            settings.reindex_strategy,
        ));

        Self {
            clients,
            queries,
            reindexer,
        }
    }

    /// Startup sequence: connect, provision, resync.
    pub fn startup(&self) -> StartupOrchestrator {
        StartupOrchestrator::new(Arc::clone(&self.clients), Arc::clone(&self.reindexer))
    }

    /// Shared state for the HTTP router.
    pub fn app_state(&self) -> AppState {
        AppState {
            clients: Arc::clone(&self.clients),
            queries: Arc::clone(&self.queries),
            reindexer: Arc::clone(&self.reindexer),
        }
    }
}
