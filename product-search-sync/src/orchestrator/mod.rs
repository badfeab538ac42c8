//! Orchestrator module for product synchronization.
//!
//! Coordinates the schema manager and the bulk synchronizer, both for
//! on-demand reindexing and for the startup sequence.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::errors::SyncError;
use crate::synchronizer::{BulkSynchronizer, SyncReport};
use product_search_repository::{ClientManager, SchemaManager, SearchEngine};

/// How the index is rebuilt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReindexStrategy {
    /// Drop and recreate the index in place, then load it. Searches fail or
    /// see a partial index while this runs.
    #[default]
    Recreate,
    /// Build a new generation behind the alias, load it, then swap the alias.
    AliasSwap,
}

impl fmt::Display for ReindexStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recreate => write!(f, "recreate"),
            Self::AliasSwap => write!(f, "alias_swap"),
        }
    }
}

impl FromStr for ReindexStrategy {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "recreate" => Ok(Self::Recreate),
            "alias_swap" | "alias-swap" => Ok(Self::AliasSwap),
            other => Err(SyncError::config(format!(
                "Unknown reindex strategy '{}', expected 'recreate' or 'alias_swap'",
                other
            ))),
        }
    }
}

/// Summary of a completed reindex.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReindexReport {
    /// Strategy that was applied.
    pub strategy: ReindexStrategy,
    /// Concrete index the documents were written to.
    pub index: String,
    /// Generations dropped after the alias moved.
    pub retired: Vec<String>,
    /// Synchronization counts.
    pub sync: SyncReport,
}

/// Provisions the index and loads the product snapshot into it.
pub struct Reindexer {
    schema: SchemaManager,
    synchronizer: Arc<BulkSynchronizer>,
    strategy: ReindexStrategy,
}

impl Reindexer {
    /// Create a reindexer.
    ///
    /// # Arguments
    ///
    /// * `schema` - Manager for the index the synchronizer writes to
    /// * `synchronizer` - Loads the snapshot
    /// * `strategy` - Recreate in place or swap generations behind the alias
    pub fn new(
        schema: SchemaManager,
        synchronizer: Arc<BulkSynchronizer>,
        strategy: ReindexStrategy,
    ) -> Self {
        Self {
            schema,
            synchronizer,
            strategy,
        }
    }

    /// Configured strategy.
    pub fn strategy(&self) -> ReindexStrategy {
        self.strategy
    }

    /// Rebuild the index.
    ///
    /// A schema failure aborts the run before any document is loaded.
    ///
    /// # Returns
    ///
    /// * `Ok(ReindexReport)` - The index was rebuilt
    /// * `Err(SyncError)` - Provisioning or synchronization failed
    #[instrument(skip(self, engine), fields(strategy = %self.strategy))]
    pub async fn run(&self, engine: Arc<dyn SearchEngine>) -> Result<ReindexReport, SyncError> {
        match self.strategy {
            ReindexStrategy::Recreate => {
                self.schema.provision(engine.as_ref()).await?;

                let index = self.schema.index().to_string();
                let sync = self.synchronizer.resync_into(engine, &index).await?;

                Ok(ReindexReport {
                    strategy: self.strategy,
                    index,
                    retired: Vec::new(),
                    sync,
                })
            }
            ReindexStrategy::AliasSwap => {
                let generation = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
                let index = self
                    .schema
                    .create_generation(engine.as_ref(), generation)
                    .await?;

                match self.load_and_promote(&engine, &index, generation).await {
                    Ok((sync, retired)) => Ok(ReindexReport {
                        strategy: self.strategy,
                        index,
                        retired,
                        sync,
                    }),
                    Err(e) => {
                        match self.schema.discard_generation(engine.as_ref(), generation).await {
                            Ok(true) => warn!(generation = %index, "Dropped generation of failed reindex"),
                            Ok(false) => {}
                            Err(cleanup) => error!(
                                generation = %index,
                                error = %cleanup,
                                "Failed to drop generation of failed reindex"
                            ),
                        }
                        Err(e)
                    }
                }
            }
        }
    }

    async fn load_and_promote(
        &self,
        engine: &Arc<dyn SearchEngine>,
        index: &str,
        generation: u64,
    ) -> Result<(SyncReport, Vec<String>), SyncError> {
        let sync = self
            .synchronizer
            .resync_into(Arc::clone(engine), index)
            .await?;
        let retired = self.schema.promote(engine.as_ref(), generation).await?;
        Ok((sync, retired))
    }
}

/// Startup stage that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupStage {
    /// Provisioning the index.
    Schema,
    /// Loading the snapshot.
    Sync,
}

impl fmt::Display for StartupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema => write!(f, "schema"),
            Self::Sync => write!(f, "sync"),
        }
    }
}

/// Result of the startup sequence. The service keeps running in every case.
#[derive(Debug, Clone, PartialEq)]
pub enum StartupOutcome {
    /// Connected, provisioned and loaded.
    Ready(ReindexReport),
    /// The engine never answered; search endpoints report unavailability.
    SearchDisabled(String),
    /// Connected, but provisioning or loading failed.
    Degraded {
        /// Stage that failed.
        stage: StartupStage,
        /// What went wrong.
        error: SyncError,
    },
}

/// Runs connect, provision and resync once at startup.
pub struct StartupOrchestrator {
    clients: Arc<ClientManager>,
    reindexer: Arc<Reindexer>,
}

impl StartupOrchestrator {
    /// Create a new orchestrator.
    pub fn new(clients: Arc<ClientManager>, reindexer: Arc<Reindexer>) -> Self {
        Self { clients, reindexer }
    }

    /// Run the startup sequence. Never fails; the outcome says what happened.
    #[instrument(skip(self))]
    pub async fn run(&self) -> StartupOutcome {
        info!("Starting search index initialization");

        let engine = match self.clients.acquire().await {
            Ok(engine) => engine,
            Err(e) => {
                warn!(error = %e, "Search engine unavailable, search is disabled");
                return StartupOutcome::SearchDisabled(e.to_string());
            }
        };

        match self.reindexer.run(engine).await {
            Ok(report) => {
                info!(
                    index = %report.index,
                    indexed = report.sync.indexed,
                    failed = report.sync.failed,
                    "Search index ready"
                );
                StartupOutcome::Ready(report)
            }
            Err(e) => {
                let stage = if e.is_schema() {
                    StartupStage::Schema
                } else {
                    StartupStage::Sync
                };
                error!(stage = %stage, error = %e, "Search index initialization failed");
                StartupOutcome::Degraded { stage, error: e }
            }
        }
    }
}
