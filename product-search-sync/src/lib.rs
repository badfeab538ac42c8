//! # Product Search Sync
//!
//! This crate keeps the product search index in step with the relational
//! product store.
//!
//! ## Architecture
//!
//! Synchronization follows the Source-Processor-Loader pattern:
//!
//! 1. **Source**: Reads the product snapshot from Postgres
//! 2. **Processor**: Transforms rows into search documents
//! 3. **Loader**: Bulk-indexes documents into OpenSearch
//! 4. **Orchestrator**: Provisions the index and coordinates the flow

pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod source;
pub mod synchronizer;

pub use errors::SyncError;
pub use orchestrator::{
    ReindexReport, ReindexStrategy, Reindexer, StartupOrchestrator, StartupOutcome, StartupStage,
};
pub use source::{InMemoryProductSource, PostgresProductSource, ProductSource};
pub use synchronizer::{BulkSynchronizer, SyncOutcome, SyncReport};
