//! # Product Search Repository
//!
//! This crate provides traits and implementations for interacting with the
//! search engine: the connection manager, the index schema manager, the
//! query service, the error taxonomy and a concrete implementation for
//! OpenSearch.

pub mod client;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod query;
pub mod schema;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
pub mod types;

pub use client::ClientManager;
pub use config::EngineConfig;
pub use errors::SearchError;
pub use interfaces::{EngineConnector, SearchEngine};
pub use opensearch::{OpenSearchConnector, OpenSearchEngine};
pub use query::{QueryService, SuggestFallback, Suggestions};
pub use schema::SchemaManager;
pub use types::{BulkDocument, BulkFailure, BulkOutcome, SearchPage};
