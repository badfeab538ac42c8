//! Interface definitions for the search engine.
//!
//! This module defines the abstract `SearchEngine` and `EngineConnector`
//! traits that allow for dependency injection and swappable backends.

mod engine_connector;
mod search_engine;

pub use engine_connector::EngineConnector;
pub use search_engine::SearchEngine;
