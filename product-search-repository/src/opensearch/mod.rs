//! OpenSearch implementation of the search engine interfaces.

mod client;
pub mod index_config;
pub mod queries;
pub mod responses;

pub use client::{OpenSearchConnector, OpenSearchEngine};
pub use index_config::get_index_settings;
