//! Error types for the product search repository.

mod search_error;

pub use search_error::SearchError;
