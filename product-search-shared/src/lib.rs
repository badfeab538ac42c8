//! # Product Search Shared
//!
//! Plain data types shared by the product search crates: the relational
//! product snapshot, the search document derived from it, and the result
//! envelopes returned by search, suggest and health operations.

pub mod health;
pub mod product;
pub mod search;

pub use health::ClusterHealth;
pub use product::{ProductDocument, ProductRow, SuggestContexts, SuggestField};
pub use search::{SearchHit, SearchOptions, SearchResponse, SuggestOptions};

/// Logical name of the product index (or alias) shared by every component.
pub const PRODUCT_INDEX: &str = "products";

/// Hard cap on the number of hits a single search page may request.
pub const MAX_PAGE_SIZE: usize = 100;
