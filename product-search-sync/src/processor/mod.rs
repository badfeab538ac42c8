//! Processor module for product synchronization.
//!
//! Transforms product rows into search documents.

mod product_processor;

pub use product_processor::{ProcessedBatch, ProductProcessor};
