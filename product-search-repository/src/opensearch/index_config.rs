//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for the product search index.

use serde_json::{json, Value};

/// Name of the completion suggester used by suggest requests.
pub const SUGGESTER_NAME: &str = "product-suggest";

/// Name of the completion field in every product document.
pub const SUGGEST_FIELD: &str = "suggest";

/// Name of the completion context used to scope suggestions by category.
pub const CATEGORY_CONTEXT: &str = "category";

/// Get the index settings and mappings for the product search index.
///
/// The configuration includes:
/// - **text** fields for full-text search on name and description, with an
///   English-analysed and an exact-match sub-field on name
/// - **keyword** fields for ids and category filtering
/// - **completion** field with a category context for autocomplete
///
/// # Sharding Configuration
///
/// - 1 primary shard
/// - 1 replica for redundancy
pub fn get_index_settings() -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "properties": {
                "id": {
                    "type": "keyword"
                },
                "name": {
                    "type": "text",
                    "fields": {
                        "keyword": {
                            "type": "keyword"
                        },
                        "english": {
                            "type": "text",
                            "analyzer": "english"
                        }
                    }
                },
                "description": {
                    "type": "text"
                },
                "category": {
                    "type": "keyword"
                },
                "price": {
                    "type": "float"
                },
                "in_stock": {
                    "type": "boolean"
                },
                "suggest": {
                    "type": "completion",
                    "contexts": [
                        {
                            "name": CATEGORY_CONTEXT,
                            "type": "category"
                        }
                    ]
                }
            }
        }
    })
}

/// Concrete index name of a generation behind the given alias,
/// e.g. `products_v1700000000000`.
pub fn generation_name(alias: &str, generation: u64) -> String {
    format!("{}_v{}", alias, generation)
}

/// Whether `index` is a generation created behind `alias`.
pub fn is_generation_of(alias: &str, index: &str) -> bool {
    index
        .strip_prefix(alias)
        .and_then(|rest| rest.strip_prefix("_v"))
        .is_some_and(|version| !version.is_empty() && version.bytes().all(|b| b.is_ascii_digit()))
}
