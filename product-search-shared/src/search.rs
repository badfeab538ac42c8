//! Search and suggest request options and result envelopes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Paging and highlighting options for a search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Page size; must not exceed [`crate::MAX_PAGE_SIZE`].
    pub size: usize,
    /// Offset of the first hit.
    pub from: usize,
    /// Inject the default highlight configuration when the query has none.
    pub highlight: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            size: 20,
            from: 0,
            highlight: true,
        }
    }
}

impl SearchOptions {
    /// Set the page size.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Set the offset.
    pub fn with_from(mut self, from: usize) -> Self {
        self.from = from;
        self
    }

    /// Enable or disable default highlighting.
    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }
}

/// A single ranked hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Document id.
    pub id: String,
    /// Relevance score; absent when the query sorts without scoring.
    pub score: Option<f64>,
    /// Full source document.
    pub data: Value,
    /// Highlighted fragments per field; empty when nothing was highlighted.
    pub highlight: HashMap<String, Vec<String>>,
}

/// Result envelope of a search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Exact number of matching documents.
    pub total: u64,
    /// Engine-side execution time in milliseconds.
    pub took_ms: u64,
    /// Hits in rank order.
    pub results: Vec<SearchHit>,
}

impl SearchResponse {
    /// Ids of the returned hits, in rank order.
    pub fn ids(&self) -> Vec<&str> {
        self.results.iter().map(|hit| hit.id.as_str()).collect()
    }
}

/// Options for a completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestOptions {
    /// Maximum number of completions.
    pub size: usize,
    /// Restrict completions to one category; `None` means the whole catalog.
    pub category: Option<String>,
}

impl Default for SuggestOptions {
    fn default() -> Self {
        Self {
            size: 10,
            category: None,
        }
    }
}

impl SuggestOptions {
    /// Scope completions to a category.
    pub fn in_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    /// Set the maximum number of completions.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_options_defaults() {
        let options = SearchOptions::default();
        assert_eq!(options.size, 20);
        assert_eq!(options.from, 0);
        assert!(options.highlight);
    }

    #[test]
    fn test_search_options_partial_deserialize() {
        let options: SearchOptions = serde_json::from_str(r#"{"size": 5}"#).unwrap();
        assert_eq!(options.size, 5);
        assert!(options.highlight);
    }

    #[test]
    fn test_suggest_options_in_category() {
        let options = SuggestOptions::in_category("Footwear").with_size(3);
        assert_eq!(options.category.as_deref(), Some("Footwear"));
        assert_eq!(options.size, 3);
    }
}
