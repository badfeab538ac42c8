//! Product rows and the search documents built from them.

use serde::{Deserialize, Serialize};

/// Context tag attached to every completion candidate so unscoped
/// suggestions see the whole catalog.
pub const ALL_CONTEXT: &str = "all";

/// Context tag used for products that have no category.
pub const FALLBACK_CONTEXT: &str = "General";

/// A product row as read from the relational store.
///
/// The category is resolved by the source query, so a row carries the
/// category name rather than a foreign key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    /// Primary key in the relational store.
    pub id: i64,
    /// Product display name.
    pub name: String,
    /// Optional long description.
    pub description: Option<String>,
    /// Name of the product's category, if any.
    pub category: Option<String>,
    /// Unit price.
    pub price: f64,
    /// Whether the product can currently be ordered.
    pub in_stock: bool,
}

impl ProductRow {
    /// Create a row with the required fields; description and category are unset.
    pub fn new(id: i64, name: impl Into<String>, price: f64, in_stock: bool) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            category: None,
            price,
            in_stock,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the category name.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Completion contexts of a suggest entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestContexts {
    /// Category tags; always contains [`ALL_CONTEXT`].
    pub category: Vec<String>,
}

/// Completion-suggester payload stored alongside each document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestField {
    /// Phrases the completion suggester matches prefixes against.
    pub input: Vec<String>,
    /// Contexts used to scope completion to a category or the whole catalog.
    pub contexts: SuggestContexts,
}

/// A product as stored in the search index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDocument {
    /// Product primary key rendered as a string; also the document `_id`.
    pub id: String,
    /// Product name.
    pub name: String,
    /// Product description.
    pub description: Option<String>,
    /// Category name.
    pub category: Option<String>,
    /// Unit price as a plain float.
    pub price: f64,
    /// Stock flag.
    pub in_stock: bool,
    /// Completion candidates.
    pub suggest: SuggestField,
}

impl From<&ProductRow> for ProductDocument {
    fn from(row: &ProductRow) -> Self {
        let mut contexts = vec![row
            .category
            .clone()
            .unwrap_or_else(|| FALLBACK_CONTEXT.to_string())];
        contexts.push(ALL_CONTEXT.to_string());

        Self {
            id: row.id.to_string(),
            name: row.name.clone(),
            description: row.description.clone(),
            category: row.category.clone(),
            price: row.price,
            in_stock: row.in_stock,
            suggest: SuggestField {
                input: vec![row.name.clone()],
                contexts: SuggestContexts { category: contexts },
            },
        }
    }
}

impl From<ProductRow> for ProductDocument {
    fn from(row: ProductRow) -> Self {
        Self::from(&row)
    }
}
