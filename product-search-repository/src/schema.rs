//! Index schema manager.
//!
//! Provisions the product index with its declared mapping, either by
//! dropping and recreating it in place or by building a new generation
//! behind the index alias and swapping the alias over.

use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use product_search_shared::PRODUCT_INDEX;

use crate::errors::SearchError;
use crate::interfaces::SearchEngine;
use crate::opensearch::index_config::{generation_name, get_index_settings, is_generation_of};

/// Wrap any failure during provisioning as a schema error.
fn schema_failure(err: SearchError) -> SearchError {
    match err {
        SearchError::SchemaError(_) => err,
        other => SearchError::schema(other.to_string()),
    }
}

/// Creates, recreates and migrates the product index.
#[derive(Debug, Clone)]
pub struct SchemaManager {
    index: String,
}

impl Default for SchemaManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaManager {
    /// Manager for the default `products` index.
    pub fn new() -> Self {
        Self::with_index(PRODUCT_INDEX)
    }

    /// Manager for a differently named index.
    pub fn with_index(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
        }
    }

    /// The logical index name (a concrete index or an alias).
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Settings and mappings used for every index this manager creates.
    pub fn index_body(&self) -> Value {
        get_index_settings()
    }

    /// Drop the index if present and create it again with the declared mapping.
    ///
    /// When the name is an alias, the indices behind it are dropped instead.
    /// The result is always an empty, freshly mapped concrete index.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The index exists, empty, with the declared mapping
    /// * `Err(SearchError::SchemaError)` - Any step failed; the index must
    ///   not be synchronized
    #[instrument(skip(self, engine), fields(index = %self.index))]
    pub async fn provision(&self, engine: &dyn SearchEngine) -> Result<(), SearchError> {
        let targets = engine
            .alias_targets(&self.index)
            .await
            .map_err(schema_failure)?;

        if !targets.is_empty() {
            for target in &targets {
                engine.delete_index(target).await.map_err(schema_failure)?;
            }
            info!(deleted = ?targets, "Dropped indices behind alias");
        } else if engine
            .index_exists(&self.index)
            .await
            .map_err(schema_failure)?
        {
            engine
                .delete_index(&self.index)
                .await
                .map_err(schema_failure)?;
            info!("Dropped existing index");
        }

        engine
            .create_index(&self.index, self.index_body())
            .await
            .map_err(schema_failure)?;

        info!("Provisioned index");
        Ok(())
    }

    /// Create the index only if it does not exist yet.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The index was created
    /// * `Ok(false)` - The index (or alias) already existed
    pub async fn ensure_exists(&self, engine: &dyn SearchEngine) -> Result<bool, SearchError> {
        if engine
            .index_exists(&self.index)
            .await
            .map_err(schema_failure)?
        {
            return Ok(false);
        }

        engine
            .create_index(&self.index, self.index_body())
            .await
            .map_err(schema_failure)?;
        info!(index = %self.index, "Created missing index");
        Ok(true)
    }

    /// Create the concrete index of a new generation, dropping a stale index
    /// of the same name first.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Name of the created generation index
    #[instrument(skip(self, engine), fields(index = %self.index))]
    pub async fn create_generation(
        &self,
        engine: &dyn SearchEngine,
        generation: u64,
    ) -> Result<String, SearchError> {
        let name = generation_name(&self.index, generation);

        if engine.index_exists(&name).await.map_err(schema_failure)? {
            warn!(generation = %name, "Dropping stale generation");
            engine.delete_index(&name).await.map_err(schema_failure)?;
        }

        engine
            .create_index(&name, self.index_body())
            .await
            .map_err(schema_failure)?;

        info!(generation = %name, "Created index generation");
        Ok(name)
    }

    /// Point the alias at a generation and drop the generations it replaced.
    ///
    /// The alias is moved in a single `_aliases` request so searches see
    /// either the old or the new generation, never neither. A concrete
    /// index occupying the alias name is dropped first.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<String>)` - Names of the retired generations
    #[instrument(skip(self, engine), fields(index = %self.index))]
    pub async fn promote(
        &self,
        engine: &dyn SearchEngine,
        generation: u64,
    ) -> Result<Vec<String>, SearchError> {
        let target = generation_name(&self.index, generation);
        let previous = engine
            .alias_targets(&self.index)
            .await
            .map_err(schema_failure)?;

        if previous.is_empty()
            && engine
                .index_exists(&self.index)
                .await
                .map_err(schema_failure)?
        {
            warn!("Replacing concrete index with alias; searches fail until the alias is added");
            engine
                .delete_index(&self.index)
                .await
                .map_err(schema_failure)?;
        }

        let orphans: Vec<String> = engine
            .indices_with_prefix(&format!("{}_v", self.index))
            .await
            .map_err(schema_failure)?
            .into_iter()
            .filter(|i| is_generation_of(&self.index, i) && *i != target && !previous.contains(i))
            .collect();
        let detached: Vec<String> = previous.into_iter().filter(|i| *i != target).collect();

        let mut actions: Vec<Value> = detached
            .iter()
            .map(|index| json!({ "remove": { "index": index, "alias": self.index } }))
            .collect();
        actions.push(json!({ "add": { "index": target, "alias": self.index } }));

        engine
            .update_aliases(json!({ "actions": actions }))
            .await
            .map_err(schema_failure)?;
        info!(generation = %target, "Alias now points at new generation");

        if !orphans.is_empty() {
            warn!(orphans = ?orphans, "Dropping generations that were never promoted");
        }

        let mut retired = detached;
        retired.extend(orphans);
        retired.sort();
        for index in &retired {
            engine.delete_index(index).await.map_err(schema_failure)?;
        }

        Ok(retired)
    }

    /// Drop a generation that never made it behind the alias.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The generation index was deleted
    /// * `Ok(false)` - It is already live behind the alias, or does not exist
    #[instrument(skip(self, engine), fields(index = %self.index))]
    pub async fn discard_generation(
        &self,
        engine: &dyn SearchEngine,
        generation: u64,
    ) -> Result<bool, SearchError> {
        let name = generation_name(&self.index, generation);
        let live = engine
            .alias_targets(&self.index)
            .await
            .map_err(schema_failure)?;

        if live.contains(&name) || !engine.index_exists(&name).await.map_err(schema_failure)? {
            return Ok(false);
        }

        engine.delete_index(&name).await.map_err(schema_failure)?;
        info!(generation = %name, "Dropped unpromoted generation");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryEngine;
    use crate::types::BulkDocument;

    fn doc(id: &str) -> BulkDocument {
        BulkDocument {
            id: id.to_string(),
            source: json!({ "id": id, "name": format!("Product {}", id) }),
        }
    }

    #[tokio::test]
    async fn test_provision_creates_mapped_index() {
        let engine = MemoryEngine::new();
        let schema = SchemaManager::new();

        schema.provision(&engine).await.unwrap();

        assert!(engine.index_exists("products").await.unwrap());
        assert_eq!(engine.mapping("products"), Some(get_index_settings()));
    }

    #[tokio::test]
    async fn test_provision_twice_leaves_identical_empty_index() {
        let engine = MemoryEngine::new();
        let schema = SchemaManager::new();

        schema.provision(&engine).await.unwrap();
        engine.bulk_index("products", &[doc("1"), doc("2")]).await.unwrap();
        engine.refresh("products").await.unwrap();
        assert_eq!(engine.documents("products").len(), 2);

        schema.provision(&engine).await.unwrap();
        let first = engine.mapping("products");
        schema.provision(&engine).await.unwrap();

        assert!(engine.documents("products").is_empty());
        assert_eq!(engine.mapping("products"), first);
        assert_eq!(engine.index_names(), vec!["products".to_string()]);
    }

    #[tokio::test]
    async fn test_provision_failure_is_schema_error() {
        let engine = MemoryEngine::new();
        engine.fail_index_creation(true);

        let err = SchemaManager::new().provision(&engine).await.unwrap_err();

        assert!(matches!(err, SearchError::SchemaError(_)));
    }

    #[tokio::test]
    async fn test_provision_unreachable_engine_is_schema_error() {
        let engine = MemoryEngine::new();
        engine.set_reachable(false);

        let err = SchemaManager::new().provision(&engine).await.unwrap_err();

        assert!(matches!(err, SearchError::SchemaError(_)));
    }

    #[tokio::test]
    async fn test_ensure_exists_is_not_destructive() {
        let engine = MemoryEngine::new();
        let schema = SchemaManager::new();

        assert!(schema.ensure_exists(&engine).await.unwrap());
        engine.bulk_index("products", &[doc("1")]).await.unwrap();
        engine.refresh("products").await.unwrap();

        assert!(!schema.ensure_exists(&engine).await.unwrap());
        assert_eq!(engine.documents("products").len(), 1);
    }

    #[tokio::test]
    async fn test_promote_replaces_concrete_index_with_alias() {
        let engine = MemoryEngine::new();
        let schema = SchemaManager::new();
        schema.provision(&engine).await.unwrap();

        let name = schema.create_generation(&engine, 1).await.unwrap();
        assert_eq!(name, "products_v1");

        let retired = schema.promote(&engine, 1).await.unwrap();

        assert!(retired.is_empty());
        assert_eq!(
            engine.alias_targets("products").await.unwrap(),
            vec!["products_v1".to_string()]
        );
        assert_eq!(engine.index_names(), vec!["products_v1".to_string()]);
    }

    #[tokio::test]
    async fn test_promote_retires_previous_generation() {
        let engine = MemoryEngine::new();
        let schema = SchemaManager::new();

        schema.create_generation(&engine, 1).await.unwrap();
        schema.promote(&engine, 1).await.unwrap();
        schema.create_generation(&engine, 2).await.unwrap();

        let retired = schema.promote(&engine, 2).await.unwrap();

        assert_eq!(retired, vec!["products_v1".to_string()]);
        assert_eq!(
            engine.alias_targets("products").await.unwrap(),
            vec!["products_v2".to_string()]
        );
        assert!(!engine.index_exists("products_v1").await.unwrap());
    }

    #[tokio::test]
    async fn test_promote_sweeps_unpromoted_generations() {
        let engine = MemoryEngine::new();
        let schema = SchemaManager::new();
        schema.create_generation(&engine, 1).await.unwrap();
        schema.promote(&engine, 1).await.unwrap();
        schema.create_generation(&engine, 2).await.unwrap();
        schema.create_generation(&engine, 3).await.unwrap();
        engine.create_index("products_vault", json!({})).await.unwrap();

        let retired = schema.promote(&engine, 3).await.unwrap();

        assert_eq!(retired, vec!["products_v1".to_string(), "products_v2".to_string()]);
        assert_eq!(
            engine.index_names(),
            vec!["products_v3".to_string(), "products_vault".to_string()]
        );
    }

    #[tokio::test]
    async fn test_discard_generation_keeps_live_generation() {
        let engine = MemoryEngine::new();
        let schema = SchemaManager::new();
        schema.create_generation(&engine, 1).await.unwrap();
        schema.promote(&engine, 1).await.unwrap();
        schema.create_generation(&engine, 2).await.unwrap();

        assert!(!schema.discard_generation(&engine, 1).await.unwrap());
        assert!(schema.discard_generation(&engine, 2).await.unwrap());
        assert!(!schema.discard_generation(&engine, 2).await.unwrap());

        assert_eq!(engine.index_names(), vec!["products_v1".to_string()]);
    }

    #[tokio::test]
    async fn test_provision_over_alias_drops_generations() {
        let engine = MemoryEngine::new();
        let schema = SchemaManager::new();
        schema.create_generation(&engine, 5).await.unwrap();
        schema.promote(&engine, 5).await.unwrap();

        schema.provision(&engine).await.unwrap();

        assert!(engine.alias_targets("products").await.unwrap().is_empty());
        assert_eq!(engine.index_names(), vec!["products".to_string()]);
    }
}
