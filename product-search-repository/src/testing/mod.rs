//! In-memory search engine for tests.
//!
//! `MemoryEngine` implements enough of the engine's behavior for the client
//! manager, schema manager, synchronizer and query service to be exercised
//! without a running cluster: concrete indices and aliases, bulk writes that
//! become visible on refresh, `match_all` / `match` / `multi_match` / `term`
//! / `ids` queries with highlighting, and context-filtered prefix completion.
//! Failures can be injected and calls are counted.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use product_search_shared::{ProductDocument, ProductRow};

use crate::client::ClientManager;
use crate::config::EngineConfig;
use crate::errors::SearchError;
use crate::interfaces::{EngineConnector, SearchEngine};
use crate::opensearch::index_config::{CATEGORY_CONTEXT, SUGGEST_FIELD};
use crate::opensearch::queries::{HIGHLIGHT_POST_TAG, HIGHLIGHT_PRE_TAG};
use crate::types::{BulkDocument, BulkFailure, BulkOutcome, SearchPage};

/// Default page size the engine applies when a request has none.
const DEFAULT_HITS: usize = 10;

#[derive(Debug, Default)]
struct MemoryIndex {
    body: Value,
    visible: BTreeMap<String, Value>,
    pending: BTreeMap<String, Value>,
}

#[derive(Debug)]
struct State {
    indices: BTreeMap<String, MemoryIndex>,
    aliases: BTreeMap<String, Vec<String>>,
    reachable: bool,
    ping_failures: u32,
    rejected: HashSet<String>,
    fail_index_creation: bool,
}

impl Default for State {
    fn default() -> Self {
        Self {
            indices: BTreeMap::new(),
            aliases: BTreeMap::new(),
            reachable: true,
            ping_failures: 0,
            rejected: HashSet::new(),
            fail_index_creation: false,
        }
    }
}

impl State {
    fn check_reachable(&self) -> Result<(), SearchError> {
        if self.reachable {
            Ok(())
        } else {
            Err(SearchError::service_unavailable("connection refused"))
        }
    }

    /// Concrete indices behind a name, resolving aliases.
    fn resolve(&self, name: &str) -> Result<Vec<String>, SearchError> {
        if let Some(targets) = self.aliases.get(name) {
            return Ok(targets.clone());
        }
        if self.indices.contains_key(name) {
            return Ok(vec![name.to_string()]);
        }
        Err(SearchError::not_found(format!("no such index [{}]", name)))
    }

    fn exists(&self, name: &str) -> bool {
        self.indices.contains_key(name) || self.aliases.contains_key(name)
    }
}

/// In-memory [`SearchEngine`] with failure injection and call counters.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    state: Mutex<State>,
    ping_calls: AtomicUsize,
    search_calls: AtomicUsize,
    bulk_calls: AtomicUsize,
}

impl MemoryEngine {
    /// An empty, reachable engine.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every call fail as if the connection were refused.
    pub fn set_reachable(&self, reachable: bool) {
        self.state().reachable = reachable;
    }

    /// Fail the next `times` pings.
    pub fn fail_pings(&self, times: u32) {
        self.state().ping_failures = times;
    }

    /// Reject these document ids in bulk requests.
    pub fn reject_documents<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state().rejected.extend(ids.into_iter().map(Into::into));
    }

    /// Make index creation fail with a mapping error.
    pub fn fail_index_creation(&self, fail: bool) {
        self.state().fail_index_creation = fail;
    }

    /// Number of ping calls received.
    pub fn ping_calls(&self) -> usize {
        self.ping_calls.load(Ordering::SeqCst)
    }

    /// Number of search calls received, including suggest requests.
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    /// Number of bulk calls received.
    pub fn bulk_calls(&self) -> usize {
        self.bulk_calls.load(Ordering::SeqCst)
    }

    /// Names of all concrete indices, sorted.
    pub fn index_names(&self) -> Vec<String> {
        self.state().indices.keys().cloned().collect()
    }

    /// Settings and mappings a concrete index was created with.
    pub fn mapping(&self, index: &str) -> Option<Value> {
        self.state().indices.get(index).map(|i| i.body.clone())
    }

    /// Searchable documents of an index or alias, ordered by id.
    pub fn documents(&self, name: &str) -> Vec<Value> {
        let state = self.state();
        let Ok(targets) = state.resolve(name) else {
            return Vec::new();
        };
        targets
            .iter()
            .filter_map(|t| state.indices.get(t))
            .flat_map(|i| i.visible.values().cloned())
            .collect()
    }

    /// Create `index` if missing and make these products searchable in it.
    pub fn index_products(&self, index: &str, rows: &[ProductRow]) {
        let mut state = self.state();
        let target = state
            .resolve(index)
            .ok()
            .and_then(|t| t.into_iter().next())
            .unwrap_or_else(|| index.to_string());
        let entry = state.indices.entry(target).or_default();
        for row in rows {
            let doc = ProductDocument::from(row);
            if let Ok(source) = serde_json::to_value(&doc) {
                entry.visible.insert(doc.id, source);
            }
        }
    }
}

/// Lowercased alphanumeric tokens of a text.
fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Field name without boost or sub-field suffix.
fn root_field(field: &str) -> String {
    field
        .split('^')
        .next()
        .and_then(|f| f.split('.').next())
        .unwrap_or(field)
        .to_string()
}

/// Field value as text; arrays are joined.
fn field_text(source: &Value, field: &str) -> String {
    match &source[root_field(field).as_str()] {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// A parsed query: which documents match and which terms they matched on.
enum Query {
    All,
    Text { fields: Vec<String>, terms: Vec<String> },
    Term { field: String, value: Value },
    Ids(Vec<String>),
}

impl Query {
    fn parse(body: &Map<String, Value>) -> Result<Self, SearchError> {
        let Some(query) = body.get("query") else {
            return Ok(Self::All);
        };
        let Some((kind, clause)) = query.as_object().and_then(|q| q.iter().next()) else {
            return Err(SearchError::invalid_request("query malformed, empty clause found"));
        };

        match kind.as_str() {
            "match_all" => Ok(Self::All),
            "match" => {
                let (field, clause) = clause
                    .as_object()
                    .and_then(|m| m.iter().next())
                    .ok_or_else(|| SearchError::invalid_request("[match] query malformed"))?;
                let text = clause
                    .get("query")
                    .unwrap_or(clause)
                    .as_str()
                    .ok_or_else(|| SearchError::invalid_request("[match] query malformed"))?;
                Ok(Self::Text {
                    fields: vec![field.clone()],
                    terms: tokens(text),
                })
            }
            "multi_match" => {
                let text = clause["query"].as_str().ok_or_else(|| {
                    SearchError::invalid_request("[multi_match] requires query value")
                })?;
                let fields = clause["fields"]
                    .as_array()
                    .map(|f| f.iter().filter_map(Value::as_str).map(String::from).collect())
                    .unwrap_or_else(|| vec!["name".to_string(), "description".to_string()]);
                Ok(Self::Text {
                    fields,
                    terms: tokens(text),
                })
            }
            "term" => {
                let (field, clause) = clause
                    .as_object()
                    .and_then(|m| m.iter().next())
                    .ok_or_else(|| SearchError::invalid_request("[term] query malformed"))?;
                Ok(Self::Term {
                    field: field.clone(),
                    value: clause.get("value").unwrap_or(clause).clone(),
                })
            }
            "ids" => Ok(Self::Ids(
                clause["values"]
                    .as_array()
                    .map(|v| v.iter().filter_map(Value::as_str).map(String::from).collect())
                    .unwrap_or_default(),
            )),
            other => Err(SearchError::invalid_request(format!(
                "unknown query [{}]",
                other
            ))),
        }
    }

    /// Score of a document, or `None` when it does not match.
    fn score(&self, id: &str, source: &Value) -> Option<f64> {
        match self {
            Self::All => Some(1.0),
            Self::Text { fields, terms } => {
                let hits = fields
                    .iter()
                    .flat_map(|f| tokens(&field_text(source, f)))
                    .filter(|t| terms.contains(t))
                    .count();
                (hits > 0).then_some(hits as f64)
            }
            Self::Term { field, value } => {
                (source.get(root_field(field)) == Some(value)).then_some(1.0)
            }
            Self::Ids(ids) => ids.iter().any(|i| i == id).then_some(1.0),
        }
    }

    fn terms(&self) -> &[String] {
        match self {
            Self::Text { terms, .. } => terms,
            _ => &[],
        }
    }
}

/// Wrap every matched term in a text with the given tags.
fn highlight_text(text: &str, terms: &[String], pre: &str, post: &str) -> Option<String> {
    let mut matched = false;
    let words: Vec<String> = text
        .split(' ')
        .map(|word| {
            let start = word.find(char::is_alphanumeric);
            let end = word.rfind(char::is_alphanumeric);
            match (start, end) {
                (Some(s), Some(e)) => {
                    let e = e + word[e..].chars().next().map_or(1, char::len_utf8);
                    let core = &word[s..e];
                    if terms.contains(&core.to_lowercase()) {
                        matched = true;
                        format!("{}{}{}{}{}", &word[..s], pre, core, post, &word[e..])
                    } else {
                        word.to_string()
                    }
                }
                _ => word.to_string(),
            }
        })
        .collect();

    matched.then(|| words.join(" "))
}

fn highlight(clause: &Value, source: &Value, terms: &[String]) -> Map<String, Value> {
    let tag = |config: &Value, key: &str, default: &str| {
        config[key][0]
            .as_str()
            .or_else(|| clause[key][0].as_str())
            .unwrap_or(default)
            .to_string()
    };

    let mut fragments = Map::new();
    for (field, config) in clause["fields"].as_object().into_iter().flatten() {
        let pre = tag(config, "pre_tags", HIGHLIGHT_PRE_TAG);
        let post = tag(config, "post_tags", HIGHLIGHT_POST_TAG);
        if let Some(text) = highlight_text(&field_text(source, field), terms, &pre, &post) {
            fragments.insert(field.clone(), json!([text]));
        }
    }
    fragments
}

/// Prefix completion over the `suggest` field, filtered by context.
fn complete(clause: &Value, documents: &[(&String, &Value)]) -> Value {
    let prefix = clause["prefix"].as_str().unwrap_or_default().to_lowercase();
    let completion = &clause["completion"];
    let field = completion["field"].as_str().unwrap_or(SUGGEST_FIELD);
    let size = completion["size"].as_u64().map_or(5, |s| s as usize);
    let contexts: Vec<&str> = completion["contexts"][CATEGORY_CONTEXT]
        .as_array()
        .map(|c| c.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let options: Vec<Value> = documents
        .iter()
        .filter(|(_, source)| {
            contexts.is_empty()
                || source[field]["contexts"][CATEGORY_CONTEXT]
                    .as_array()
                    .is_some_and(|tags| {
                        tags.iter()
                            .filter_map(Value::as_str)
                            .any(|t| contexts.contains(&t))
                    })
        })
        .flat_map(|(id, source)| {
            source[field]["input"]
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(Value::as_str)
                .filter(|input| input.to_lowercase().starts_with(&prefix))
                .map(|input| json!({ "text": input, "_id": id }))
                .collect::<Vec<_>>()
        })
        .take(size)
        .collect();

    json!([{ "text": clause["prefix"], "options": options }])
}

#[async_trait]
impl SearchEngine for MemoryEngine {
    async fn ping(&self) -> Result<bool, SearchError> {
        self.ping_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state();
        state.check_reachable()?;
        if state.ping_failures > 0 {
            state.ping_failures -= 1;
            return Err(SearchError::service_unavailable("connection reset"));
        }
        Ok(true)
    }

    async fn info(&self) -> Result<Value, SearchError> {
        self.state().check_reachable()?;
        Ok(json!({
            "name": "memory-node",
            "cluster_name": "memory",
            "version": { "distribution": "opensearch", "number": "2.11.0" }
        }))
    }

    async fn cluster_health(&self) -> Result<Value, SearchError> {
        self.state().check_reachable()?;
        Ok(json!({
            "cluster_name": "memory",
            "status": "green",
            "number_of_nodes": 1,
            "active_shards_percent_as_number": 100.0
        }))
    }

    async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        let state = self.state();
        state.check_reachable()?;
        Ok(state.exists(index))
    }

    async fn create_index(&self, index: &str, body: Value) -> Result<(), SearchError> {
        let mut state = self.state();
        state.check_reachable()?;
        if state.fail_index_creation {
            return Err(SearchError::invalid_request(
                "Failed to parse mapping [_doc]: unknown parameter",
            ));
        }
        if state.exists(index) {
            return Err(SearchError::invalid_request(format!(
                "index [{}] already exists",
                index
            )));
        }
        state.indices.insert(
            index.to_string(),
            MemoryIndex {
                body,
                ..MemoryIndex::default()
            },
        );
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<(), SearchError> {
        let mut state = self.state();
        state.check_reachable()?;
        if state.indices.remove(index).is_none() {
            return Err(SearchError::not_found(format!("no such index [{}]", index)));
        }
        for targets in state.aliases.values_mut() {
            targets.retain(|t| t != index);
        }
        state.aliases.retain(|_, targets| !targets.is_empty());
        Ok(())
    }

    async fn alias_targets(&self, alias: &str) -> Result<Vec<String>, SearchError> {
        let state = self.state();
        state.check_reachable()?;
        Ok(state.aliases.get(alias).cloned().unwrap_or_default())
    }

    async fn indices_with_prefix(&self, prefix: &str) -> Result<Vec<String>, SearchError> {
        let state = self.state();
        state.check_reachable()?;
        Ok(state
            .indices
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn update_aliases(&self, actions: Value) -> Result<(), SearchError> {
        let mut state = self.state();
        state.check_reachable()?;

        let actions = actions["actions"]
            .as_array()
            .ok_or_else(|| SearchError::invalid_request("[actions] is required"))?;

        // Validate everything first so the update applies atomically.
        for action in actions {
            if let Some(add) = action.get("add") {
                let index = add["index"].as_str().unwrap_or_default();
                let alias = add["alias"].as_str().unwrap_or_default();
                if !state.indices.contains_key(index) {
                    return Err(SearchError::not_found(format!("no such index [{}]", index)));
                }
                if state.indices.contains_key(alias) {
                    return Err(SearchError::invalid_request(format!(
                        "an index exists with the same name as the alias [{}]",
                        alias
                    )));
                }
            }
        }

        for action in actions {
            if let Some(remove) = action.get("remove") {
                let index = remove["index"].as_str().unwrap_or_default();
                let alias = remove["alias"].as_str().unwrap_or_default();
                if let Some(targets) = state.aliases.get_mut(alias) {
                    targets.retain(|t| t != index);
                }
            }
            if let Some(add) = action.get("add") {
                let index = add["index"].as_str().unwrap_or_default().to_string();
                let alias = add["alias"].as_str().unwrap_or_default().to_string();
                let targets = state.aliases.entry(alias).or_default();
                if !targets.contains(&index) {
                    targets.push(index);
                    targets.sort();
                }
            }
        }
        state.aliases.retain(|_, targets| !targets.is_empty());
        Ok(())
    }

    async fn refresh(&self, index: &str) -> Result<(), SearchError> {
        let mut state = self.state();
        state.check_reachable()?;
        for target in state.resolve(index)? {
            if let Some(entry) = state.indices.get_mut(&target) {
                let pending = std::mem::take(&mut entry.pending);
                entry.visible.extend(pending);
            }
        }
        Ok(())
    }

    async fn bulk_index(
        &self,
        index: &str,
        documents: &[BulkDocument],
    ) -> Result<BulkOutcome, SearchError> {
        self.bulk_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state();
        state.check_reachable()?;

        let target = match state.resolve(index) {
            Ok(targets) if targets.len() == 1 => targets[0].clone(),
            Ok(_) => {
                return Err(SearchError::invalid_request(format!(
                    "no write index is defined for alias [{}]",
                    index
                )))
            }
            // Writing to a missing index creates it with dynamic mappings.
            Err(_) => index.to_string(),
        };

        let rejected = state.rejected.clone();
        let entry = state.indices.entry(target).or_default();
        let mut outcome = BulkOutcome {
            took_ms: 1,
            ..BulkOutcome::default()
        };

        for doc in documents {
            if rejected.contains(&doc.id) {
                outcome.failures.push(BulkFailure {
                    id: doc.id.clone(),
                    status: 400,
                    reason: "failed to parse document".to_string(),
                });
            } else {
                entry.pending.insert(doc.id.clone(), doc.source.clone());
                outcome.succeeded += 1;
            }
        }

        Ok(outcome)
    }

    async fn search(
        &self,
        index: &str,
        body: Value,
        page: Option<SearchPage>,
    ) -> Result<Value, SearchError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state();
        state.check_reachable()?;

        let Value::Object(body) = body else {
            return Err(SearchError::invalid_request("request body must be an object"));
        };
        let targets = state.resolve(index)?;
        let query = Query::parse(&body)?;

        let documents: Vec<(&String, &Value)> = targets
            .iter()
            .filter_map(|t| state.indices.get(t))
            .flat_map(|i| i.visible.iter())
            .collect();

        let mut matched: Vec<(f64, &String, &Value)> = documents
            .iter()
            .filter_map(|(id, source)| query.score(id, source).map(|s| (s, *id, *source)))
            .collect();
        matched.sort_by(|a, b| b.0.total_cmp(&a.0));

        let size = page.map_or(DEFAULT_HITS, |p| usize::try_from(p.size).unwrap_or(0));
        let from = page.map_or(0, |p| usize::try_from(p.from).unwrap_or(usize::MAX));

        let hits: Vec<Value> = matched
            .iter()
            .skip(from)
            .take(size)
            .map(|(score, id, source)| {
                let mut hit = json!({
                    "_index": index,
                    "_id": id,
                    "_score": score,
                    "_source": source
                });
                if let Some(clause) = body.get("highlight") {
                    let fragments = highlight(clause, source, query.terms());
                    if !fragments.is_empty() {
                        hit["highlight"] = Value::Object(fragments);
                    }
                }
                hit
            })
            .collect();

        let mut response = json!({
            "took": 1,
            "timed_out": false,
            "hits": { "total": matched.len(), "hits": hits }
        });

        if let Some(suggesters) = body.get("suggest").and_then(Value::as_object) {
            let mut suggest = Map::new();
            for (name, clause) in suggesters {
                suggest.insert(name.clone(), complete(clause, &documents));
            }
            response["suggest"] = Value::Object(suggest);
        }

        Ok(response)
    }
}

/// Connector that always hands out the same [`MemoryEngine`].
#[derive(Debug)]
pub struct MemoryConnector {
    engine: Arc<MemoryEngine>,
    connect_calls: AtomicUsize,
}

impl MemoryConnector {
    /// Connector for the given engine.
    pub fn new(engine: Arc<MemoryEngine>) -> Self {
        Self {
            engine,
            connect_calls: AtomicUsize::new(0),
        }
    }

    /// Number of connections opened.
    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EngineConnector for MemoryConnector {
    async fn connect(&self, _config: &EngineConfig) -> Result<Arc<dyn SearchEngine>, SearchError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.engine.clone())
    }
}

/// A client manager already connected to the given engine.
pub async fn connected_manager(engine: Arc<MemoryEngine>) -> Result<Arc<ClientManager>, SearchError> {
    let manager = ClientManager::new(
        Arc::new(MemoryConnector::new(engine)),
        EngineConfig::default(),
    );
    manager.acquire().await?;
    Ok(Arc::new(manager))
}

/// A client manager that has never connected.
pub fn disconnected_manager(engine: Arc<MemoryEngine>) -> Arc<ClientManager> {
    Arc::new(ClientManager::new(
        Arc::new(MemoryConnector::new(engine)),
        EngineConfig::default(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<ProductRow> {
        vec![
            ProductRow::new(1, "Red Shoes", 49.99, true)
                .with_description("Comfortable running shoes")
                .with_category("Footwear"),
            ProductRow::new(2, "Laptop Pro", 1299.0, true).with_category("Electronics"),
            ProductRow::new(3, "Lamp", 19.5, false),
        ]
    }

    #[tokio::test]
    async fn test_bulk_writes_are_visible_after_refresh() {
        let engine = MemoryEngine::new();
        let doc = BulkDocument {
            id: "1".to_string(),
            source: json!({ "id": "1", "name": "Mug" }),
        };

        engine.bulk_index("products", &[doc]).await.unwrap();
        assert!(engine.documents("products").is_empty());

        engine.refresh("products").await.unwrap();
        assert_eq!(engine.documents("products").len(), 1);
    }

    #[tokio::test]
    async fn test_match_query_with_highlight() {
        let engine = MemoryEngine::new();
        engine.index_products("products", &rows());

        let body = json!({
            "query": { "match": { "name": "red" } },
            "highlight": { "fields": { "name": { "pre_tags": ["<b>"], "post_tags": ["</b>"] } } }
        });
        let response = engine.search("products", body, None).await.unwrap();

        assert_eq!(response["hits"]["total"], 1);
        assert_eq!(response["hits"]["hits"][0]["_id"], "1");
        assert_eq!(
            response["hits"]["hits"][0]["highlight"]["name"][0],
            "<b>Red</b> Shoes"
        );
    }

    #[tokio::test]
    async fn test_term_and_ids_queries() {
        let engine = MemoryEngine::new();
        engine.index_products("products", &rows());

        let by_category = engine
            .search("products", json!({ "query": { "term": { "category": "Electronics" } } }), None)
            .await
            .unwrap();
        assert_eq!(by_category["hits"]["hits"][0]["_id"], "2");

        let by_ids = engine
            .search("products", json!({ "query": { "ids": { "values": ["1", "3"] } } }), None)
            .await
            .unwrap();
        assert_eq!(by_ids["hits"]["total"], 2);
    }

    #[tokio::test]
    async fn test_unknown_query_is_rejected() {
        let engine = MemoryEngine::new();
        engine.index_products("products", &rows());

        let err = engine
            .search("products", json!({ "query": { "nope": {} } }), None)
            .await
            .unwrap_err();

        assert_eq!(err, SearchError::invalid_request("unknown query [nope]"));
    }

    #[tokio::test]
    async fn test_completion_respects_contexts() {
        let engine = MemoryEngine::new();
        engine.index_products("products", &rows());
        let suggest = |category: &str| {
            json!({
                "suggest": {
                    "s": {
                        "prefix": "la",
                        "completion": { "field": "suggest", "size": 10, "contexts": { "category": [category] } }
                    }
                }
            })
        };

        let all = engine.search("products", suggest("all"), None).await.unwrap();
        let texts: Vec<&str> = all["suggest"]["s"][0]["options"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|o| o["text"].as_str())
            .collect();
        assert_eq!(texts, vec!["Laptop Pro", "Lamp"]);

        let general = engine.search("products", suggest("General"), None).await.unwrap();
        assert_eq!(general["suggest"]["s"][0]["options"][0]["text"], "Lamp");
        assert_eq!(general["suggest"]["s"][0]["options"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_engine_fails_every_call() {
        let engine = MemoryEngine::new();
        engine.set_reachable(false);

        assert!(engine.ping().await.unwrap_err().is_unavailable());
        assert!(engine.index_exists("products").await.unwrap_err().is_unavailable());
    }
}
