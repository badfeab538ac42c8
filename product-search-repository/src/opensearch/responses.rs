//! Parsing of raw OpenSearch responses into typed results.

use std::collections::HashMap;

use serde_json::Value;

use product_search_shared::{ClusterHealth, SearchHit, SearchResponse};

use crate::errors::SearchError;
use crate::types::{BulkFailure, BulkOutcome};

use super::index_config::SUGGESTER_NAME;

/// Extract `error.reason` from an error body, falling back to the raw text.
pub fn error_reason(body: &Value) -> String {
    body["error"]["reason"]
        .as_str()
        .or_else(|| body["error"].as_str())
        .map(str::to_string)
        .unwrap_or_else(|| "Unknown error".to_string())
}

/// Parse a search response.
///
/// `hits.total` may be a plain integer (when requested as such) or an
/// object with a `value` field.
pub fn parse_search_response(body: &Value) -> Result<SearchResponse, SearchError> {
    let hits = body
        .get("hits")
        .ok_or_else(|| SearchError::internal("Search response has no hits"))?;

    let total = match &hits["total"] {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::Object(o) => o.get("value").and_then(Value::as_u64).unwrap_or(0),
        _ => 0,
    };

    let results = hits["hits"]
        .as_array()
        .map(|items| items.iter().filter_map(parse_hit).collect())
        .unwrap_or_default();

    Ok(SearchResponse {
        total,
        took_ms: body["took"].as_u64().unwrap_or(0),
        results,
    })
}

/// Parse a single hit; hits without an `_id` are skipped.
fn parse_hit(hit: &Value) -> Option<SearchHit> {
    let id = hit["_id"].as_str()?.to_string();

    let highlight = hit["highlight"]
        .as_object()
        .map(|fields| {
            fields
                .iter()
                .map(|(field, fragments)| {
                    let fragments = fragments
                        .as_array()
                        .map(|f| f.iter().filter_map(|s| s.as_str().map(String::from)).collect())
                        .unwrap_or_default();
                    (field.clone(), fragments)
                })
                .collect::<HashMap<_, _>>()
        })
        .unwrap_or_default();

    Some(SearchHit {
        id,
        score: hit["_score"].as_f64(),
        data: hit.get("_source").cloned().unwrap_or(Value::Null),
        highlight,
    })
}

/// Extract completion texts from a suggest response, in engine order.
pub fn parse_suggestions(body: &Value) -> Vec<String> {
    body["suggest"][SUGGESTER_NAME]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|entry| entry["options"].as_array())
        .flatten()
        .filter_map(|option| option["text"].as_str().map(String::from))
        .collect()
}

/// Combine an engine info response and a cluster health response.
///
/// Both responses must carry the cluster name and status; numeric fields
/// default to zero when absent.
pub fn parse_cluster_health(info: &Value, health: &Value) -> Result<ClusterHealth, SearchError> {
    let cluster_name = info["cluster_name"]
        .as_str()
        .ok_or_else(|| SearchError::internal("Engine info has no cluster name"))?;
    let cluster_status = health["status"]
        .as_str()
        .ok_or_else(|| SearchError::internal("Cluster health has no status"))?;

    Ok(ClusterHealth {
        status: "healthy".to_string(),
        cluster_name: cluster_name.to_string(),
        version: info["version"]["number"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        cluster_status: cluster_status.to_string(),
        node_count: health["number_of_nodes"].as_u64().unwrap_or(0),
        active_shards_percent: health["active_shards_percent_as_number"]
            .as_f64()
            .unwrap_or(0.0),
    })
}

/// Parse a bulk response into the per-document outcome.
pub fn parse_bulk_response(body: &Value) -> BulkOutcome {
    let mut outcome = BulkOutcome {
        took_ms: body["took"].as_u64().unwrap_or(0),
        ..BulkOutcome::default()
    };

    for item in body["items"].as_array().into_iter().flatten() {
        let Some(status) = item["index"].as_object() else {
            continue;
        };

        match status.get("error") {
            Some(error) if !error.is_null() => outcome.failures.push(BulkFailure {
                id: status
                    .get("_id")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                status: status
                    .get("status")
                    .and_then(Value::as_u64)
                    .and_then(|s| u16::try_from(s).ok())
                    .unwrap_or(0),
                reason: error["reason"]
                    .as_str()
                    .unwrap_or("Unknown error")
                    .to_string(),
            }),
            _ => outcome.succeeded += 1,
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_search_response_integer_total() {
        let body = json!({
            "took": 4,
            "hits": {
                "total": 2,
                "hits": [
                    {
                        "_id": "1",
                        "_score": 1.5,
                        "_source": { "name": "Red Shoes" },
                        "highlight": { "name": ["<em>Red</em> Shoes"] }
                    },
                    { "_id": "2", "_score": 0.7, "_source": { "name": "Red Hat" } }
                ]
            }
        });

        let response = parse_search_response(&body).unwrap();

        assert_eq!(response.total, 2);
        assert_eq!(response.took_ms, 4);
        assert_eq!(response.ids(), vec!["1", "2"]);
        assert_eq!(response.results[0].score, Some(1.5));
        assert_eq!(
            response.results[0].highlight["name"],
            vec!["<em>Red</em> Shoes".to_string()]
        );
        assert!(response.results[1].highlight.is_empty());
    }

    #[test]
    fn test_parse_search_response_object_total() {
        let body = json!({
            "took": 1,
            "hits": { "total": { "value": 42, "relation": "eq" }, "hits": [] }
        });

        let response = parse_search_response(&body).unwrap();

        assert_eq!(response.total, 42);
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_parse_search_response_without_hits() {
        let err = parse_search_response(&json!({ "took": 1 })).unwrap_err();
        assert!(matches!(err, SearchError::InternalError(_)));
    }

    #[test]
    fn test_parse_suggestions() {
        let body = json!({
            "suggest": {
                "product-suggest": [
                    {
                        "text": "sho",
                        "options": [ { "text": "Shoes" }, { "text": "Shorts" } ]
                    }
                ]
            }
        });

        assert_eq!(parse_suggestions(&body), vec!["Shoes", "Shorts"]);
        assert!(parse_suggestions(&json!({})).is_empty());
    }

    #[test]
    fn test_parse_cluster_health() {
        let info = json!({ "cluster_name": "catalog", "version": { "number": "2.11.0" } });
        let health = json!({
            "status": "green",
            "number_of_nodes": 3,
            "active_shards_percent_as_number": 100.0
        });

        let summary = parse_cluster_health(&info, &health).unwrap();

        assert_eq!(summary.status, "healthy");
        assert_eq!(summary.cluster_name, "catalog");
        assert_eq!(summary.version, "2.11.0");
        assert_eq!(summary.cluster_status, "green");
        assert_eq!(summary.node_count, 3);
        assert_eq!(summary.active_shards_percent, 100.0);
    }

    #[test]
    fn test_parse_cluster_health_requires_status() {
        let info = json!({ "cluster_name": "catalog" });
        let err = parse_cluster_health(&info, &json!({})).unwrap_err();
        assert!(matches!(err, SearchError::InternalError(_)));
    }

    #[test]
    fn test_parse_bulk_response_with_failures() {
        let body = json!({
            "took": 12,
            "errors": true,
            "items": [
                { "index": { "_id": "1", "status": 201, "result": "created" } },
                {
                    "index": {
                        "_id": "2",
                        "status": 400,
                        "error": { "type": "mapper_parsing_exception", "reason": "failed to parse field [price]" }
                    }
                }
            ]
        });

        let outcome = parse_bulk_response(&body);

        assert_eq!(outcome.took_ms, 12);
        assert_eq!(outcome.succeeded, 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].id, "2");
        assert_eq!(outcome.failures[0].status, 400);
        assert_eq!(outcome.failures[0].reason, "failed to parse field [price]");
        assert!(!outcome.is_complete());
    }

    #[test]
    fn test_error_reason() {
        let body = json!({ "error": { "type": "parsing_exception", "reason": "unknown query [foo]" } });
        assert_eq!(error_reason(&body), "unknown query [foo]");
        assert_eq!(error_reason(&json!({})), "Unknown error");
    }
}
