//! OpenSearch query builders.
//!
//! Search bodies are supplied by callers as raw query DSL; this module only
//! decorates them and builds the completion request used for suggestions.

use serde_json::{json, Map, Value};

use super::index_config::{CATEGORY_CONTEXT, SUGGESTER_NAME, SUGGEST_FIELD};
use product_search_shared::product::ALL_CONTEXT;

/// Tag inserted before a highlighted fragment.
pub const HIGHLIGHT_PRE_TAG: &str = "<em>";

/// Tag inserted after a highlighted fragment.
pub const HIGHLIGHT_POST_TAG: &str = "</em>";

/// Default highlight configuration: name and description wrapped in `<em>`.
pub fn default_highlight() -> Value {
    let field = json!({
        "pre_tags": [HIGHLIGHT_PRE_TAG],
        "post_tags": [HIGHLIGHT_POST_TAG]
    });

    json!({
        "fields": {
            "name": field.clone(),
            "description": field
        }
    })
}

/// Add the default highlight configuration unless the body already has one.
///
/// A caller-supplied `highlight` section is never overwritten.
pub fn inject_default_highlight(body: &mut Map<String, Value>) {
    body.entry("highlight").or_insert_with(default_highlight);
}

/// Build a completion-suggester body.
///
/// Completion is fuzzy (AUTO edit distance) and scoped to the given
/// category, or to every document when no category is given.
pub fn build_suggest_query(prefix: &str, size: usize, category: Option<&str>) -> Value {
    let context = category.unwrap_or(ALL_CONTEXT);

    json!({
        "suggest": {
            SUGGESTER_NAME: {
                "prefix": prefix,
                "completion": {
                    "field": SUGGEST_FIELD,
                    "size": size,
                    "fuzzy": {
                        "fuzziness": "AUTO"
                    },
                    "contexts": {
                        CATEGORY_CONTEXT: [context]
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_default_highlight() {
        let mut body = json!({ "query": { "match_all": {} } })
            .as_object()
            .cloned()
            .unwrap();

        inject_default_highlight(&mut body);

        let fields = &body["highlight"]["fields"];
        assert_eq!(fields["name"]["pre_tags"][0], "<em>");
        assert_eq!(fields["name"]["post_tags"][0], "</em>");
        assert_eq!(fields["description"]["pre_tags"][0], "<em>");
    }

    #[test]
    fn test_caller_highlight_is_kept() {
        let custom = json!({ "fields": { "category": {} } });
        let mut body = json!({ "query": { "match_all": {} }, "highlight": custom.clone() })
            .as_object()
            .cloned()
            .unwrap();

        inject_default_highlight(&mut body);

        assert_eq!(body["highlight"], custom);
    }

    #[test]
    fn test_suggest_query_unscoped() {
        let query = build_suggest_query("sho", 5, None);
        let completion = &query["suggest"]["product-suggest"]["completion"];

        assert_eq!(query["suggest"]["product-suggest"]["prefix"], "sho");
        assert_eq!(completion["field"], "suggest");
        assert_eq!(completion["size"], 5);
        assert_eq!(completion["fuzzy"]["fuzziness"], "AUTO");
        assert_eq!(completion["contexts"]["category"], json!(["all"]));
    }

    #[test]
    fn test_suggest_query_scoped_to_category() {
        let query = build_suggest_query("sho", 10, Some("Footwear"));

        assert_eq!(
            query["suggest"]["product-suggest"]["completion"]["contexts"]["category"],
            json!(["Footwear"])
        );
    }
}
