//! Request bodies and response parsing for the Elasticsearch REST API

use flexsearch_core::error::{FlexsearchError, Result};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::ports::{IndexInfo, IndexSettings, KnnQuery, StoredHit};

/// Index creation body: a cosine `dense_vector` mapping plus `_meta`
pub fn create_index_body(settings: &IndexSettings) -> Value {
    json!({
        "mappings": {
            "_meta": {
                "embedding_model": settings.model,
                "vector_field": settings.vector_field,
                "dims": settings.dimensions,
            },
            "properties": {
                settings.vector_field.clone(): {
                    "type": "dense_vector",
                    "dims": settings.dimensions,
                    "index": true,
                    "similarity": "cosine",
                }
            }
        }
    })
}

/// Top-level `knn` search body
pub fn knn_body(query: &KnnQuery) -> Value {
    json!({
        "knn": {
            "field": query.field,
            "query_vector": query.vector,
            "k": query.k,
            "num_candidates": query.num_candidates,
        },
        "_source": query.source,
        "size": query.k,
    })
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score")]
    score: Option<f32>,
    #[serde(rename = "_source", default)]
    source: Map<String, Value>,
}

/// Parse a `_search` response into ordered hits
pub fn parse_search_response(body: &str) -> Result<Vec<StoredHit>> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|e| FlexsearchError::search(format!("unexpected search response: {}", e)))?;

    Ok(response
        .hits
        .hits
        .into_iter()
        .map(|hit| StoredHit { id: hit.id, score: hit.score.unwrap_or(0.0), source: hit.source })
        .collect())
}

/// Parse a `GET /{index}/_mapping` response
///
/// `_meta` written at creation wins. Indexes created elsewhere fall back to
/// the first `dense_vector` property found.
pub fn parse_mapping_response(index: &str, body: &str) -> Result<IndexInfo> {
    let value: Value = serde_json::from_str(body)?;
    let mappings = value
        .get(index)
        .or_else(|| value.as_object().and_then(|o| o.values().next()))
        .and_then(|entry| entry.get("mappings"))
        .ok_or_else(|| FlexsearchError::search(format!("no mappings returned for '{}'", index)))?;

    let mut info = IndexInfo { name: index.to_string(), ..Default::default() };

    if let Some(meta) = mappings.get("_meta") {
        info.model = meta.get("embedding_model").and_then(Value::as_str).map(str::to_string);
        info.vector_field = meta.get("vector_field").and_then(Value::as_str).map(str::to_string);
        info.dimensions = meta.get("dims").and_then(Value::as_u64).map(|d| d as usize);
    }

    let properties = mappings.get("properties").and_then(Value::as_object);
    if let Some(properties) = properties {
        let vector_property = match &info.vector_field {
            Some(field) => properties.get(field).map(|p| (field.clone(), p)),
            None => properties
                .iter()
                .find(|(_, p)| p.get("type").and_then(Value::as_str) == Some("dense_vector"))
                .map(|(name, p)| (name.clone(), p)),
        };
        if let Some((name, property)) = vector_property {
            info.vector_field.get_or_insert(name);
            if info.dimensions.is_none() {
                info.dimensions = property.get("dims").and_then(Value::as_u64).map(|d| d as usize);
            }
        }
    }

    Ok(info)
}

/// One-document `_bulk` body (NDJSON, trailing newline required)
pub fn bulk_index_body(index: &str, id: &str, source: &Map<String, Value>) -> String {
    format!("{}\n{}\n", json!({"index": {"_index": index, "_id": id}}), Value::Object(source.clone()))
}

/// Reason of the first failed item in a `_bulk` response, `None` when all succeeded
pub fn bulk_item_error(body: &str) -> Result<Option<String>> {
    let value: Value = serde_json::from_str(body)?;
    if !value.get("errors").and_then(Value::as_bool).unwrap_or(false) {
        return Ok(None);
    }

    let reason = value
        .get("items")
        .and_then(Value::as_array)
        .and_then(|items| {
            items.iter().find_map(|item| {
                let error = item.get("index")?.get("error")?;
                Some(
                    error
                        .get("reason")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .unwrap_or_else(|| error.to_string()),
                )
            })
        })
        .unwrap_or_else(|| "bulk request reported errors".to_string());
    Ok(Some(reason))
}

/// Pull the `error.reason` out of an Elasticsearch error body, if present
pub fn error_reason(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            let error = v.get("error")?;
            error
                .get("reason")
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| error.as_str().map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> IndexSettings {
        IndexSettings {
            vector_field: "DescriptionVector".to_string(),
            dimensions: 384,
            model: "paraphrase-MiniLM-L6-v2".to_string(),
        }
    }

    #[test]
    fn test_create_index_body() {
        let body = create_index_body(&settings());
        let field = &body["mappings"]["properties"]["DescriptionVector"];
        assert_eq!(field["type"], "dense_vector");
        assert_eq!(field["dims"], 384);
        assert_eq!(field["similarity"], "cosine");
        assert_eq!(body["mappings"]["_meta"]["embedding_model"], "paraphrase-MiniLM-L6-v2");
    }

    #[test]
    fn test_knn_body() {
        let query = KnnQuery {
            field: "DescriptionVector".to_string(),
            vector: vec![0.5, 0.25],
            k: 3,
            num_candidates: 50,
            source: vec!["ProductName".to_string(), "Description".to_string()],
        };
        let body = knn_body(&query);
        assert_eq!(body["knn"]["field"], "DescriptionVector");
        assert_eq!(body["knn"]["k"], 3);
        assert_eq!(body["knn"]["num_candidates"], 50);
        assert_eq!(body["knn"]["query_vector"], json!([0.5, 0.25]));
        assert_eq!(body["_source"], json!(["ProductName", "Description"]));
        assert_eq!(body["size"], 3);
    }

    #[test]
    fn test_parse_search_response() {
        let body = r#"{
            "took": 3,
            "hits": {
                "total": {"value": 2, "relation": "eq"},
                "hits": [
                    {"_index": "p", "_id": "1", "_score": 0.97, "_source": {"name": "red shoes"}},
                    {"_index": "p", "_id": "2", "_score": 0.61, "_source": {}}
                ]
            }
        }"#;
        let hits = parse_search_response(body).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "1");
        assert_eq!(hits[0].source["name"], "red shoes");
        assert!(hits[1].source.is_empty());
    }

    #[test]
    fn test_parse_mapping_with_meta() {
        let body = json!({
            "products": { "mappings": create_index_body(&settings())["mappings"].clone() }
        })
        .to_string();
        let info = parse_mapping_response("products", &body).unwrap();
        assert_eq!(info.dimensions, Some(384));
        assert_eq!(info.model.as_deref(), Some("paraphrase-MiniLM-L6-v2"));
        assert_eq!(info.vector_field.as_deref(), Some("DescriptionVector"));
    }

    #[test]
    fn test_parse_mapping_without_meta() {
        let body = r#"{"legacy": {"mappings": {"properties": {
            "title": {"type": "text"},
            "embedding": {"type": "dense_vector", "dims": 768}
        }}}}"#;
        let info = parse_mapping_response("legacy", body).unwrap();
        assert_eq!(info.dimensions, Some(768));
        assert_eq!(info.vector_field.as_deref(), Some("embedding"));
        assert!(info.model.is_none());
    }

    #[test]
    fn test_bulk_index_body() {
        let mut source = Map::new();
        source.insert("desc".to_string(), json!("dot"));
        let body = bulk_index_body("products", ".", &source);

        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(serde_json::from_str::<Value>(lines[0]).unwrap()["index"]["_id"], ".");
        assert_eq!(serde_json::from_str::<Value>(lines[1]).unwrap()["desc"], "dot");
        assert!(body.ends_with('\n'));
    }

    #[test]
    fn test_bulk_item_error() {
        assert_eq!(bulk_item_error(r#"{"errors": false, "items": []}"#).unwrap(), None);

        let failed = r#"{"errors": true, "items": [
            {"index": {"_id": "..", "status": 400, "error": {"type": "x", "reason": "bad field"}}}
        ]}"#;
        assert_eq!(bulk_item_error(failed).unwrap().as_deref(), Some("bad field"));
    }

    #[test]
    fn test_error_reason() {
        let body = r#"{"error": {"type": "x", "reason": "failed to parse field"}, "status": 400}"#;
        assert_eq!(error_reason(body), "failed to parse field");
        assert_eq!(error_reason("plain failure"), "plain failure");
    }
}
