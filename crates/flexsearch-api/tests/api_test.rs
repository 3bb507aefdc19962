//! Route tests driven through the router with `oneshot`
//!
//! The state uses the in-memory index and the hashing embedder, so no
//! external service is needed.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use flexsearch_api::{create_router, AppState, SessionDefaults};
use flexsearch_core::error::{FlexsearchError, Result};
use flexsearch_llm::{Embedder, EmbeddingModel, HashingEmbedder};
use flexsearch_store::{ElasticsearchConfig, ElasticsearchIndex, MemorySearchIndex, SearchIndex};
use serde_json::{json, Value};
use tower::ServiceExt;

const PRODUCTS: &str = "id,name,desc\n1,Runner,red shoes\n2,Cap,blue hat\n";
const BOUNDARY: &str = "flexsearch-test-boundary";

fn hashing_embedders() -> HashMap<EmbeddingModel, Arc<dyn Embedder>> {
    EmbeddingModel::ALL
        .iter()
        .map(|m| (*m, Arc::new(HashingEmbedder::new(*m)) as Arc<dyn Embedder>))
        .collect()
}

fn app_with(store: Arc<dyn SearchIndex>, embedders: HashMap<EmbeddingModel, Arc<dyn Embedder>>) -> Router {
    create_router(Arc::new(AppState::new(store, embedders, SessionDefaults::default())))
}

fn app() -> Router {
    app_with(Arc::new(MemorySearchIndex::new()), hashing_embedders())
}

struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();
    Response { status, headers, body }
}

async fn get(app: &Router, uri: &str) -> Response {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn upload(app: &Router, session: &str, csv: &str) -> Response {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"products.csv\"\r\n\
         Content-Type: text/csv\r\n\r\n{csv}\r\n--{b}--\r\n",
        b = BOUNDARY,
        csv = csv
    );
    let request = Request::post(format!("/api/v1/sessions/{}/dataset", session))
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

async fn create_session(app: &Router) -> String {
    let response = post_json(app, "/api/v1/sessions", json!({})).await;
    assert_eq!(response.status, StatusCode::CREATED);
    response.json()["id"].as_str().unwrap().to_string()
}

/// Session with the products dataset uploaded and indexed on `desc`
async fn indexed_session(app: &Router) -> String {
    let id = create_session(app).await;
    assert_eq!(upload(app, &id, PRODUCTS).await.status, StatusCode::OK);
    let response = post_json(
        app,
        &format!("/api/v1/sessions/{}/index", id),
        json!({"text_column": "desc", "id_column": "id"}),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    id
}

#[tokio::test]
async fn test_health() {
    let response = get(&app(), "/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "ok");
}

#[tokio::test]
async fn test_models_marks_default() {
    let response = get(&app(), "/api/v1/models").await;
    let models = response.json();
    assert_eq!(models.as_array().unwrap().len(), 4);
    assert_eq!(models[0], json!({"name": "all-mpnet-base-v2", "dimensions": 768, "default": true}));
    assert_eq!(models[2]["dimensions"], 384);
}

#[tokio::test]
async fn test_create_session_with_model_and_index() {
    let app = app();
    let response = post_json(
        &app,
        "/api/v1/sessions",
        json!({"model": "paraphrase-MiniLM-L6-v2", "index": "catalog"}),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let body = response.json();
    assert_eq!(body["model"], "paraphrase-MiniLM-L6-v2");
    assert_eq!(body["index"], "catalog");
    assert_eq!(body["vector_field"], "DescriptionVector");
    assert!(body["dataset"].is_null());
}

#[tokio::test]
async fn test_create_session_without_body_uses_defaults() {
    let app = app();
    let request = Request::post("/api/v1/sessions").body(Body::empty()).unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json()["index"], "user_uploaded_data");
}

#[tokio::test]
async fn test_unknown_model_is_bad_request() {
    let response = post_json(&app(), "/api/v1/sessions", json!({"model": "gpt-embed"})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "Unknown model");
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let app = app();
    let id = "6f1c1f9e-3a55-4e4e-9b0e-5d2b1c7f0a11";
    let response = get(&app, &format!("/api/v1/sessions/{}", id)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json(), json!({"error": "Session not found", "details": id}));

    let response = upload(&app, id, PRODUCTS).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_returns_preview() {
    let app = app();
    let id = create_session(&app).await;

    let response = upload(&app, &id, PRODUCTS).await;
    assert_eq!(response.status, StatusCode::OK);

    let preview = response.json();
    assert_eq!(preview["name"], "products.csv");
    assert_eq!(preview["columns"], json!(["id", "name", "desc"]));
    assert_eq!(preview["row_count"], 2);
    assert_eq!(preview["rows"][1], json!(["2", "Cap", "blue hat"]));

    let session = get(&app, &format!("/api/v1/sessions/{}", id)).await.json();
    assert_eq!(session["dataset"]["row_count"], 2);
}

#[tokio::test]
async fn test_malformed_csv_is_bad_request() {
    let app = app();
    let id = create_session(&app).await;
    let response = upload(&app, &id, "id,desc\n1,red shoes,extra\n").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "Invalid dataset");
}

#[tokio::test]
async fn test_index_then_search_then_export() {
    let app = app();
    let id = indexed_session(&app).await;

    let session = get(&app, &format!("/api/v1/sessions/{}", id)).await.json();
    assert_eq!(session["text_column"], "desc");
    assert_eq!(session["last_report"]["succeeded"], json!(["1", "2"]));
    assert_eq!(session["last_report"]["created_index"], true);

    let response = post_json(
        &app,
        &format!("/api/v1/sessions/{}/search", id),
        json!({"query": "red shoes", "top_k": 1}),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    let results = response.json();
    assert_eq!(results["fields"], json!(["desc"]));
    assert_eq!(results["hits"].as_array().unwrap().len(), 1);
    assert_eq!(results["hits"][0]["id"], "1");
    assert_eq!(results["hits"][0]["fields"]["desc"], "red shoes");

    let response = get(&app, &format!("/api/v1/sessions/{}/export/csv", id)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        response.headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"search_results.csv\""
    );
    assert_eq!(response.body, b"desc\nred shoes\n");

    let response = get(&app, &format!("/api/v1/sessions/{}/export/xlsx", id)).await;
    assert_eq!(
        response.headers[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(&response.body[..2], b"PK");

    let response = get(&app, &format!("/api/v1/sessions/{}/export/pdf", id)).await;
    assert_eq!(response.headers[header::CONTENT_TYPE], "application/pdf");
    assert!(response.body.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_search_projection_and_placeholder() {
    let app = app();
    let id = indexed_session(&app).await;

    let response = post_json(
        &app,
        &format!("/api/v1/sessions/{}/search", id),
        json!({"query": "blue hat", "top_k": 2, "fields": ["name", "price"]}),
    )
    .await;
    let results = response.json();
    assert_eq!(results["fields"], json!(["name", "price"]));
    assert_eq!(results["hits"][0]["fields"]["name"], "Cap");
    assert_eq!(results["hits"][0]["fields"]["price"], "not available");

    let scores: Vec<f64> = results["hits"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["score"].as_f64().unwrap())
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_invalid_search_bounds_are_bad_request() {
    let app = app();
    let id = indexed_session(&app).await;
    let uri = format!("/api/v1/sessions/{}/search", id);

    let response = post_json(&app, &uri, json!({"query": "shoes", "top_k": 0})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response =
        post_json(&app, &uri, json!({"query": "shoes", "top_k": 20, "num_candidates": 10})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = post_json(&app, &uri, json!({"query": "   "})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_without_projection_is_bad_request() {
    let app = app();
    let id = create_session(&app).await;
    let response =
        post_json(&app, &format!("/api/v1/sessions/{}/search", id), json!({"query": "shoes"})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_on_missing_index_is_bad_gateway() {
    let app = app();
    let id = create_session(&app).await;
    let response = post_json(
        &app,
        &format!("/api/v1/sessions/{}/search", id),
        json!({"query": "shoes", "fields": ["desc"]}),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.json()["error"], "Search failed");
}

#[tokio::test]
async fn test_index_errors() {
    let app = app();
    let id = create_session(&app).await;
    let uri = format!("/api/v1/sessions/{}/index", id);

    // No dataset yet
    let response = post_json(&app, &uri, json!({"text_column": "desc", "id_column": "id"})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    upload(&app, &id, PRODUCTS).await;
    let response = post_json(&app, &uri, json!({"text_column": "summary", "id_column": "id"})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "Unknown column");
}

#[tokio::test]
async fn test_dimension_mismatch_is_rejected() {
    let app = app();
    indexed_session(&app).await;

    let response =
        post_json(&app, "/api/v1/sessions", json!({"model": "paraphrase-MiniLM-L6-v2"})).await;
    let id = response.json()["id"].as_str().unwrap().to_string();

    let response = post_json(
        &app,
        &format!("/api/v1/sessions/{}/search", id),
        json!({"query": "red shoes", "fields": ["desc"]}),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "Embedding dimension mismatch");
}

#[tokio::test]
async fn test_export_errors() {
    let app = app();
    let id = indexed_session(&app).await;

    let response = get(&app, &format!("/api/v1/sessions/{}/export/csv", id)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "No search results to export");

    let response = get(&app, &format!("/api/v1/sessions/{}/export/docx", id)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "Unsupported export format");
}

struct UnavailableEmbedder;

#[async_trait]
impl Embedder for UnavailableEmbedder {
    async fn encode_many(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Err(FlexsearchError::Embedding {
            model: self.model_name().to_string(),
            reason: "service returned 503".to_string(),
            remediation: "Start the embedding service".to_string(),
        })
    }

    fn dimensions(&self) -> usize {
        768
    }

    fn model_name(&self) -> &str {
        "all-mpnet-base-v2"
    }
}

#[tokio::test]
async fn test_embedding_failure_is_bad_gateway() {
    let mut embedders = hashing_embedders();
    embedders.insert(EmbeddingModel::AllMpnetBaseV2, Arc::new(UnavailableEmbedder));
    let app = app_with(Arc::new(MemorySearchIndex::new()), embedders);

    let id = create_session(&app).await;
    upload(&app, &id, PRODUCTS).await;
    let response = post_json(
        &app,
        &format!("/api/v1/sessions/{}/index", id),
        json!({"text_column": "desc", "id_column": "id"}),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.json()["error"], "Embedding failed");
}

#[tokio::test]
async fn test_unreachable_backend_is_service_unavailable() {
    let config = ElasticsearchConfig::new("http://127.0.0.1:9").unwrap();
    let store = Arc::new(ElasticsearchIndex::new(config).unwrap());
    let app = app_with(store, hashing_embedders());

    let id = create_session(&app).await;
    upload(&app, &id, PRODUCTS).await;
    let response = post_json(
        &app,
        &format!("/api/v1/sessions/{}/index", id),
        json!({"text_column": "desc", "id_column": "id"}),
    )
    .await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json()["error"], "Search backend unavailable");
}
