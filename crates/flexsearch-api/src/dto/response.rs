use chrono::{DateTime, Utc};
use flexsearch_core::models::{IndexReport, Table};
use flexsearch_llm::EmbeddingModel;
use flexsearch_retrieval::Session;
use serde::Serialize;
use uuid::Uuid;

/// Rows returned by a dataset preview
pub const PREVIEW_ROWS: usize = 5;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "ok", service: "flexsearch-api" }
    }
}

/// Supported embedding model
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub name: &'static str,
    pub dimensions: usize,
    pub default: bool,
}

impl ModelInfo {
    pub fn new(model: EmbeddingModel, default: EmbeddingModel) -> Self {
        Self { name: model.name(), dimensions: model.dimensions(), default: model == default }
    }
}

/// Columns, size and first rows of an uploaded dataset
#[derive(Debug, Serialize)]
pub struct DatasetPreview {
    pub name: String,
    pub columns: Vec<String>,
    pub row_count: usize,
    pub rows: Vec<Vec<String>>,
}

impl DatasetPreview {
    pub fn new(name: impl Into<String>, table: &Table) -> Self {
        Self {
            name: name.into(),
            columns: table.columns.clone(),
            row_count: table.len(),
            rows: table.head(PREVIEW_ROWS).string_rows().collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    pub name: String,
    pub columns: Vec<String>,
    pub row_count: usize,
}

/// Session summary
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub model: EmbeddingModel,
    pub index: String,
    pub vector_field: String,
    pub created_at: DateTime<Utc>,
    pub dataset: Option<DatasetSummary>,
    pub text_column: Option<String>,
    pub last_report: Option<IndexReport>,
    pub result_count: Option<usize>,
}

impl SessionResponse {
    pub fn new(id: Uuid, session: &Session) -> Self {
        let dataset = session.table().map(|table| DatasetSummary {
            name: session.dataset_name().unwrap_or_default().to_string(),
            columns: table.columns.clone(),
            row_count: table.len(),
        });

        Self {
            id,
            model: session.model,
            index: session.target.index.clone(),
            vector_field: session.target.vector_field.clone(),
            created_at: session.created_at,
            dataset,
            text_column: session.text_column().map(str::to_string),
            last_report: session.last_report().cloned(),
            result_count: session.last_results().map(|r| r.len()),
        }
    }
}
