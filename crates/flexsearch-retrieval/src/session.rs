//! Per-user working context

use chrono::{DateTime, Utc};
use flexsearch_core::config::LayeredConfig;
use flexsearch_core::error::{FlexsearchError, Result};
use flexsearch_core::models::{IndexReport, ResultSet, SearchRequest, Table};
use flexsearch_llm::EmbeddingModel;
use serde::{Deserialize, Serialize};

/// Where documents are written and searched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexTarget {
    /// Index name
    pub index: String,

    /// Dense-vector field holding the embeddings
    pub vector_field: String,
}

impl IndexTarget {
    pub fn new(index: impl Into<String>, vector_field: impl Into<String>) -> Self {
        Self { index: index.into(), vector_field: vector_field.into() }
    }

    /// Target taken from the layered configuration
    pub fn from_config(config: &LayeredConfig) -> Self {
        Self::new(config.index_name.value.clone(), config.vector_field.value.clone())
    }
}

/// Context of one user's work: selected model, target index, the loaded
/// dataset and the most recent results
#[derive(Debug, Clone)]
pub struct Session {
    pub model: EmbeddingModel,
    pub target: IndexTarget,
    pub created_at: DateTime<Utc>,
    dataset_name: Option<String>,
    table: Option<Table>,
    text_column: Option<String>,
    last_report: Option<IndexReport>,
    last_results: Option<ResultSet>,
}

impl Session {
    pub fn new(model: EmbeddingModel, target: IndexTarget) -> Self {
        Self {
            model,
            target,
            created_at: Utc::now(),
            dataset_name: None,
            table: None,
            text_column: None,
            last_report: None,
            last_results: None,
        }
    }

    /// Replace the loaded dataset
    pub fn set_dataset(&mut self, name: impl Into<String>, table: Table) {
        self.dataset_name = Some(name.into());
        self.table = Some(table);
    }

    pub fn dataset_name(&self) -> Option<&str> {
        self.dataset_name.as_deref()
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// The loaded dataset, or an error telling the user to upload one
    pub fn require_table(&self) -> Result<&Table> {
        self.table.as_ref().ok_or_else(|| FlexsearchError::ConfigMissing {
            key: "dataset (upload a CSV file first)".to_string(),
        })
    }

    /// Remember the text column used for indexing
    pub fn set_text_column(&mut self, column: impl Into<String>) {
        self.text_column = Some(column.into());
    }

    pub fn text_column(&self) -> Option<&str> {
        self.text_column.as_deref()
    }

    /// Resolve the display projection: the requested fields, or the text
    /// column when none were requested
    pub fn projection(&self, requested: &[String]) -> Vec<String> {
        let requested: Vec<String> = requested
            .iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();
        if !requested.is_empty() {
            return requested;
        }
        self.text_column.iter().cloned().collect()
    }

    /// Apply the session's default projection to a request
    pub fn prepare_request(&self, request: SearchRequest) -> SearchRequest {
        let fields = self.projection(&request.fields);
        request.with_fields(fields)
    }

    pub fn set_report(&mut self, report: IndexReport) {
        self.last_report = Some(report);
    }

    pub fn last_report(&self) -> Option<&IndexReport> {
        self.last_report.as_ref()
    }

    pub fn set_results(&mut self, results: ResultSet) {
        self.last_results = Some(results);
    }

    pub fn last_results(&self) -> Option<&ResultSet> {
        self.last_results.as_ref()
    }
}
