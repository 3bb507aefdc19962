//! OpenAI-compatible HTTP embedding adapter
//!
//! Talks to any service exposing `POST /v1/embeddings` (text-embeddings-inference,
//! infinity, vLLM, ...) serving one of the supported sentence-transformer models.

use crate::models::EmbeddingModel;
use crate::ports::{check_dimensions, Embedder};
use async_trait::async_trait;
use flexsearch_core::error::{FlexsearchError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default number of texts sent per request
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// HTTP embedder implementation
pub struct HttpEmbedder {
    /// Base URL of the embedding service (e.g., "http://localhost:8080")
    base_url: String,

    /// Model served by the embedding service
    model: EmbeddingModel,

    /// Maximum texts per request
    batch_size: usize,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpEmbedder {
    /// Create a new HTTP embedder
    pub fn new(base_url: impl Into<String>, model: EmbeddingModel) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model,
            batch_size: DEFAULT_BATCH_SIZE,
            client: reqwest::Client::new(),
        }
    }

    /// Create with default localhost URL
    pub fn localhost(model: EmbeddingModel) -> Self {
        Self::new("http://localhost:8080", model)
    }

    /// Set the number of texts per request (at least 1)
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/embeddings", self.base_url)
    }

    fn unavailable(&self, reason: String) -> FlexsearchError {
        FlexsearchError::Embedding {
            model: self.model.to_string(),
            reason,
            remediation: format!(
                "Ensure an embedding service is running at {} and serves the model '{}'",
                self.base_url, self.model
            ),
        }
    }

    async fn encode_batch(&self, batch: &[&str]) -> Result<Vec<Vec<f32>>> {
        let request = EmbeddingRequest {
            model: self.model.name(),
            input: batch,
        };

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.unavailable(format!("Failed to connect to embedding service: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(FlexsearchError::Embedding {
                model: self.model.to_string(),
                reason: format!("Embedding API error ({}): {}", status, error_text),
                remediation: format!(
                    "Check that the service at {} is configured with '{}'",
                    self.base_url, self.model
                ),
            });
        }

        let mut body: EmbeddingResponse = response.json().await.map_err(|e| {
            FlexsearchError::Embedding {
                model: self.model.to_string(),
                reason: format!("Failed to parse embedding response: {}", e),
                remediation: "Check that the service implements the /v1/embeddings API"
                    .to_string(),
            }
        })?;

        if body.data.len() != batch.len() {
            return Err(self.unavailable(format!(
                "requested {} embeddings, received {}",
                batch.len(),
                body.data.len()
            )));
        }

        body.data.sort_by_key(|item| item.index);
        Ok(body.data.into_iter().map(|item| item.embedding).collect())
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn encode_many(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.batch_size) {
            debug!(model = %self.model, batch = batch.len(), "requesting embeddings");
            embeddings.extend(self.encode_batch(batch).await?);
        }

        check_dimensions(self.model.name(), self.model.dimensions(), &embeddings)?;
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.model.dimensions()
    }

    fn model_name(&self) -> &str {
        self.model.name()
    }
}

/// Request body for the embeddings API
#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

/// Response from the embeddings API
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}
