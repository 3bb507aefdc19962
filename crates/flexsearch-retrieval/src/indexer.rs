use chrono::Utc;
use flexsearch_core::error::{FlexsearchError, Result};
use flexsearch_core::models::{
    Document, DocumentId, IndexFailure, IndexReport, Table, MISSING_VALUE,
};
use flexsearch_llm::Embedder;
use flexsearch_store::ports::{IndexSettings, SearchIndex};
use tracing::{info, warn};

use crate::session::IndexTarget;

/// Progress information for an indexing run
#[derive(Debug, Clone)]
pub struct IndexProgress {
    pub phase: IndexPhase,
    pub current: usize,
    pub total: usize,
    pub message: String,
}

/// Current phase of an indexing run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexPhase {
    Validating,
    GeneratingEmbeddings,
    PreparingIndex,
    StoringDocuments,
    Finalizing,
}

/// Turns table rows into documents and upserts them into a search index
pub struct Indexer<S, E>
where
    S: SearchIndex,
    E: Embedder,
{
    store: S,
    embedder: E,
    batch_size: usize,
}

impl<S, E> Indexer<S, E>
where
    S: SearchIndex,
    E: Embedder,
{
    /// Create a new indexer
    pub fn new(store: S, embedder: E) -> Self {
        Self { store, embedder, batch_size: 32 }
    }

    /// Set the batch size for embedding generation
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Index every row of `table`
    pub async fn index_table(
        &self,
        table: &Table,
        target: &IndexTarget,
        text_column: &str,
        id_column: &str,
    ) -> Result<IndexReport> {
        self.index_table_with_progress(table, target, text_column, id_column, |_| {}).await
    }

    /// Index every row of `table` with progress reporting
    ///
    /// This performs the following steps:
    /// 1. Check that both columns exist
    /// 2. Embed the text column of every row (any failure aborts the run)
    /// 3. Create the index if it is absent
    /// 4. Upsert each row, collecting per-row failures into the report
    /// 5. Refresh the index
    pub async fn index_table_with_progress<F>(
        &self,
        table: &Table,
        target: &IndexTarget,
        text_column: &str,
        id_column: &str,
        mut progress: F,
    ) -> Result<IndexReport>
    where
        F: FnMut(IndexProgress),
    {
        progress(IndexProgress {
            phase: IndexPhase::Validating,
            current: 0,
            total: 2,
            message: "Checking columns".to_string(),
        });

        for column in [text_column, id_column] {
            if !table.has_column(column) {
                return Err(FlexsearchError::ColumnNotFound {
                    name: column.to_string(),
                    available: table.columns.clone(),
                });
            }
        }

        let mut report = IndexReport::new(
            &target.index,
            self.embedder.model_name(),
            self.embedder.dimensions(),
        );

        let vectors = self.generate_embeddings_with_progress(table, text_column, &mut progress).await?;

        progress(IndexProgress {
            phase: IndexPhase::PreparingIndex,
            current: 0,
            total: 1,
            message: format!("Preparing index '{}'", target.index),
        });

        report.created_index = self.ensure_index(target).await?;

        let total = table.len();
        for (idx, (row, vector)) in table.rows.iter().zip(vectors).enumerate() {
            let id = row
                .get(id_column)
                .map(DocumentId::from_value)
                .unwrap_or_else(|| DocumentId::from(MISSING_VALUE));
            let document = Document::new(id.clone(), row.clone(), &target.vector_field, vector);

            match self.store.upsert(&target.index, &document).await {
                Ok(()) => report.succeeded.push(id),
                Err(e) => {
                    warn!(index = %target.index, id = %id, error = %e, "failed to index document");
                    report.failed.push(IndexFailure { id, reason: e.to_string() });
                }
            }

            progress(IndexProgress {
                phase: IndexPhase::StoringDocuments,
                current: idx + 1,
                total,
                message: format!("Indexed {}/{} documents", idx + 1, total),
            });
        }

        progress(IndexProgress {
            phase: IndexPhase::Finalizing,
            current: 0,
            total: 1,
            message: "Refreshing index".to_string(),
        });

        if let Err(e) = self.store.refresh(&target.index).await {
            warn!(
                index = %target.index,
                succeeded = report.succeeded.len(),
                failed = report.failed.len(),
                error = %e,
                "documents written but refresh failed"
            );
            return Err(FlexsearchError::Refresh {
                index: target.index.clone(),
                succeeded: report.succeeded.len(),
                failed: report.failed.len(),
                reason: e.to_string(),
            });
        }

        report.finished_at = Utc::now();
        info!(
            index = %target.index,
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "indexing finished"
        );

        Ok(report)
    }

    /// Create the index if it is absent; returns whether it was created
    ///
    /// An existing index whose vectors have a different length is rejected
    /// before anything is written.
    async fn ensure_index(&self, target: &IndexTarget) -> Result<bool> {
        if let Some(info) = self.store.index_info(&target.index).await? {
            if let Some(dims) = info.dimensions {
                if dims != self.embedder.dimensions() {
                    return Err(FlexsearchError::DimensionMismatch {
                        index: target.index.clone(),
                        expected: dims,
                        actual: self.embedder.dimensions(),
                    });
                }
            }
            return Ok(false);
        }

        let settings = IndexSettings {
            vector_field: target.vector_field.clone(),
            dimensions: self.embedder.dimensions(),
            model: self.embedder.model_name().to_string(),
        };
        self.store.create_index(&target.index, &settings).await?;
        Ok(true)
    }

    /// Generate embeddings with progress reporting
    async fn generate_embeddings_with_progress<F>(
        &self,
        table: &Table,
        text_column: &str,
        progress: &mut F,
    ) -> Result<Vec<Vec<f32>>>
    where
        F: FnMut(IndexProgress),
    {
        let texts: Vec<String> = table
            .rows
            .iter()
            .map(|row| row.get(text_column).map(|v| v.to_string()).unwrap_or_default())
            .collect();

        let total = texts.len();
        let mut vectors = Vec::with_capacity(total);

        for batch in texts.chunks(self.batch_size) {
            let refs: Vec<&str> = batch.iter().map(String::as_str).collect();
            vectors.extend(self.embedder.encode_many(&refs).await?);

            progress(IndexProgress {
                phase: IndexPhase::GeneratingEmbeddings,
                current: vectors.len(),
                total,
                message: format!("Generated {}/{} embeddings", vectors.len(), total),
            });
        }

        if vectors.len() != total {
            return Err(FlexsearchError::Embedding {
                model: self.embedder.model_name().to_string(),
                reason: format!("expected {} embeddings, received {}", total, vectors.len()),
                remediation: "Check the embedding service logs".to_string(),
            });
        }

        Ok(vectors)
    }
}
