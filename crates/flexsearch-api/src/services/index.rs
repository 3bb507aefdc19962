use flexsearch_core::models::IndexReport;
use flexsearch_retrieval::Indexer;
use uuid::Uuid;

use crate::dto::IndexRequest;
use crate::error::ApiError;
use crate::state::AppState;

/// Service for indexing a session's dataset
pub struct IndexService;

impl IndexService {
    /// Embed and index the session's dataset, storing the report on the session
    pub async fn run(state: &AppState, id: Uuid, request: &IndexRequest) -> Result<IndexReport, ApiError> {
        let session = state.session(id)?;
        let table = session.require_table()?;
        let embedder = state.embedder(session.model)?;

        tracing::info!(
            session = %id,
            index = %session.target.index,
            text_column = %request.text_column,
            id_column = %request.id_column,
            rows = table.len(),
            "Indexing dataset"
        );

        let indexer = Indexer::new(state.store.clone(), embedder);
        let report = indexer
            .index_table(table, &session.target, &request.text_column, &request.id_column)
            .await?;

        let stored = report.clone();
        state.update_session(id, |session| {
            session.set_text_column(request.text_column.clone());
            session.set_report(stored);
        })?;

        Ok(report)
    }
}
