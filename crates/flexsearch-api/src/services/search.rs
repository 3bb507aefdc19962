use flexsearch_core::models::{ResultSet, SearchRequest};
use flexsearch_report::{export, ExportFormat};
use flexsearch_retrieval::Searcher;
use uuid::Uuid;

use crate::dto::SearchRequestBody;
use crate::error::ApiError;
use crate::state::AppState;

/// An encoded export ready to be sent
pub struct ExportFile {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

/// Service for searches and result exports
pub struct SearchService;

impl SearchService {
    /// Run a search for the session and remember the results
    pub async fn run(state: &AppState, id: Uuid, body: SearchRequestBody) -> Result<ResultSet, ApiError> {
        let session = state.session(id)?;

        let request = session.prepare_request(
            SearchRequest::new(body.query)
                .with_top_k(body.top_k.unwrap_or(state.defaults.top_k))
                .with_num_candidates(body.num_candidates.unwrap_or(state.defaults.num_candidates))
                .with_fields(body.fields),
        );

        request
            .validate()
            .map_err(|reason| ApiError::bad_request("Invalid search request").with_details(reason))?;
        if request.fields.is_empty() {
            return Err(ApiError::bad_request("Invalid search request")
                .with_details("no fields selected; pass `fields` or index the dataset first"));
        }

        let searcher = Searcher::new(state.store.clone(), state.embedder(session.model)?);
        let results = searcher.search(&session.target, &request).await?;

        tracing::info!(session = %id, query = %request.query, hits = results.len(), "Search finished");

        let stored = results.clone();
        state.update_session(id, |session| session.set_results(stored))?;

        Ok(results)
    }

    /// Encode the session's latest results
    pub fn export(state: &AppState, id: Uuid, format: &str) -> Result<ExportFile, ApiError> {
        let format = format.parse::<ExportFormat>().map_err(|e| {
            ApiError::bad_request("Unsupported export format").with_details(e.to_string())
        })?;

        let session = state.session(id)?;
        let results = session.last_results().ok_or_else(|| {
            ApiError::bad_request("No search results to export").with_details("run a search first")
        })?;

        let bytes = export(&results.to_table(), format)?;
        tracing::info!(session = %id, format = %format, bytes = bytes.len(), "Exported results");

        Ok(ExportFile { format, bytes })
    }
}
