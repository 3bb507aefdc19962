use flexsearch_core::loader::load_csv_bytes;
use flexsearch_llm::EmbeddingModel;
use flexsearch_retrieval::{IndexTarget, Session};
use uuid::Uuid;

use crate::dto::{CreateSessionRequest, DatasetPreview, SessionResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Service for session lifecycle and dataset uploads
pub struct SessionService;

impl SessionService {
    /// Create a session with the requested (or default) model and index
    pub fn create(state: &AppState, request: CreateSessionRequest) -> Result<SessionResponse, ApiError> {
        let model = match request.model.as_deref() {
            Some(name) => name.parse::<EmbeddingModel>()?,
            None => state.defaults.model,
        };

        let index = match request.index.map(|i| i.trim().to_string()) {
            Some(index) if index.is_empty() => {
                return Err(ApiError::bad_request("Invalid index name")
                    .with_details("index name cannot be empty"));
            }
            Some(index) => index,
            None => state.defaults.target.index.clone(),
        };

        let target = IndexTarget::new(index, state.defaults.target.vector_field.clone());
        let session = Session::new(model, target);
        let id = state.insert_session(session.clone())?;

        tracing::info!(session = %id, model = %model, index = %session.target.index, "Created session");
        Ok(SessionResponse::new(id, &session))
    }

    pub fn get(state: &AppState, id: Uuid) -> Result<SessionResponse, ApiError> {
        let session = state.session(id)?;
        Ok(SessionResponse::new(id, &session))
    }

    /// Parse an uploaded CSV and make it the session's dataset
    pub fn load_dataset(
        state: &AppState,
        id: Uuid,
        filename: &str,
        data: &[u8],
    ) -> Result<DatasetPreview, ApiError> {
        // Reject unknown sessions before parsing the upload
        state.session(id)?;

        let table = load_csv_bytes(data)?;
        let preview = DatasetPreview::new(filename, &table);

        state.update_session(id, |session| session.set_dataset(filename, table))?;

        tracing::info!(
            session = %id,
            dataset = %filename,
            rows = preview.row_count,
            columns = preview.columns.len(),
            "Loaded dataset"
        );
        Ok(preview)
    }
}
