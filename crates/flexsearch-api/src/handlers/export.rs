use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::services::SearchService;
use crate::state::AppState;

pub async fn export_results(
    State(state): State<Arc<AppState>>,
    Path((id, format)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let file = SearchService::export(&state, id, &format)?;

    let disposition = format!("attachment; filename=\"{}\"", file.format.file_name());
    Ok((
        [
            (header::CONTENT_TYPE, file.format.mime_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    ))
}
