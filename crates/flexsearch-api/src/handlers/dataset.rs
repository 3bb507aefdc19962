use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use uuid::Uuid;

use crate::dto::DatasetPreview;
use crate::error::ApiError;
use crate::services::SessionService;
use crate::state::AppState;

pub async fn upload_dataset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<DatasetPreview>, ApiError> {
    let (filename, data) = extract_file(&mut multipart).await?;

    tracing::info!(session = %id, filename = %filename, size = data.len(), "Received dataset upload");

    let preview = SessionService::load_dataset(&state, id, &filename, &data)?;
    Ok(Json(preview))
}

async fn extract_file(multipart: &mut Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::bad_request("Failed to parse multipart form").with_details(e.to_string())
    })? {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            let filename = field.file_name().unwrap_or("upload.csv").to_string();
            let data = field.bytes().await.map_err(|e| {
                ApiError::bad_request("Failed to read file data").with_details(e.to_string())
            })?;
            return Ok((filename, data.to_vec()));
        }
    }

    Err(ApiError::bad_request("No file provided")
        .with_details("Expected a 'file' field in the multipart form"))
}
