use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use flexsearch_core::models::IndexReport;
use uuid::Uuid;

use crate::dto::IndexRequest;
use crate::error::ApiError;
use crate::services::IndexService;
use crate::state::AppState;

pub async fn index_dataset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<IndexRequest>,
) -> Result<Json<IndexReport>, ApiError> {
    let report = IndexService::run(&state, id, &request).await?;
    Ok(Json(report))
}
