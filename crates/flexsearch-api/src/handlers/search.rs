use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use flexsearch_core::models::ResultSet;
use uuid::Uuid;

use crate::dto::SearchRequestBody;
use crate::error::ApiError;
use crate::services::SearchService;
use crate::state::AppState;

pub async fn search(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<SearchRequestBody>,
) -> Result<Json<ResultSet>, ApiError> {
    tracing::info!(session = %id, query = %body.query, top_k = ?body.top_k, "Processing search request");

    let results = SearchService::run(&state, id, body).await?;
    Ok(Json(results))
}
