use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::dto::{CreateSessionRequest, SessionResponse};
use crate::error::ApiError;
use crate::services::SessionService;
use crate::state::AppState;

pub async fn create_session(
    State(state): State<Arc<AppState>>,
    body: Option<Json<CreateSessionRequest>>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let session = SessionService::create(&state, request)?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    Ok(Json(SessionService::get(&state, id)?))
}
