use std::sync::Arc;

use axum::{extract::State, Json};
use flexsearch_llm::EmbeddingModel;

use crate::dto::ModelInfo;
use crate::state::AppState;

pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<Vec<ModelInfo>> {
    let models = EmbeddingModel::ALL
        .iter()
        .map(|model| ModelInfo::new(*model, state.defaults.model))
        .collect();
    Json(models)
}
