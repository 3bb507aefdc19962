use serde::Deserialize;

/// Create session request body; omitted values fall back to the server defaults
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    pub model: Option<String>,
    pub index: Option<String>,
}

/// Index request body
#[derive(Debug, Deserialize)]
pub struct IndexRequest {
    pub text_column: String,
    pub id_column: String,
}

/// Search request body
#[derive(Debug, Deserialize)]
pub struct SearchRequestBody {
    pub query: String,
    pub top_k: Option<usize>,
    pub num_candidates: Option<usize>,
    #[serde(default)]
    pub fields: Vec<String>,
}
