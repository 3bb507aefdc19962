use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use flexsearch_core::error::FlexsearchError;
use serde::Serialize;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), details: None }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<FlexsearchError> for ApiError {
    fn from(err: FlexsearchError) -> Self {
        let (status, message) = match &err {
            FlexsearchError::Parse { .. } => (StatusCode::BAD_REQUEST, "Invalid dataset"),
            FlexsearchError::ColumnNotFound { .. } => (StatusCode::BAD_REQUEST, "Unknown column"),
            FlexsearchError::UnknownModel { .. } => (StatusCode::BAD_REQUEST, "Unknown model"),
            FlexsearchError::DimensionMismatch { .. } => {
                (StatusCode::BAD_REQUEST, "Embedding dimension mismatch")
            }
            FlexsearchError::ConfigMissing { .. } | FlexsearchError::ConfigInvalid { .. } => {
                (StatusCode::BAD_REQUEST, "Invalid request")
            }
            FlexsearchError::DatasetNotFound { .. } => (StatusCode::NOT_FOUND, "Dataset not found"),
            FlexsearchError::Connection { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "Search backend unavailable")
            }
            FlexsearchError::Embedding { .. } => (StatusCode::BAD_GATEWAY, "Embedding failed"),
            FlexsearchError::Search { .. } => (StatusCode::BAD_GATEWAY, "Search failed"),
            FlexsearchError::Index { .. } => (StatusCode::BAD_GATEWAY, "Indexing failed"),
            FlexsearchError::Refresh { .. } => (StatusCode::BAD_GATEWAY, "Index refresh failed"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
        };

        if status.is_server_error() {
            tracing::error!(status = %status, error = %err, "request failed");
        }

        Self::new(status, message).with_details(err.to_string())
    }
}
