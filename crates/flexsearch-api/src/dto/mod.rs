mod request;
mod response;

pub use request::{CreateSessionRequest, IndexRequest, SearchRequestBody};
pub use response::{
    DatasetPreview, DatasetSummary, HealthResponse, ModelInfo, SessionResponse, PREVIEW_ROWS,
};
