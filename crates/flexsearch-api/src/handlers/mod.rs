mod dataset;
mod export;
mod health;
mod index;
mod models;
mod search;
mod sessions;

pub use dataset::upload_dataset;
pub use export::export_results;
pub use health::health_check;
pub use index::index_dataset;
pub use models::list_models;
pub use search::search;
pub use sessions::{create_session, get_session};
