mod index;
mod search;
mod sessions;

pub use index::IndexService;
pub use search::{ExportFile, SearchService};
pub use sessions::SessionService;
