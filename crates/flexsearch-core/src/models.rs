pub mod document;
pub mod query;
pub mod report;
pub mod table;

pub use document::{Document, DocumentId};
pub use query::{ResultSet, SearchHit, SearchRequest, MAX_NUM_CANDIDATES, NOT_AVAILABLE};
pub use report::{IndexFailure, IndexReport};
pub use table::{Row, Table, Value, MISSING_VALUE};
