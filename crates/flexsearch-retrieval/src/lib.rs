//! Flexsearch Retrieval - Indexing and k-NN search use cases
//!
//! This crate orchestrates the embedder and the search index: turning a
//! loaded table into indexed documents and answering free-text queries.

pub mod indexer;
pub mod searcher;
pub mod session;

pub use indexer::{IndexPhase, IndexProgress, Indexer};
pub use searcher::Searcher;
pub use session::{IndexTarget, Session};
