//! Flexsearch LLM - Embedding port and adapters
//!
//! This crate defines the port for turning text into vectors, the closed set
//! of supported sentence-embedding models, and the adapter implementations.

pub mod hashing;
pub mod http;
pub mod models;
pub mod ports;
pub mod provider;

// Re-export main types
pub use hashing::HashingEmbedder;
pub use http::HttpEmbedder;
pub use models::EmbeddingModel;
pub use ports::Embedder;
pub use provider::build_embedder;
