//! Document store for ragline.
//!
//! Provides a local SQLite vector store, pluggable embedding providers and
//! the built-in seed corpus.

pub mod embeddings;
pub mod index;
pub mod seed;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use embeddings::{create_provider, EmbeddingProvider};
pub use seed::{seed_documents, seed_if_empty, SEED_COLLECTION};
pub use store::{DocumentStore, SqliteStore};
pub use types::{Document, ScoredDocument};
