//! Embedding providers for the document store.
//!
//! The store embeds passages at insert time and queries at search time with
//! the same provider, so both land in one vector space.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
