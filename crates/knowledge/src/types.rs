//! Core data types for the document store.

use serde::{Deserialize, Serialize};

/// A passage held by the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier (UUID)
    pub id: String,

    /// Passage text returned to the pipeline
    pub text: String,

    /// Free-form metadata (e.g. `source`, `topic`); not used for ranking
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl Document {
    /// Create a document with a fresh id.
    pub fn new(text: impl Into<String>, metadata: serde_json::Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            metadata,
        }
    }
}

/// A search hit with its cosine similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f32,
}
