//! Document store abstraction and its SQLite implementation.

use crate::embeddings::EmbeddingProvider;
use crate::index;
use crate::types::{Document, ScoredDocument};
use ragline_core::AppResult;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A similarity-search index over text passages.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the `k` documents most similar to `query`, best first.
    ///
    /// Zero matches is an empty vector, not an error.
    async fn search(&self, query: &str, k: usize) -> AppResult<Vec<Document>>;

    /// Number of stored documents.
    async fn count(&self) -> AppResult<usize>;

    /// Embed and store documents; returns how many were added.
    async fn add_documents(&self, documents: Vec<Document>) -> AppResult<usize>;
}

/// Persistent store backed by one SQLite file per collection.
pub struct SqliteStore {
    path: PathBuf,
    collection: String,
    conn: Mutex<Connection>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl SqliteStore {
    /// Open (or create) `<dir>/<collection>.sqlite`.
    pub fn open(
        dir: &Path,
        collection: &str,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> AppResult<Self> {
        let path = dir.join(format!("{}.sqlite", collection));
        let conn = index::init_index(&path)?;

        tracing::info!(
            "Opened document store '{}' at {}",
            collection,
            path.display()
        );

        Ok(Self {
            path,
            collection: collection.to_string(),
            conn: Mutex::new(conn),
            embedder,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Search and keep the similarity scores.
    pub async fn search_scored(&self, query: &str, k: usize) -> AppResult<Vec<ScoredDocument>> {
        // Embed outside the lock
        let query_embedding = self.embedder.embed(query).await?;

        let conn = self.conn.lock().await;
        index::query_documents(&conn, &query_embedding, k)
    }

    /// Delete every document in the collection.
    pub async fn reset(&self) -> AppResult<()> {
        let conn = self.conn.lock().await;
        index::reset_index(&conn)
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("path", &self.path)
            .field("collection", &self.collection)
            .field("embedder", &self.embedder)
            .finish()
    }
}

#[async_trait::async_trait]
impl DocumentStore for SqliteStore {
    async fn search(&self, query: &str, k: usize) -> AppResult<Vec<Document>> {
        let hits = self.search_scored(query, k).await?;

        if let (Some(best), Some(worst)) = (hits.first(), hits.last()) {
            tracing::debug!(
                "Store '{}' returned {} documents (top score: {:.3}, lowest: {:.3})",
                self.collection,
                hits.len(),
                best.score,
                worst.score
            );
        }

        Ok(hits.into_iter().map(|hit| hit.document).collect())
    }

    async fn count(&self) -> AppResult<usize> {
        let conn = self.conn.lock().await;
        index::count_documents(&conn)
    }

    async fn add_documents(&self, documents: Vec<Document>) -> AppResult<usize> {
        if documents.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let mut conn = self.conn.lock().await;
        index::insert_documents(&mut conn, &documents, &embeddings)?;

        tracing::info!(
            "Added {} documents to store '{}'",
            documents.len(),
            self.collection
        );

        Ok(documents.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::providers::TrigramProvider;
    use tempfile::TempDir;

    fn open_store(dir: &Path) -> SqliteStore {
        SqliteStore::open(dir, "test-collection", Arc::new(TrigramProvider::new(384))).unwrap()
    }

    #[tokio::test]
    async fn test_open_uses_collection_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(temp_dir.path());

        assert_eq!(store.collection(), "test-collection");
        assert_eq!(store.path(), temp_dir.path().join("test-collection.sqlite"));
        assert!(store.path().exists());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_add_and_search() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(temp_dir.path());

        let added = store
            .add_documents(vec![
                Document::new("Rust ownership and borrowing", serde_json::json!({})),
                Document::new("Pasta recipes with basil", serde_json::json!({})),
            ])
            .await
            .unwrap();
        assert_eq!(added, 2);
        assert_eq!(store.count().await.unwrap(), 2);

        let results = store.search("rust borrowing rules", 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "Rust ownership and borrowing");
    }

    #[tokio::test]
    async fn test_search_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(temp_dir.path());

        assert!(store.search("anything", 4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_documents_persist_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = open_store(temp_dir.path());
            store
                .add_documents(vec![Document::new("kept", serde_json::json!({}))])
                .await
                .unwrap();
        }

        let reopened = open_store(temp_dir.path());
        assert_eq!(reopened.count().await.unwrap(), 1);

        reopened.reset().await.unwrap();
        assert_eq!(reopened.count().await.unwrap(), 0);
    }
}
