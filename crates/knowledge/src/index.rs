//! SQLite-backed vector index for documents.
//!
//! Embeddings are stored as little-endian `f32` blobs. Search is a full scan
//! ranked by cosine similarity, which is plenty for a small curated corpus.

use crate::types::{Document, ScoredDocument};
use ragline_core::{AppError, AppResult};
use rusqlite::{params, Connection};
use std::path::Path;

/// Initialize the SQLite index database.
pub fn init_index(db_path: &Path) -> AppResult<Connection> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            AppError::UpstreamStore(format!("Failed to create store directory: {}", e))
        })?;
    }

    let conn = Connection::open(db_path)
        .map_err(|e| AppError::UpstreamStore(format!("Failed to open SQLite store: {}", e)))?;

    create_tables(&conn)?;

    tracing::debug!("Initialized SQLite index at {:?}", db_path);
    Ok(conn)
}

fn create_tables(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            id TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            text TEXT NOT NULL,
            embedding BLOB NOT NULL,
            metadata TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_documents_position ON documents(position);
        "#,
    )
    .map_err(|e| AppError::UpstreamStore(format!("Failed to create tables: {}", e)))?;

    Ok(())
}

/// Insert a document with its embedding, after every existing row.
pub fn insert_document(conn: &Connection, document: &Document, embedding: &[f32]) -> AppResult<()> {
    let embedding_bytes = embedding_to_bytes(embedding);

    let metadata_json = serde_json::to_string(&document.metadata).map_err(|e| {
        AppError::UpstreamStore(format!("Failed to serialize metadata: {}", e))
    })?;

    conn.execute(
        "INSERT OR REPLACE INTO documents (id, position, text, embedding, metadata)
         VALUES (?1, (SELECT COALESCE(MAX(position) + 1, 0) FROM documents), ?2, ?3, ?4)",
        params![document.id, document.text, embedding_bytes, metadata_json],
    )
    .map_err(|e| AppError::UpstreamStore(format!("Failed to insert document: {}", e)))?;

    Ok(())
}

/// Insert a batch of documents in one transaction.
///
/// Either every row is committed or none is. `embeddings[i]` belongs to
/// `documents[i]`.
pub fn insert_documents(
    conn: &mut Connection,
    documents: &[Document],
    embeddings: &[Vec<f32>],
) -> AppResult<usize> {
    if documents.len() != embeddings.len() {
        return Err(AppError::UpstreamStore(format!(
            "Got {} embeddings for {} documents",
            embeddings.len(),
            documents.len()
        )));
    }

    let tx = conn
        .transaction()
        .map_err(|e| AppError::UpstreamStore(format!("Failed to begin transaction: {}", e)))?;

    for (document, embedding) in documents.iter().zip(embeddings) {
        insert_document(&tx, document, embedding)?;
    }

    tx.commit()
        .map_err(|e| AppError::UpstreamStore(format!("Failed to commit documents: {}", e)))?;

    Ok(documents.len())
}

/// Query the index for the top-k documents most similar to `query_embedding`.
///
/// Results are ordered best first; equal scores keep insertion order.
pub fn query_documents(
    conn: &Connection,
    query_embedding: &[f32],
    top_k: usize,
) -> AppResult<Vec<ScoredDocument>> {
    let mut stmt = conn
        .prepare("SELECT id, text, embedding, metadata FROM documents ORDER BY position")
        .map_err(|e| AppError::UpstreamStore(format!("Failed to prepare query: {}", e)))?;

    let rows = stmt
        .query_map([], |row| {
            let embedding_bytes: Vec<u8> = row.get(2)?;
            let metadata_json: Option<String> = row.get(3)?;
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                embedding_bytes,
                metadata_json,
            ))
        })
        .map_err(|e| AppError::UpstreamStore(format!("Failed to query documents: {}", e)))?;

    let mut results = Vec::new();
    for row in rows {
        let (id, text, embedding_bytes, metadata_json) =
            row.map_err(|e| AppError::UpstreamStore(format!("Failed to read row: {}", e)))?;

        let embedding = bytes_to_embedding(&embedding_bytes)?;
        if embedding.len() != query_embedding.len() {
            tracing::warn!(
                "Document {} has {}-dim embedding, query has {}; was the embedding model changed?",
                id,
                embedding.len(),
                query_embedding.len()
            );
        }

        let metadata = match metadata_json {
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                AppError::UpstreamStore(format!("Invalid metadata for document {}: {}", id, e))
            })?,
            None => serde_json::Value::Null,
        };

        let score = cosine_similarity(query_embedding, &embedding);
        results.push(ScoredDocument {
            document: Document { id, text, metadata },
            score,
        });
    }

    // Stable sort keeps insertion order among equal scores
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    results.truncate(top_k);

    tracing::debug!(
        "Retrieved {} documents (requested top-{})",
        results.len(),
        top_k
    );

    Ok(results)
}

/// Number of documents in the index.
pub fn count_documents(conn: &Connection) -> AppResult<usize> {
    conn.query_row("SELECT COUNT(*) FROM documents", [], |row| {
        row.get::<_, i64>(0).map(|v| v as usize)
    })
    .map_err(|e| AppError::UpstreamStore(format!("Failed to count documents: {}", e)))
}

/// Reset the index (delete all data).
pub fn reset_index(conn: &Connection) -> AppResult<()> {
    conn.execute("DELETE FROM documents", [])
        .map_err(|e| AppError::UpstreamStore(format!("Failed to delete documents: {}", e)))?;

    tracing::info!("Reset document index");
    Ok(())
}

/// Convert embedding vector to bytes for storage.
fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(embedding.len() * 4);
    for &value in embedding {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Convert bytes back to embedding vector.
fn bytes_to_embedding(bytes: &[u8]) -> AppResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(AppError::UpstreamStore(
            "Invalid embedding bytes length".to_string(),
        ));
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

/// Calculate cosine similarity between two vectors.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
