//! Built-in seed corpus about agentic AI workflows.

use crate::store::DocumentStore;
use crate::types::Document;
use ragline_core::AppResult;
use serde_json::json;

/// Collection the seed corpus is written to by default.
pub const SEED_COLLECTION: &str = "agentic-ai";

const SEED_PASSAGES: &[(&str, &str)] = &[
    (
        "Agentic AI refers to LLM-based systems that can plan, call tools, and collaborate with other specialized agents to complete tasks.",
        "agentic-ai",
    ),
    (
        "Multi-agent workflows often follow retrieve -> validate -> synthesize. Retrieval pulls context, validation filters hallucinations, synthesis writes the answer.",
        "pipelines",
    ),
    (
        "LangGraph adds stateful DAG-style orchestration on top of LangChain components for long-running autonomous agents.",
        "langgraph",
    ),
];

/// The seed documents, tagged `source: seed` with a topic.
pub fn seed_documents() -> Vec<Document> {
    SEED_PASSAGES
        .iter()
        .map(|(text, topic)| Document::new(*text, json!({"source": "seed", "topic": topic})))
        .collect()
}

/// Insert the seed documents when the store is empty.
///
/// Returns how many documents were inserted (zero if the store already had data).
pub async fn seed_if_empty(store: &dyn DocumentStore) -> AppResult<usize> {
    let existing = store.count().await?;
    if existing > 0 {
        tracing::debug!("Store already holds {} documents; skipping seed", existing);
        return Ok(0);
    }

    tracing::info!("Seeding empty document store");
    store.add_documents(seed_documents()).await
}
