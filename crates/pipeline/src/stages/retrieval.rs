//! Retrieval: fetch the top-k passages for the query.

use super::Stage;
use crate::state::PipelineState;
use ragline_core::{AppError, AppResult};
use ragline_knowledge::DocumentStore;
use std::sync::Arc;

pub struct RetrievalStage {
    store: Arc<dyn DocumentStore>,
    top_k: usize,
}

impl RetrievalStage {
    pub fn new(store: Arc<dyn DocumentStore>, top_k: usize) -> Self {
        Self { store, top_k }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }
}

#[async_trait::async_trait]
impl Stage for RetrievalStage {
    fn name(&self) -> &'static str {
        "retrieval"
    }

    async fn run(&self, mut state: PipelineState) -> AppResult<PipelineState> {
        if state.query().trim().is_empty() {
            return Err(AppError::MissingInput("query is required".to_string()));
        }

        let documents = self.store.search(state.query(), self.top_k).await?;
        let docs: Vec<String> = documents.into_iter().map(|d| d.text).collect();

        tracing::info!("Retrieved {} passages (k={})", docs.len(), self.top_k);

        state.retrieved_docs = Some(docs);
        Ok(state)
    }
}
