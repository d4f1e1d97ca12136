//! Fixed retrieve → validate → synthesize flow over one state.

use crate::stages::{RetrievalStage, Stage, SynthesisStage, ValidationStage};
use crate::state::PipelineState;
use ragline_core::AppResult;
use ragline_knowledge::DocumentStore;
use ragline_llm::LanguageModel;
use ragline_prompt::PromptLibrary;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// The orchestrator. Holds no per-request state, so one instance can be
/// shared behind an `Arc` by concurrent requests.
pub struct Pipeline {
    retrieval: RetrievalStage,
    validation: ValidationStage,
    synthesis: SynthesisStage,
}

impl Pipeline {
    /// Wire the three stages. Both model-backed stages share `model`.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        model: LanguageModel,
        prompts: &PromptLibrary,
        top_k: usize,
    ) -> AppResult<Self> {
        Ok(Self {
            retrieval: RetrievalStage::new(store, top_k),
            validation: ValidationStage::new(model.clone(), prompts)?,
            synthesis: SynthesisStage::new(model, prompts)?,
        })
    }

    /// Run the pipeline for a query and return the final state.
    pub async fn invoke(&self, query: impl Into<String>) -> AppResult<PipelineState> {
        self.invoke_state(PipelineState::new(query)).await
    }

    /// Run the pipeline from a caller-built initial state.
    pub async fn invoke_state(&self, state: PipelineState) -> AppResult<PipelineState> {
        let started = Instant::now();

        let state = run_stage(&self.retrieval, state).await?;
        let state = run_stage(&self.validation, state).await?;
        let state = run_stage(&self.synthesis, state).await?;

        tracing::info!(
            "Pipeline finished in {:.2}s",
            started.elapsed().as_secs_f64()
        );

        Ok(state)
    }
}

async fn run_stage(stage: &dyn Stage, state: PipelineState) -> AppResult<PipelineState> {
    let span = tracing::info_span!("stage", name = stage.name());

    async move {
        let started = Instant::now();
        let from = state.phase();

        let state = stage.run(state).await.inspect_err(|e| {
            tracing::error!("Stage failed: {}", e);
        })?;

        tracing::debug!(
            "{} -> {} in {}ms",
            from,
            state.phase(),
            started.elapsed().as_millis()
        );
        Ok(state)
    }
    .instrument(span)
    .await
}
