//! Synthesis: compose the final answer from the best available context.

use super::Stage;
use crate::state::PipelineState;
use ragline_core::AppResult;
use ragline_llm::LanguageModel;
use ragline_prompt::{build_prompt, PromptDefinition, PromptLibrary, SYNTHESIZE_PROMPT_ID};
use std::collections::HashMap;

/// Context sent when neither validated nor retrieved passages exist.
pub const NO_CONTEXT: &str = "NO CONTEXT";

pub struct SynthesisStage {
    model: LanguageModel,
    prompt: PromptDefinition,
}

impl SynthesisStage {
    /// Fails if the prompt library has no synthesis prompt.
    pub fn new(model: LanguageModel, prompts: &PromptLibrary) -> AppResult<Self> {
        Ok(Self {
            model,
            prompt: prompts.get(SYNTHESIZE_PROMPT_ID)?.clone(),
        })
    }
}

/// Validated passages if any, else retrieved passages, else [`NO_CONTEXT`].
pub fn synthesis_context(state: &PipelineState) -> String {
    let non_empty = |docs: &Option<Vec<String>>| {
        docs.as_ref()
            .filter(|docs| !docs.is_empty())
            .map(|docs| docs.join("\n"))
    };

    non_empty(&state.validated_docs)
        .or_else(|| non_empty(&state.retrieved_docs))
        .unwrap_or_else(|| NO_CONTEXT.to_string())
}

#[async_trait::async_trait]
impl Stage for SynthesisStage {
    fn name(&self) -> &'static str {
        "synthesis"
    }

    async fn run(&self, mut state: PipelineState) -> AppResult<PipelineState> {
        let context = synthesis_context(&state);
        if context == NO_CONTEXT {
            tracing::info!("Synthesizing without context");
        }

        let mut variables = HashMap::new();
        variables.insert("query".to_string(), state.query().to_string());
        variables.insert("context".to_string(), context);
        let prompt = build_prompt(&self.prompt, &variables)?;

        let answer = self.model.generate(&prompt.system, &prompt.user).await?;

        tracing::info!("Synthesized answer ({} chars)", answer.len());

        state.answer = Some(answer);
        Ok(state)
    }
}
