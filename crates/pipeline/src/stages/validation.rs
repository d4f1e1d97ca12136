//! Validation: ask the model to keep on-topic, non-contradictory passages.

use super::Stage;
use crate::state::PipelineState;
use ragline_core::AppResult;
use ragline_llm::LanguageModel;
use ragline_prompt::{build_prompt, PromptDefinition, PromptLibrary, VALIDATE_PROMPT_ID};
use std::collections::HashMap;

pub struct ValidationStage {
    model: LanguageModel,
    prompt: PromptDefinition,
}

impl ValidationStage {
    /// Fails if the prompt library has no validation prompt.
    pub fn new(model: LanguageModel, prompts: &PromptLibrary) -> AppResult<Self> {
        Ok(Self {
            model,
            prompt: prompts.get(VALIDATE_PROMPT_ID)?.clone(),
        })
    }
}

/// Number passages `[1] `, `[2] `, ... and separate them with a blank line.
pub fn format_contexts(docs: &[String]) -> String {
    docs.iter()
        .enumerate()
        .map(|(i, doc)| format!("[{}] {}", i + 1, doc))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Line separators recognised in model replies.
///
/// A `\r\n` pair splits into an empty segment, which is dropped as blank.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{1c}'
            | '\u{1d}'
            | '\u{1e}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Turn the model's free-text reply into the kept passages.
///
/// Every non-blank line is kept verbatim and in order, except header lines
/// starting with `passages:` (case-insensitive, after trimming). The reply
/// is not matched back against the numbered input.
pub fn parse_validated(response: &str) -> Vec<String> {
    response
        .split(is_line_break)
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.to_lowercase().starts_with("passages:")
        })
        .map(str::to_string)
        .collect()
}

#[async_trait::async_trait]
impl Stage for ValidationStage {
    fn name(&self) -> &'static str {
        "validation"
    }

    async fn run(&self, mut state: PipelineState) -> AppResult<PipelineState> {
        let docs = match state.retrieved_docs.as_deref() {
            Some(docs) if !docs.is_empty() => docs,
            _ => {
                tracing::info!("No passages to validate; skipping model call");
                state.validated_docs = Some(Vec::new());
                return Ok(state);
            }
        };

        let mut variables = HashMap::new();
        variables.insert("query".to_string(), state.query().to_string());
        variables.insert("contexts".to_string(), format_contexts(docs));
        let prompt = build_prompt(&self.prompt, &variables)?;

        let response = self.model.generate(&prompt.system, &prompt.user).await?;
        let validated = parse_validated(&response);

        tracing::info!(
            "Validation kept {} lines from {} passages",
            validated.len(),
            docs.len()
        );

        state.validated_docs = Some(validated);
        Ok(state)
    }
}
