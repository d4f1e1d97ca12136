//! A client bound to a model and sampling settings.

use crate::client::{LlmClient, LlmRequest};
use ragline_core::AppResult;
use std::sync::Arc;

/// Language model handle used by the pipeline stages.
///
/// Wraps a provider client together with the model identifier and
/// temperature chosen at startup, and exposes the two-argument
/// `generate(system, user)` contract the stages rely on. Cloning is cheap.
#[derive(Clone)]
pub struct LanguageModel {
    client: Arc<dyn LlmClient>,
    model: String,
    temperature: Option<f32>,
}

impl std::fmt::Debug for LanguageModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageModel")
            .field("provider", &self.client.provider_name())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl LanguageModel {
    /// Bind a client to a model, using the provider's default temperature.
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            temperature: None,
        }
    }

    /// Set the sampling temperature sent with every request.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn provider_name(&self) -> &str {
        self.client.provider_name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send system instructions and a user message, return the generated text.
    pub async fn generate(&self, system: &str, user: &str) -> AppResult<String> {
        let mut request = LlmRequest::new(user, &self.model).with_system(system);
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }

        let response = self.client.complete(&request).await?;

        tracing::debug!(
            "Token usage - Prompt: {}, Completion: {}, Total: {}",
            response.usage.prompt_tokens,
            response.usage.completion_tokens,
            response.usage.total_tokens
        );

        Ok(response.content)
    }
}
