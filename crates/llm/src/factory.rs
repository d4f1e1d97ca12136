//! LLM provider factory.
//!
//! Builds clients from the settings resolved at startup. Secrets arrive
//! through [`LlmSettings`]; this module never reads the environment.

use crate::client::LlmClient;
use crate::model::LanguageModel;
use crate::providers::{GeminiClient, OllamaClient, OpenAiClient};
use ragline_core::{AppError, AppResult, LlmBackend, LlmSettings};
use std::sync::Arc;

/// Create an LLM client for the resolved backend.
///
/// # Errors
/// Returns `AppError::Config` if a backend that needs an API key has none.
pub fn create_client(settings: &LlmSettings) -> AppResult<Arc<dyn LlmClient>> {
    match settings.backend {
        LlmBackend::OpenAI => {
            let api_key = require_key(settings, "OpenAI")?;
            let client = match settings.endpoint.as_deref() {
                Some(endpoint) => OpenAiClient::with_base_url(api_key, endpoint),
                None => OpenAiClient::new(api_key),
            };
            Ok(Arc::new(client))
        }
        LlmBackend::Gemini => {
            let api_key = require_key(settings, "Gemini")?;
            let client = match settings.endpoint.as_deref() {
                Some(endpoint) => GeminiClient::with_base_url(api_key, endpoint),
                None => GeminiClient::new(api_key),
            };
            Ok(Arc::new(client))
        }
        LlmBackend::Ollama => {
            let client = match settings.endpoint.as_deref() {
                Some(endpoint) => OllamaClient::with_base_url(endpoint),
                None => OllamaClient::new(),
            };
            Ok(Arc::new(client))
        }
    }
}

/// Create a [`LanguageModel`] bound to the configured model and temperature.
pub fn create_model(settings: &LlmSettings) -> AppResult<LanguageModel> {
    let client = create_client(settings)?;

    tracing::info!(
        "Using LLM provider '{}' (model: {}, temperature: {})",
        client.provider_name(),
        settings.model,
        settings.temperature
    );

    Ok(LanguageModel::new(client, &settings.model).with_temperature(settings.temperature))
}

fn require_key<'a>(settings: &'a LlmSettings, provider: &str) -> AppResult<&'a str> {
    settings
        .api_key
        .as_deref()
        .ok_or_else(|| AppError::Config(format!("{} provider requires API key", provider)))
}
