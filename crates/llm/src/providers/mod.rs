//! LLM provider implementations.

pub mod gemini;
pub mod ollama;
pub mod openai;

pub use gemini::GeminiClient;
pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

use ragline_core::AppError;

/// Turn a non-success HTTP response into an upstream model error.
pub(crate) async fn status_error(provider: &str, response: reqwest::Response) -> AppError {
    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    AppError::UpstreamModel(format!(
        "{} API error ({}): {}",
        provider, status, error_text
    ))
}
