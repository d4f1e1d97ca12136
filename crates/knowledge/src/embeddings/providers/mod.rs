//! Embedding provider implementations.

pub mod gemini;
pub mod openai;
pub mod trigram;

pub use gemini::GeminiEmbeddings;
pub use openai::OpenAiEmbeddings;
pub use trigram::TrigramProvider;

use ragline_core::AppError;

/// Turn a non-success HTTP response into a store error.
pub(crate) async fn status_error(provider: &str, response: reqwest::Response) -> AppError {
    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    AppError::UpstreamStore(format!(
        "{} embeddings API error ({}): {}",
        provider, status, error_text
    ))
}
