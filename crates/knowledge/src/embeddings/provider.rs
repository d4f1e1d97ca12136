//! Embedding provider trait and factory.

use ragline_core::{AppError, AppResult, EmbeddingBackend, EmbeddingSettings};
use std::sync::Arc;

use super::providers::{GeminiEmbeddings, OpenAiEmbeddings, TrigramProvider};

/// Dimensions used by the local trigram provider.
pub const TRIGRAM_DIMENSIONS: usize = 384;

/// Trait for embedding providers.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "openai", "gemini", "trigram")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Generate embeddings for multiple texts in a batch.
    ///
    /// Returns one vector per input, in input order.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::UpstreamStore("No embedding returned".to_string()))
    }
}

/// Create an embedding provider from resolved settings.
///
/// # Errors
/// Returns `AppError::Config` when a remote backend has no API key.
pub fn create_provider(settings: &EmbeddingSettings) -> AppResult<Arc<dyn EmbeddingProvider>> {
    let require_key = |name: &str| {
        settings
            .api_key
            .clone()
            .ok_or_else(|| AppError::Config(format!("{} embeddings require an API key", name)))
    };

    let provider: Arc<dyn EmbeddingProvider> = match settings.backend {
        EmbeddingBackend::OpenAI => Arc::new(OpenAiEmbeddings::new(
            require_key("OpenAI")?,
            &settings.model,
        )),
        EmbeddingBackend::Gemini => Arc::new(GeminiEmbeddings::new(
            require_key("Gemini")?,
            &settings.model,
        )),
        EmbeddingBackend::Trigram => Arc::new(TrigramProvider::new(TRIGRAM_DIMENSIONS)),
    };

    tracing::info!(
        "Using embedding provider '{}' (model: {})",
        provider.provider_name(),
        provider.model_name()
    );

    Ok(provider)
}
