//! Gemini embedding provider.
//!
//! Uses `batchEmbedContents`: https://ai.google.dev/api/embeddings

use super::status_error;
use crate::embeddings::provider::EmbeddingProvider;
use ragline_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
struct BatchRequest {
    requests: Vec<EmbedContentRequest>,
}

#[derive(Debug, Serialize)]
struct EmbedContentRequest {
    model: String,
    content: Content,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct BatchResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

/// Gemini embeddings client.
#[derive(Debug, Clone)]
pub struct GeminiEmbeddings {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    /// Fully qualified model name, e.g. `models/embedding-001`
    model: String,
}

impl GeminiEmbeddings {
    pub fn new(api_key: impl Into<String>, model: &str) -> Self {
        let model = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        };

        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_GEMINI_URL.to_string(),
            api_key: api_key.into(),
            model,
        }
    }

    fn batch_request(&self, texts: &[String]) -> BatchRequest {
        BatchRequest {
            requests: texts
                .iter()
                .map(|text| EmbedContentRequest {
                    model: self.model.clone(),
                    content: Content {
                        parts: vec![Part { text: text.clone() }],
                    },
                })
                .collect(),
        }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for GeminiEmbeddings {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!("Embedding {} texts with Gemini ({})", texts.len(), self.model);

        let url = format!("{}/{}:batchEmbedContents", self.base_url, self.model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.batch_request(texts))
            .send()
            .await
            .map_err(|e| {
                AppError::UpstreamStore(format!("Failed to send request to Gemini: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(status_error("Gemini", response).await);
        }

        let parsed: BatchResponse = response.json().await.map_err(|e| {
            AppError::UpstreamStore(format!("Failed to parse Gemini embeddings: {}", e))
        })?;

        if parsed.embeddings.len() != texts.len() {
            return Err(AppError::UpstreamStore(format!(
                "Gemini returned {} embeddings for {} inputs",
                parsed.embeddings.len(),
                texts.len()
            )));
        }

        Ok(parsed.embeddings.into_iter().map(|e| e.values).collect())
    }
}
