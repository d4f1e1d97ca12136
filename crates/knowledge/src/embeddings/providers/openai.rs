//! OpenAI embedding provider.
//!
//! Uses the Embeddings API: https://platform.openai.com/docs/api-reference/embeddings

use super::status_error;
use crate::embeddings::provider::EmbeddingProvider;
use ragline_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

/// OpenAI embeddings client.
#[derive(Debug, Clone)]
pub struct OpenAiEmbeddings {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiEmbeddings {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_OPENAI_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Put vectors back in input order and check that none is missing.
    fn collect_embeddings(
        &self,
        response: EmbeddingResponse,
        expected: usize,
    ) -> AppResult<Vec<Vec<f32>>> {
        let mut data = response.data;
        data.sort_by_key(|d| d.index);

        if data.len() != expected {
            return Err(AppError::UpstreamStore(format!(
                "OpenAI returned {} embeddings for {} inputs",
                data.len(),
                expected
            )));
        }

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!("Embedding {} texts with OpenAI ({})", texts.len(), self.model);

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .await
            .map_err(|e| {
                AppError::UpstreamStore(format!("Failed to send request to OpenAI: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(status_error("OpenAI", response).await);
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(|e| {
            AppError::UpstreamStore(format!("Failed to parse OpenAI embeddings: {}", e))
        })?;

        self.collect_embeddings(parsed, texts.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let texts = vec!["a".to_string(), "b".to_string()];
        let json = serde_json::to_value(EmbeddingRequest {
            model: "text-embedding-3-large",
            input: &texts,
        })
        .unwrap();

        assert_eq!(json["model"], "text-embedding-3-large");
        assert_eq!(json["input"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn test_collect_restores_input_order() {
        let provider = OpenAiEmbeddings::new("sk", "text-embedding-3-large");
        let response: EmbeddingResponse = serde_json::from_value(serde_json::json!({
            "object": "list",
            "data": [
                {"object": "embedding", "index": 1, "embedding": [0.0, 1.0]},
                {"object": "embedding", "index": 0, "embedding": [1.0, 0.0]}
            ],
            "model": "text-embedding-3-large"
        }))
        .unwrap();

        let vectors = provider.collect_embeddings(response, 2).unwrap();
        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn test_collect_rejects_short_response() {
        let provider = OpenAiEmbeddings::new("sk", "text-embedding-3-large");
        let response: EmbeddingResponse =
            serde_json::from_value(serde_json::json!({"data": []})).unwrap();

        assert!(matches!(
            provider.collect_embeddings(response, 1),
            Err(AppError::UpstreamStore(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_batch_skips_request() {
        let provider = OpenAiEmbeddings::new("sk", "text-embedding-3-large");
        assert!(provider.embed_batch(&[]).await.unwrap().is_empty());
    }
}
