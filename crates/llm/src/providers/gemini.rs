//! Gemini LLM provider implementation.
//!
//! Uses the Generative Language API `generateContent` method:
//! https://ai.google.dev/api/generate-content

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use crate::providers::status_error;
use ragline_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

/// Gemini LLM client.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a new Gemini client against the public API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_GEMINI_URL)
    }

    /// Create a new Gemini client with a custom base URL.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint_url(&self, model: &str) -> String {
        // Accept both "gemini-1.5-flash" and "models/gemini-1.5-flash"
        let model = model.trim_start_matches("models/");
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    fn to_generate_request(&self, request: &LlmRequest) -> GenerateRequest {
        let text_content = |role: Option<&str>, text: &str| Content {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        };

        let generation_config = if request.temperature.is_some() || request.max_tokens.is_some()
        {
            Some(GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            })
        } else {
            None
        };

        GenerateRequest {
            system_instruction: request
                .system
                .as_deref()
                .map(|system| text_content(None, system)),
            contents: vec![text_content(Some("user"), &request.prompt)],
            generation_config,
        }
    }

    /// Concatenate the text parts of the first candidate.
    fn convert_response(&self, response: GenerateResponse, model: &str) -> AppResult<LlmResponse> {
        let content = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .ok_or_else(|| {
                AppError::UpstreamModel("Gemini response contained no candidates".to_string())
            })?;

        let text: String = content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        let usage = response
            .usage_metadata
            .map(|u| LlmUsage::new(u.prompt_token_count, u.candidates_token_count))
            .unwrap_or_default();

        Ok(LlmResponse {
            content: text,
            model: response.model_version.unwrap_or_else(|| model.to_string()),
            usage,
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for GeminiClient {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!("Sending completion request to Gemini (model: {})", request.model);

        let body = self.to_generate_request(request);
        let url = self.endpoint_url(&request.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::UpstreamModel(format!("Failed to send request to Gemini: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(status_error("Gemini", response).await);
        }

        let generate_response: GenerateResponse = response.json().await.map_err(|e| {
            AppError::UpstreamModel(format!("Failed to parse Gemini response: {}", e))
        })?;

        tracing::info!("Received completion from Gemini");

        self.convert_response(generate_response, &request.model)
    }
}
