//! Scripted stand-ins for the language model and document store.

use ragline_core::{AppError, AppResult};
use ragline_knowledge::{Document, DocumentStore};
use ragline_llm::{LanguageModel, LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replies from a queue and records every request.
///
/// An `Err` entry fails that call with an upstream model error.
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<Result<&str, &str>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn model(self: &Arc<Self>) -> LanguageModel {
        LanguageModel::new(self.clone(), "scripted-model").with_temperature(0.0)
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedLlm {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.requests.lock().unwrap().push(request.clone());

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted reply left".to_string()));

        match reply {
            Ok(content) => Ok(LlmResponse {
                content,
                model: request.model.clone(),
                usage: LlmUsage::default(),
            }),
            Err(message) => Err(AppError::UpstreamModel(message)),
        }
    }
}

/// Returns a fixed passage list (truncated to `k`) and records queries.
pub struct StaticStore {
    passages: Vec<String>,
    queries: Mutex<Vec<(String, usize)>>,
    fail: bool,
}

impl StaticStore {
    pub fn new(passages: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            passages: passages.iter().map(|p| p.to_string()).collect(),
            queries: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            passages: Vec::new(),
            queries: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DocumentStore for StaticStore {
    async fn search(&self, query: &str, k: usize) -> AppResult<Vec<Document>> {
        self.queries.lock().unwrap().push((query.to_string(), k));

        if self.fail {
            return Err(AppError::UpstreamStore("store offline".to_string()));
        }

        Ok(self
            .passages
            .iter()
            .take(k)
            .map(|p| Document::new(p.clone(), serde_json::json!({})))
            .collect())
    }

    async fn count(&self) -> AppResult<usize> {
        Ok(self.passages.len())
    }

    async fn add_documents(&self, _documents: Vec<Document>) -> AppResult<usize> {
        Ok(0)
    }
}
