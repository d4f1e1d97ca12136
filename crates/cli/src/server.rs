//! HTTP surface: a single `POST /pipeline` endpoint built on axum.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use ragline_core::{AppError, AppResult};
use ragline_pipeline::{Pipeline, PipelineState};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared, read-only pipeline handle.
pub type SharedPipeline = Arc<Pipeline>;

/// Request body for `POST /pipeline`.
///
/// A missing `query` is reported by the pipeline as missing input rather
/// than rejected by the JSON extractor, so both cases map to 400.
#[derive(Debug, Deserialize)]
pub struct PipelineRequest {
    #[serde(default)]
    pub query: Option<String>,
}

/// Error wrapper that renders `{"error": "..."}` with a status from the error kind.
pub struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            tracing::error!("Pipeline request failed: {}", self.0);
        } else {
            tracing::warn!("Rejected pipeline request: {}", self.0);
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

/// Build the axum Router with the `/pipeline` route.
pub fn router(pipeline: SharedPipeline) -> Router {
    Router::new()
        .route("/pipeline", post(pipeline_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(pipeline)
}

async fn pipeline_handler(
    State(pipeline): State<SharedPipeline>,
    Json(request): Json<PipelineRequest>,
) -> Result<Json<PipelineState>, ApiError> {
    let query = request.query.unwrap_or_default();
    let state = pipeline.invoke(query).await?;
    Ok(Json(state))
}

/// Bind `host:port` and serve until the process is stopped.
pub async fn run(pipeline: SharedPipeline, host: &str, port: u16) -> AppResult<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(pipeline)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use ragline_knowledge::{Document, DocumentStore};
    use ragline_llm::{LanguageModel, LlmClient, LlmRequest, LlmResponse, LlmUsage};
    use ragline_prompt::PromptLibrary;
    use tower::ServiceExt;

    /// Answers every request with a fixed reply, or fails when `reply` is `None`.
    struct FixedLlm {
        reply: Option<&'static str>,
    }

    #[async_trait::async_trait]
    impl LlmClient for FixedLlm {
        fn provider_name(&self) -> &str {
            "fixed"
        }

        async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
            match self.reply {
                Some(reply) => Ok(LlmResponse {
                    content: reply.to_string(),
                    model: request.model.clone(),
                    usage: LlmUsage::default(),
                }),
                None => Err(AppError::UpstreamModel("model unavailable".to_string())),
            }
        }
    }

    struct FixedStore(Vec<&'static str>);

    #[async_trait::async_trait]
    impl DocumentStore for FixedStore {
        async fn search(&self, _query: &str, k: usize) -> AppResult<Vec<Document>> {
            Ok(self
                .0
                .iter()
                .take(k)
                .map(|text| Document::new(*text, serde_json::json!({})))
                .collect())
        }

        async fn count(&self) -> AppResult<usize> {
            Ok(self.0.len())
        }

        async fn add_documents(&self, _documents: Vec<Document>) -> AppResult<usize> {
            Ok(0)
        }
    }

    fn app(passages: Vec<&'static str>, reply: Option<&'static str>) -> Router {
        let model = LanguageModel::new(Arc::new(FixedLlm { reply }), "fixed-model");
        let prompts = PromptLibrary::builtin().unwrap();
        let pipeline =
            Pipeline::new(Arc::new(FixedStore(passages)), model, &prompts, 4).unwrap();
        router(Arc::new(pipeline))
    }

    fn post_json(body: &str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method("POST")
            .uri("/pipeline")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, req: axum::http::Request<Body>) -> (StatusCode, serde_json::Value) {
        let resp = ServiceExt::<axum::http::Request<Body>>::oneshot(app, req)
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), 100_000)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null))
    }

    #[test]
    fn test_router_builds() {
        let _app = app(vec![], Some("ok"));
    }

    #[tokio::test]
    async fn test_pipeline_endpoint_returns_state() {
        let app = app(
            vec!["Agentic AI plans.", "LangGraph orchestrates."],
            Some("1. Agentic AI plans."),
        );

        let (status, json) = send(app, post_json(r#"{"query": "What is agentic AI?"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["query"], "What is agentic AI?");
        assert_eq!(
            json["retrieved_docs"],
            serde_json::json!(["Agentic AI plans.", "LangGraph orchestrates."])
        );
        assert_eq!(json["validated_docs"], serde_json::json!(["1. Agentic AI plans."]));
        assert_eq!(json["answer"], "1. Agentic AI plans.");
    }

    #[tokio::test]
    async fn test_empty_store_returns_empty_lists() {
        let app = app(vec![], Some("No context found."));
        let (status, json) = send(app, post_json(r#"{"query": "q"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["retrieved_docs"], serde_json::json!([]));
        assert_eq!(json["validated_docs"], serde_json::json!([]));
        assert_eq!(json["answer"], "No context found.");
    }

    #[tokio::test]
    async fn test_missing_query_is_bad_request() {
        for body in [r#"{}"#, r#"{"query": ""}"#, r#"{"query": "   "}"#] {
            let (status, json) = send(app(vec!["p"], Some("a")), post_json(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
            assert!(json["error"].as_str().unwrap().contains("query is required"));
        }
    }

    #[tokio::test]
    async fn test_model_failure_is_server_error() {
        let (status, json) = send(app(vec!["p"], None), post_json(r#"{"query": "q"}"#)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].as_str().unwrap().contains("model unavailable"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let (status, _) = send(app(vec!["p"], Some("a")), post_json("not json")).await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_get_is_not_allowed() {
        let req = axum::http::Request::builder()
            .uri("/pipeline")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app(vec![], Some("a")), req).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
