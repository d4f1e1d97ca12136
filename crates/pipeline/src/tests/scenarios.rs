//! Full pipeline runs covering the seeded, empty and failing paths.

use super::mocks::{ScriptedLlm, StaticStore};
use crate::orchestrator::Pipeline;
use crate::stages::NO_CONTEXT;
use crate::state::{PipelinePhase, PipelineState};
use ragline_core::AppError;
use ragline_knowledge::embeddings::providers::TrigramProvider;
use ragline_knowledge::{seed_if_empty, DocumentStore, SqliteStore, SEED_COLLECTION};
use ragline_prompt::PromptLibrary;
use std::sync::Arc;
use tempfile::TempDir;

const QUERY: &str = "How do agentic AI pipelines retrieve, validate and synthesize?";

fn pipeline(store: Arc<dyn DocumentStore>, llm: &Arc<ScriptedLlm>) -> Pipeline {
    let prompts = PromptLibrary::builtin().unwrap();
    Pipeline::new(store, llm.model(), &prompts, 4).unwrap()
}

async fn seeded_store(dir: &TempDir) -> Arc<SqliteStore> {
    let store = SqliteStore::open(
        dir.path(),
        SEED_COLLECTION,
        Arc::new(TrigramProvider::new(384)),
    )
    .unwrap();
    seed_if_empty(&store).await.unwrap();
    Arc::new(store)
}

#[tokio::test]
async fn test_seeded_store_full_run() {
    let temp_dir = TempDir::new().unwrap();
    let store = seeded_store(&temp_dir).await;
    let llm = ScriptedLlm::new(vec![
        Ok("Passages: filtered\n1. Agentic AI refers to LLM-based systems.\n\n2. Multi-agent workflows follow retrieve -> validate -> synthesize."),
        Ok("## Answer\nAgentic pipelines retrieve, validate, then synthesize."),
    ]);

    let state = pipeline(store, &llm).invoke(QUERY).await.unwrap();

    assert_eq!(state.phase(), PipelinePhase::Done);
    assert_eq!(state.query(), QUERY);

    let retrieved = state.retrieved_docs.as_ref().unwrap();
    assert_eq!(retrieved.len(), 3);

    assert_eq!(
        state.validated_docs,
        Some(vec![
            "1. Agentic AI refers to LLM-based systems.".to_string(),
            "2. Multi-agent workflows follow retrieve -> validate -> synthesize.".to_string(),
        ])
    );
    assert!(!state.answer.as_deref().unwrap().is_empty());

    let requests = llm.requests();
    assert_eq!(requests.len(), 2);

    // Validation sees every retrieved passage, numbered, in retrieval order
    let validation = &requests[0];
    let expected_contexts = retrieved
        .iter()
        .enumerate()
        .map(|(i, doc)| format!("[{}] {}", i + 1, doc))
        .collect::<Vec<_>>()
        .join("\n\n");
    assert_eq!(
        validation.prompt,
        format!("User query: {}\n\nContext passages:\n{}\n", QUERY, expected_contexts)
    );
    assert!(validation
        .system
        .as_deref()
        .unwrap()
        .contains("Return ONLY the passages that are (1) on-topic and (2) non-contradictory."));
    assert_eq!(validation.temperature, Some(0.0));

    // Synthesis sees the validated lines joined by newlines
    assert_eq!(
        requests[1].prompt,
        format!(
            "User question: {}\n\nValidated context:\n{}\n\nWrite a structured answer.",
            QUERY,
            state.validated_docs.as_ref().unwrap().join("\n")
        )
    );
}

#[tokio::test]
async fn test_no_matches_synthesizes_without_context() {
    let store = StaticStore::new(&[]);
    let llm = ScriptedLlm::new(vec![Ok("I could not find supporting context, but ...")]);

    let state = pipeline(store.clone(), &llm).invoke(QUERY).await.unwrap();

    assert_eq!(state.retrieved_docs, Some(vec![]));
    assert_eq!(state.validated_docs, Some(vec![]));
    assert!(!state.answer.as_deref().unwrap().is_empty());
    assert_eq!(store.queries(), vec![(QUERY.to_string(), 4)]);

    // Validation is skipped, so the only call is synthesis
    let requests = llm.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0]
        .prompt
        .contains(&format!("Validated context:\n{}\n", NO_CONTEXT)));
}

#[tokio::test]
async fn test_validation_failure_stops_pipeline() {
    let store = StaticStore::new(&["passage one", "passage two"]);
    let llm = ScriptedLlm::new(vec![Err("503 Service Unavailable"), Ok("never used")]);

    let result = pipeline(store, &llm).invoke(QUERY).await;

    match result {
        Err(AppError::UpstreamModel(msg)) => assert!(msg.contains("503")),
        other => panic!("Expected upstream model error, got {:?}", other),
    }
    // Synthesis never ran
    assert_eq!(llm.requests().len(), 1);
}

#[tokio::test]
async fn test_empty_validation_falls_back_to_retrieved() {
    let store = StaticStore::new(&["alpha", "beta"]);
    let llm = ScriptedLlm::new(vec![Ok("Passages:\n\n   \n"), Ok("answer")]);

    let state = pipeline(store, &llm).invoke(QUERY).await.unwrap();

    assert_eq!(state.validated_docs, Some(vec![]));
    let requests = llm.requests();
    assert!(requests[1].prompt.contains("Validated context:\nalpha\nbeta\n\n"));
}

#[tokio::test]
async fn test_blank_query_is_missing_input() {
    let store = StaticStore::new(&["alpha"]);
    let llm = ScriptedLlm::new(vec![]);

    let result = pipeline(store.clone(), &llm).invoke("   ").await;

    assert!(matches!(result, Err(AppError::MissingInput(_))));
    assert!(store.queries().is_empty());
    assert!(llm.requests().is_empty());
}

#[tokio::test]
async fn test_store_failure_propagates() {
    let llm = ScriptedLlm::new(vec![]);

    let result = pipeline(StaticStore::failing(), &llm).invoke(QUERY).await;

    assert!(matches!(result, Err(AppError::UpstreamStore(_))));
    assert!(llm.requests().is_empty());
}

#[tokio::test]
async fn test_top_k_limits_retrieval() {
    let store = StaticStore::new(&["a", "b", "c", "d", "e", "f"]);
    let llm = ScriptedLlm::new(vec![Ok("a"), Ok("answer")]);

    let state = pipeline(store, &llm).invoke(QUERY).await.unwrap();

    assert_eq!(state.retrieved_docs.unwrap().len(), 4);
}

#[tokio::test]
async fn test_invoke_state_recomputes_every_field() {
    let store = StaticStore::new(&["fresh passage"]);
    let llm = ScriptedLlm::new(vec![Ok("1. fresh passage"), Ok("answer")]);

    let mut initial = PipelineState::new(QUERY);
    initial.retrieved_docs = Some(vec!["stale".to_string()]);
    initial.answer = Some("stale".to_string());

    let state = pipeline(store, &llm).invoke_state(initial).await.unwrap();

    assert_eq!(state.retrieved_docs, Some(vec!["fresh passage".to_string()]));
    assert_eq!(state.validated_docs, Some(vec!["1. fresh passage".to_string()]));
    assert_eq!(state.answer.as_deref(), Some("answer"));
}

#[tokio::test]
async fn test_concurrent_invocations_are_independent() {
    let store = StaticStore::new(&["shared passage"]);
    let llm = ScriptedLlm::new(vec![Ok("kept"), Ok("kept"), Ok("answer"), Ok("answer")]);
    let pipeline = Arc::new(pipeline(store, &llm));

    let first = tokio::spawn({
        let pipeline = pipeline.clone();
        async move { pipeline.invoke("first query").await }
    });
    let second = tokio::spawn({
        let pipeline = pipeline.clone();
        async move { pipeline.invoke("second query").await }
    });

    let first = first.await.unwrap().unwrap();
    let second = second.await.unwrap().unwrap();

    assert_eq!(first.query(), "first query");
    assert_eq!(second.query(), "second query");
    assert_eq!(llm.requests().len(), 4);
}
