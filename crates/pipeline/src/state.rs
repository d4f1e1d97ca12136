//! The record threaded through every pipeline stage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of one pipeline run.
///
/// Created fresh per query. Each stage takes it by value, sets exactly one
/// field and hands it on. Fields a stage has not reached yet stay `None`
/// and serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    query: String,

    /// Passage texts from retrieval, best match first
    pub retrieved_docs: Option<Vec<String>>,

    /// Lines the validator kept, in response order
    pub validated_docs: Option<Vec<String>>,

    /// Raw model text from synthesis
    pub answer: Option<String>,
}

impl PipelineState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            retrieved_docs: None,
            validated_docs: None,
            answer: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Furthest stage this state has been through.
    pub fn phase(&self) -> PipelinePhase {
        if self.answer.is_some() {
            PipelinePhase::Done
        } else if self.validated_docs.is_some() {
            PipelinePhase::Validated
        } else if self.retrieved_docs.is_some() {
            PipelinePhase::Retrieved
        } else {
            PipelinePhase::Start
        }
    }
}

/// Position of a state in the fixed retrieve → validate → synthesize flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    Start,
    Retrieved,
    Validated,
    Done,
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelinePhase::Start => "start",
            PipelinePhase::Retrieved => "retrieved",
            PipelinePhase::Validated => "validated",
            PipelinePhase::Done => "done",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_at_start() {
        let state = PipelineState::new("What is agentic AI?");
        assert_eq!(state.query(), "What is agentic AI?");
        assert_eq!(state.phase(), PipelinePhase::Start);
    }

    #[test]
    fn test_phase_follows_fields() {
        let mut state = PipelineState::new("q");
        state.retrieved_docs = Some(vec![]);
        assert_eq!(state.phase(), PipelinePhase::Retrieved);
        state.validated_docs = Some(vec![]);
        assert_eq!(state.phase(), PipelinePhase::Validated);
        state.answer = Some("a".to_string());
        assert_eq!(state.phase(), PipelinePhase::Done);
        assert_eq!(state.phase().to_string(), "done");
    }

    #[test]
    fn test_absent_fields_serialize_as_null() {
        let json = serde_json::to_value(PipelineState::new("q")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "query": "q",
                "retrieved_docs": null,
                "validated_docs": null,
                "answer": null
            })
        );
    }

    #[test]
    fn test_deserialize_round_trips_query() {
        let state: PipelineState = serde_json::from_str(
            r#"{"query":"q","retrieved_docs":["a"],"validated_docs":null,"answer":null}"#,
        )
        .unwrap();
        assert_eq!(state.query(), "q");
        assert_eq!(state.retrieved_docs, Some(vec!["a".to_string()]));
    }
}
