//! The three pipeline stages.
//!
//! Each stage owns the state for the duration of its call, fills in one
//! field and returns it. Collaborator failures are never caught here.

pub mod retrieval;
pub mod synthesis;
pub mod validation;

pub use retrieval::RetrievalStage;
pub use synthesis::{synthesis_context, SynthesisStage, NO_CONTEXT};
pub use validation::{format_contexts, parse_validated, ValidationStage};

use crate::state::PipelineState;
use ragline_core::AppResult;

/// One step of the pipeline.
#[async_trait::async_trait]
pub trait Stage: Send + Sync {
    /// Name used for tracing spans and logs.
    fn name(&self) -> &'static str;

    async fn run(&self, state: PipelineState) -> AppResult<PipelineState>;
}
