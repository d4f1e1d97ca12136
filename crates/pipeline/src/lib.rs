//! Retrieve → validate → synthesize pipeline for ragline.
//!
//! [`Pipeline`] threads one [`PipelineState`] through three stages in a
//! fixed order:
//!
//! 1. **Retrieval** fetches the top-k passages from a [`DocumentStore`].
//! 2. **Validation** asks the model to keep on-topic, non-contradictory
//!    passages and parses its reply line by line.
//! 3. **Synthesis** asks the model for the final answer from the validated
//!    passages, falling back to the retrieved ones.
//!
//! [`DocumentStore`]: ragline_knowledge::DocumentStore

pub mod orchestrator;
pub mod stages;
pub mod state;

#[cfg(test)]
mod tests;

pub use orchestrator::Pipeline;
pub use stages::Stage;
pub use state::{PipelinePhase, PipelineState};
