//! Ask command handler.
//!
//! Runs the pipeline once, the same way `POST /pipeline` does.

use crate::bootstrap::build_pipeline;
use clap::Args;
use ragline_core::{config::AppConfig, AppError, AppResult};
use ragline_pipeline::PipelineState;

/// Run the pipeline once for a query
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub query: String,

    /// Print the full pipeline state as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        config.validate()?;

        let pipeline = build_pipeline(config).await?;
        let state = pipeline.invoke(self.query.as_str()).await?;

        println!("{}", render(&state, self.json)?);
        Ok(())
    }
}

fn render(state: &PipelineState, json: bool) -> AppResult<String> {
    if json {
        return Ok(serde_json::to_string_pretty(state)?);
    }

    state
        .answer
        .clone()
        .ok_or_else(|| AppError::UpstreamModel("Pipeline finished without an answer".to_string()))
}
