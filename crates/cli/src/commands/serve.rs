//! Serve command handler.

use crate::bootstrap::build_pipeline;
use crate::server;
use clap::Args;
use ragline_core::{config::AppConfig, AppResult};
use std::sync::Arc;

/// Run the HTTP pipeline endpoint
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Address to bind (overrides RAGLINE_HOST / server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides RAGLINE_PORT / server.port)
    #[arg(long)]
    pub port: Option<u16>,
}

impl ServeCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        config.validate()?;

        let host = self.host.as_deref().unwrap_or(&config.host);
        let port = self.port.unwrap_or(config.port);

        let pipeline = build_pipeline(config).await?;
        server::run(Arc::new(pipeline), host, port).await
    }
}
