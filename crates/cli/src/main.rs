//! ragline CLI
//!
//! Main entry point for the ragline tool.
//! Serves the retrieve → validate → synthesize pipeline over HTTP and runs
//! it from the command line.

mod bootstrap;
mod commands;
mod server;

use clap::{Parser, Subcommand};
use commands::{AskCommand, SeedCommand, ServeCommand};
use ragline_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// ragline - retrieval-augmented answers with LLM validation
#[derive(Parser, Debug)]
#[command(name = "ragline")]
#[command(about = "Retrieve, validate and synthesize answers with an LLM", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file (default: ./ragline.yaml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level or filter directive (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// LLM provider (openai, gemini, ollama)
    #[arg(short, long, global = true)]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP pipeline endpoint
    Serve(ServeCommand),

    /// Run the pipeline once for a query
    Ask(AskCommand),

    /// Seed the document store
    Seed(SeedCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Defaults, config file, .env and environment
    let config = AppConfig::load(cli.config.as_deref())?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
        cli.log_json,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color, config.log_json)?;

    tracing::info!("ragline starting");
    if let Some(ref path) = config.config_file {
        tracing::debug!("Config file: {:?}", path);
    }
    tracing::debug!("Store: {:?} (collection: {})", config.store_dir, config.collection);

    let command_name = match &cli.command {
        Commands::Serve(_) => "serve",
        Commands::Ask(_) => "ask",
        Commands::Seed(_) => "seed",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Serve(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Seed(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
