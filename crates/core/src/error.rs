//! Error types for ragline.
//!
//! One enum covers every failure the pipeline can surface: missing input,
//! upstream model and store failures, startup configuration problems, and
//! the ambient I/O, prompt and serialization errors.

use thiserror::Error;

/// Unified error type for ragline.
///
/// All fallible functions return `Result<T, AppError>`. Collaborator
/// failures are never recovered inside a stage; they bubble up to the
/// caller unchanged.
#[derive(Error, Debug)]
pub enum AppError {
    /// The query was absent or empty when the pipeline started
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// The language model call failed (network, status, malformed reply)
    #[error("Upstream model error: {0}")]
    UpstreamModel(String),

    /// The document store or its embedding backend failed
    #[error("Upstream store error: {0}")]
    UpstreamStore(String),

    /// No usable provider, unreadable config file, bad log filter
    #[error("Configuration error: {0}")]
    Config(String),

    /// Prompt definition missing, invalid or failed to render
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Whether the error was caused by the caller's input rather than by
    /// the service or one of its collaborators.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::MissingInput(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
