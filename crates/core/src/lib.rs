//! Ragline Core Library
//!
//! This crate provides the foundational utilities shared by every ragline crate:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration loading and provider resolution

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, EmbeddingBackend, EmbeddingSettings, LlmBackend, LlmSettings};
pub use error::{AppError, AppResult};
