//! LLM integration crate for ragline.
//!
//! This crate provides a provider-agnostic abstraction for interacting with
//! Large Language Models (LLMs). Every provider implements [`LlmClient`];
//! the pipeline talks to a [`LanguageModel`], which binds a client to one
//! model and sampling temperature.
//!
//! # Providers
//! - **OpenAI**: Chat Completions API
//! - **Gemini**: Google Generative Language API
//! - **Ollama**: Local LLM runtime
//!
//! # Example
//! ```no_run
//! use ragline_llm::{LanguageModel, providers::OllamaClient};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let model = LanguageModel::new(Arc::new(OllamaClient::new()), "llama3.2");
//! let answer = model.generate("You are terse.", "Hello, world!").await?;
//! println!("{}", answer);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod model;
pub mod providers;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::{create_client, create_model};
pub use model::LanguageModel;
pub use providers::{GeminiClient, OllamaClient, OpenAiClient};
