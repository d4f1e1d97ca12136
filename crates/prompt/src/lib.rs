//! Prompt system for ragline.
//!
//! This crate provides structured prompt management with:
//! - YAML-based prompt definitions
//! - Handlebars template rendering
//! - Built-in validation and synthesis prompts, overridable from a directory

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{
    list_prompts, load_prompt, PromptLibrary, SYNTHESIZE_PROMPT_ID, VALIDATE_PROMPT_ID,
};
pub use types::{BuiltPrompt, PromptDefinition};
