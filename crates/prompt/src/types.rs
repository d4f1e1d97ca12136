//! Prompt types for ragline.
//!
//! This module defines the domain entities for the prompt system.

use serde::{Deserialize, Serialize};

/// A prompt definition loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// System instructions, rendered with the same variables as the template
    #[serde(default)]
    pub system: String,

    /// User message template with Handlebars syntax
    pub template: String,
}

/// A fully rendered prompt ready for LLM execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// System message
    pub system: String,

    /// User message
    pub user: String,

    /// Source prompt ID
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,
}

impl BuiltPrompt {
    /// Create a new built prompt.
    pub fn new(
        system: impl Into<String>,
        user: impl Into<String>,
        source_prompt_id: impl Into<String>,
    ) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            source_prompt_id: source_prompt_id.into(),
        }
    }
}
