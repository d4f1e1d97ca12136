//! Prompt loader for YAML prompt definitions.
//!
//! The pipeline's own prompts ship inside the binary. A prompts directory
//! may override any of them by id with a `<id>.yml` file.

use crate::types::PromptDefinition;
use ragline_core::{AppError, AppResult};
use std::collections::HashMap;
use std::path::Path;

/// Prompt used by the validation stage.
pub const VALIDATE_PROMPT_ID: &str = "pipeline.validate";

/// Prompt used by the synthesis stage.
pub const SYNTHESIZE_PROMPT_ID: &str = "pipeline.synthesize";

const BUILTIN_PROMPTS: &[(&str, &str)] = &[
    (
        "pipeline.validate.yml",
        include_str!("../prompts/pipeline.validate.yml"),
    ),
    (
        "pipeline.synthesize.yml",
        include_str!("../prompts/pipeline.synthesize.yml"),
    ),
];

/// Load a prompt definition by ID from a prompts directory.
///
/// This function looks for a file named `<id>.yml` in `prompts_dir`.
///
/// # Returns
/// A parsed `PromptDefinition` or an error if not found/invalid.
pub fn load_prompt(prompts_dir: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir.join(format!("{}.yml", prompt_id));

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    if !prompt_file.exists() {
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            prompt_file
        )));
    }

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition = parse_prompt(&contents, &prompt_file.display().to_string())?;

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// List all prompt IDs available in a prompts directory.
pub fn list_prompts(prompts_dir: &Path) -> AppResult<Vec<String>> {
    if !prompts_dir.exists() {
        return Ok(Vec::new());
    }

    let mut prompt_ids = Vec::new();

    for entry in walkdir::WalkDir::new(prompts_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yml") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                prompt_ids.push(stem.to_string());
            }
        }
    }

    prompt_ids.sort();
    Ok(prompt_ids)
}

fn parse_prompt(contents: &str, origin: &str) -> AppResult<PromptDefinition> {
    let definition: PromptDefinition = serde_yaml::from_str(contents).map_err(|e| {
        AppError::Prompt(format!("Failed to parse prompt YAML {}: {}", origin, e))
    })?;

    validate_prompt(&definition)?;
    Ok(definition)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.api_version.is_empty() {
        return Err(AppError::Prompt(
            "Prompt apiVersion cannot be empty".to_string(),
        ));
    }

    if def.template.is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    // Validate API version format (simple check)
    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    Ok(())
}

/// The set of prompt definitions available to the pipeline, keyed by id.
#[derive(Debug, Clone)]
pub struct PromptLibrary {
    prompts: HashMap<String, PromptDefinition>,
}

impl PromptLibrary {
    /// Library containing only the built-in definitions.
    pub fn builtin() -> AppResult<Self> {
        let mut prompts = HashMap::new();
        for (name, contents) in BUILTIN_PROMPTS {
            let definition = parse_prompt(contents, name)?;
            prompts.insert(definition.id.clone(), definition);
        }
        Ok(Self { prompts })
    }

    /// Built-in definitions, overridden by any `<id>.yml` in `prompts_dir`.
    pub fn load(prompts_dir: Option<&Path>) -> AppResult<Self> {
        let mut library = Self::builtin()?;

        if let Some(dir) = prompts_dir {
            for prompt_id in list_prompts(dir)? {
                let definition = load_prompt(dir, &prompt_id)?;
                if definition.id != prompt_id {
                    tracing::warn!(
                        "Prompt file {}.yml declares id '{}'; registering under the declared id",
                        prompt_id,
                        definition.id
                    );
                }
                if library.prompts.contains_key(&definition.id) {
                    tracing::info!("Overriding built-in prompt: {}", definition.id);
                }
                library.prompts.insert(definition.id.clone(), definition);
            }
        }

        Ok(library)
    }

    /// Look up a definition by id.
    pub fn get(&self, prompt_id: &str) -> AppResult<&PromptDefinition> {
        self.prompts
            .get(prompt_id)
            .ok_or_else(|| AppError::Prompt(format!("Unknown prompt: {}", prompt_id)))
    }

    /// Sorted ids of every registered prompt.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.prompts.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
