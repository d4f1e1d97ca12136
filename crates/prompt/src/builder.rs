//! Prompt builder for rendering templates.

use crate::types::{BuiltPrompt, PromptDefinition};
use handlebars::Handlebars;
use ragline_core::{AppError, AppResult};
use std::collections::HashMap;

/// Build a prompt from a definition and input variables.
///
/// Both the system instructions and the user template are rendered with
/// Handlebars against the same variables. HTML escaping is disabled, so
/// passages reach the model byte for byte.
///
/// # Example
/// ```no_run
/// use ragline_prompt::{build_prompt, PromptLibrary, VALIDATE_PROMPT_ID};
/// use std::collections::HashMap;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let library = PromptLibrary::builtin()?;
/// let mut vars = HashMap::new();
/// vars.insert("query".to_string(), "What is agentic AI?".to_string());
/// vars.insert("contexts".to_string(), "[1] Agentic AI plans.".to_string());
///
/// let built = build_prompt(library.get(VALIDATE_PROMPT_ID)?, &vars)?;
/// println!("User prompt: {}", built.user);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    variables: &HashMap<String, String>,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    let system = render_template(&definition.system, variables)?;
    let user = render_template(&definition.template, variables)?;

    Ok(BuiltPrompt::new(system, user, definition.id.clone()))
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{PromptLibrary, SYNTHESIZE_PROMPT_ID, VALIDATE_PROMPT_ID};

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_simple_template() {
        let result = render_template("Question: {{query}}", &vars(&[("query", "Hello")]));
        assert_eq!(result.unwrap(), "Question: Hello");
    }

    #[test]
    fn test_render_does_not_escape() {
        let result = render_template(
            "{{context}}",
            &vars(&[("context", "retrieve -> validate & <synthesize>")]),
        );
        assert_eq!(result.unwrap(), "retrieve -> validate & <synthesize>");
    }

    #[test]
    fn test_render_template_missing_variable() {
        // Handlebars renders missing variables as empty string
        let result = render_template("Question: {{missing}}", &HashMap::new());
        assert_eq!(result.unwrap(), "Question: ");
    }

    #[test]
    fn test_render_invalid_template() {
        let result = render_template("{{#if}}", &HashMap::new());
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }

    #[test]
    fn test_builtin_validation_prompt() {
        let library = PromptLibrary::builtin().unwrap();
        let built = build_prompt(
            library.get(VALIDATE_PROMPT_ID).unwrap(),
            &vars(&[("query", "What is X?"), ("contexts", "[1] A\n\n[2] B")]),
        )
        .unwrap();

        assert_eq!(
            built.user,
            "User query: What is X?\n\nContext passages:\n[1] A\n\n[2] B\n"
        );
        assert!(built
            .system
            .starts_with("You are a strict fact-checking assistant."));
        assert!(built.system.ends_with("Return them as a numbered list."));
        assert_eq!(built.source_prompt_id, VALIDATE_PROMPT_ID);
    }

    #[test]
    fn test_builtin_synthesis_prompt() {
        let library = PromptLibrary::builtin().unwrap();
        let built = build_prompt(
            library.get(SYNTHESIZE_PROMPT_ID).unwrap(),
            &vars(&[("query", "What is X?"), ("context", "NO CONTEXT")]),
        )
        .unwrap();

        assert_eq!(
            built.user,
            "User question: What is X?\n\nValidated context:\nNO CONTEXT\n\nWrite a structured answer."
        );
        assert!(built
            .system
            .starts_with("You are a senior research assistant."));
    }
}
