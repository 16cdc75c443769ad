//! Prompt Renderer - Render templates with context variables using Handlebars
//!
//! This module provides the PromptRenderer struct which uses Handlebars to
//! render prompt templates. The built-in stage templates are registered on
//! construction.

use handlebars::Handlebars;
use serde::Serialize;

use super::templates;
use crate::error::{Result, TweetsmithError};

/// Renders prompt templates using Handlebars templating
pub struct PromptRenderer {
    handlebars: Handlebars<'static>,
}

impl std::fmt::Debug for PromptRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptRenderer").finish_non_exhaustive()
    }
}

impl Default for PromptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptRenderer {
    /// Create a renderer with the built-in stage templates registered
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        // Prompts are plain text; never HTML-escape
        handlebars.register_escape_fn(handlebars::no_escape);

        for (name, template) in templates::BUILTIN {
            // Built-ins are compile-time constants covered by tests below
            if let Err(e) = handlebars.register_template_string(name, template) {
                log::error!("built-in template '{}' failed to parse: {}", name, e);
            }
        }

        Self { handlebars }
    }

    /// Render a template string with any serializable context
    pub fn render_with<T: Serialize>(&self, template: &str, context: &T) -> Result<String> {
        self.handlebars
            .render_template(template, context)
            .map_err(|e| TweetsmithError::Template(format!("Failed to render template: {}", e)))
    }

    /// Register a named template, replacing any existing one
    pub fn register_template(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| TweetsmithError::Template(format!("Failed to register template '{}': {}", name, e)))
    }

    /// Render a previously registered template
    pub fn render_named<T: Serialize>(&self, name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(name, context)
            .map_err(|e| TweetsmithError::Template(format!("Failed to render template '{}': {}", name, e)))
    }

    /// Check if a named template is registered
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.get_template(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtins_registered() {
        let renderer = PromptRenderer::new();
        for (name, _) in templates::BUILTIN {
            assert!(renderer.has_template(name), "missing {}", name);
        }
    }

    #[test]
    fn test_render_with_serializable() {
        #[derive(Serialize)]
        struct Context {
            name: String,
            count: i32,
        }

        let renderer = PromptRenderer::new();
        let context = Context {
            name: "Bob".to_string(),
            count: 5,
        };

        let result = renderer.render_with("{{name}} has {{count}} items", &context).unwrap();
        assert_eq!(result, "Bob has 5 items");
    }

    #[test]
    fn test_render_missing_variable_empty_string() {
        let renderer = PromptRenderer::new();
        let result = renderer.render_with("Hello, {{name}}!", &json!({})).unwrap();
        assert_eq!(result, "Hello, !");
    }

    #[test]
    fn test_render_no_escape() {
        let renderer = PromptRenderer::new();
        let result = renderer
            .render_with("Tweet: {{tweet}}", &json!({ "tweet": "LangGraph <3 & \"you\"" }))
            .unwrap();
        assert_eq!(result, "Tweet: LangGraph <3 & \"you\"");
    }

    #[test]
    fn test_register_and_render_named() {
        let mut renderer = PromptRenderer::new();
        renderer.register_template("greeting", "Hello, {{name}}!").unwrap();
        let result = renderer.render_named("greeting", &json!({ "name": "World" })).unwrap();
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_render_named_not_found() {
        let renderer = PromptRenderer::new();
        let err = renderer.render_named("nonexistent", &json!({})).unwrap_err();
        assert!(matches!(err, TweetsmithError::Template(_)));
    }

    #[test]
    fn test_register_invalid_template() {
        let mut renderer = PromptRenderer::new();
        let result = renderer.register_template("bad", "{{#each items}}unclosed");
        assert!(result.is_err());
    }
}
