//! Template rendering: placeholder substitution over literal text

use crate::generators::GeneratorRegistry;
use crate::parser::PlaceholderParser;
use std::sync::Arc;
use tracing::debug;

/// Rendered template plus resolution counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    pub text: String,
    pub resolved: usize,
    /// Placeholder tokens left as written because their type is unknown
    pub unresolved: Vec<String>,
}

/// Substitutes every placeholder in a template with a freshly generated value
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    registry: Arc<GeneratorRegistry>,
}

impl TemplateRenderer {
    /// Renderer backed by the process-wide registry
    pub fn new() -> Self {
        Self::with_registry(GeneratorRegistry::shared())
    }

    pub fn with_registry(registry: Arc<GeneratorRegistry>) -> Self {
        Self { registry }
    }

    /// Render a template. Never fails; unknown placeholders pass through.
    pub fn render(&self, template: &str) -> String {
        self.render_detailed(template).text
    }

    /// Render a template and report which placeholders did not resolve
    pub fn render_detailed(&self, template: &str) -> RenderOutput {
        let mut text = String::with_capacity(template.len());
        let mut resolved = 0;
        let mut unresolved = Vec::new();
        let mut cursor = 0;

        for found in PlaceholderParser::parse(template) {
            text.push_str(&template[cursor..found.span.start]);

            let placeholder = &found.placeholder;
            match self.registry.generate(&placeholder.type_name, &placeholder.params) {
                Some(value) => {
                    text.push_str(&value);
                    resolved += 1;
                }
                None => {
                    text.push_str(found.raw);
                    unresolved.push(found.raw.to_string());
                }
            }

            cursor = found.span.end;
        }
        text.push_str(&template[cursor..]);

        if !unresolved.is_empty() {
            debug!(
                unresolved = unresolved.len(),
                "Template contains unknown placeholders: {}",
                unresolved.join(", ")
            );
        }

        RenderOutput {
            text,
            resolved,
            unresolved,
        }
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render with the process-wide registry
pub fn render(template: &str) -> String {
    TemplateRenderer::new().render(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::tests::ScriptedRandom;

    fn scripted_renderer(values: Vec<u64>) -> TemplateRenderer {
        TemplateRenderer::with_registry(Arc::new(GeneratorRegistry::with_random_source(
            Arc::new(ScriptedRandom::new(values)),
        )))
    }

    #[test]
    fn test_literal_text_passes_through() {
        let template = r#"{"static": true, "braces": "{ }", "single": "{x}"}"#;
        assert_eq!(render(template), template);
    }

    #[test]
    fn test_unknown_placeholder_is_kept() {
        assert_eq!(render("{{bogus}}"), "{{bogus}}");
        assert_eq!(render("a {{ Bogus:1:2 }} b"), "a {{ Bogus:1:2 }} b");

        let output = TemplateRenderer::new().render_detailed("{{bogus}} {{uuid}}");
        assert_eq!(output.resolved, 1);
        assert_eq!(output.unresolved, vec!["{{bogus}}"]);
    }

    #[test]
    fn test_placeholders_are_spliced_in_place() {
        let renderer = scripted_renderer(vec![0]);
        let rendered = renderer.render(r#"{"first":"{{firstname}}","n":{{number:10:20}},"ok":{{bool}}}"#);
        assert_eq!(rendered, r#"{"first":"James","n":10,"ok":false}"#);
    }

    #[test]
    fn test_adjacent_placeholders_render_independently() {
        let renderer = scripted_renderer(vec![0, 1]);
        assert_eq!(renderer.render("{{firstname}}{{lastname}}"), "JamesJohnson");
    }

    #[test]
    fn test_repeated_placeholders_are_not_memoized() {
        let renderer = scripted_renderer(vec![0, 1, 2]);
        assert_eq!(renderer.render("{{word}} {{word}} {{word}}"), "lorem ipsum dolor");
    }

    #[test]
    fn test_rendered_json_stays_valid() {
        let template = r#"{"id":"{{uuid}}","name":"{{name}}","email":"{{email}}","age":{{number:18:65}},"score":{{float:0:5:1}},"price":{{price}},"active":{{bool}},"joined":"{{date}}","bio":"{{text}}"}"#;
        let rendered = render(template);
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        let age = value["age"].as_i64().unwrap();
        assert!((18..65).contains(&age));
        assert!(value["active"].is_boolean());
        assert!(value["price"].is_f64());
    }
}
