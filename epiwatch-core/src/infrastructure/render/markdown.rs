// epiwatch-core/src/infrastructure/render/markdown.rs

// Renders run artifacts (validation rule tables) from minijinja templates.

use crate::application::ports::TemplateEngine;
use crate::error::EpiwatchError;
use crate::infrastructure::error::InfrastructureError;
use minijinja::Environment;

pub struct MarkdownRenderer<'a> {
    env: Environment<'a>,
}

impl<'a> MarkdownRenderer<'a> {
    pub fn new() -> Self {
        let mut env = Environment::new();

        // PASS / FAIL plutôt que true / false dans les tableaux
        env.add_filter("verdict", |passed: bool| -> String {
            if passed { "PASS" } else { "FAIL" }.to_string()
        });
        // Les `|` casseraient les cellules Markdown
        env.add_filter("cell", |value: String| -> String { value.replace('|', "\\|") });

        Self { env }
    }
}

impl<'a> Default for MarkdownRenderer<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> TemplateEngine for MarkdownRenderer<'a> {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, EpiwatchError> {
        self.env
            .render_str(template, context)
            .map_err(|e| EpiwatchError::Infrastructure(InfrastructureError::TemplateError(e)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_verdict_filter() -> Result<()> {
        let renderer = MarkdownRenderer::new();
        let out = renderer.render(
            "{{ ok | verdict }}/{{ ko | verdict }}",
            &serde_json::json!({ "ok": true, "ko": false }),
        )?;
        assert_eq!(out, "PASS/FAIL");
        Ok(())
    }

    #[test]
    fn test_cell_filter_escapes_pipes() -> Result<()> {
        let renderer = MarkdownRenderer::new();
        let out = renderer.render("{{ v | cell }}", &serde_json::json!({ "v": "a|b" }))?;
        assert_eq!(out, "a\\|b");
        Ok(())
    }

    #[test]
    fn test_syntax_error_is_template_error() {
        let renderer = MarkdownRenderer::new();
        let result = renderer.render("{% for %}", &serde_json::json!({}));
        assert!(matches!(
            result,
            Err(EpiwatchError::Infrastructure(InfrastructureError::TemplateError(_)))
        ));
    }
}
