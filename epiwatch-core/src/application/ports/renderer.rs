// epiwatch-core/src/application/ports/renderer.rs

use crate::error::EpiwatchError;

/// Turns a template plus a JSON context into text (markdown artifacts).
pub trait TemplateEngine: Send + Sync {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, EpiwatchError>;
}
