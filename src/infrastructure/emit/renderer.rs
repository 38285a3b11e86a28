//! Tera renderer over the templates embedded at compile time

use rust_embed::RustEmbed;
use std::collections::HashMap;
use tera::{Tera, Value};

use crate::generation::{GenerationError, RenderContext};

/// Container for all templates embedded at compile time
#[derive(RustEmbed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

/// Renders named templates against a [`RenderContext`]
pub struct TeraRenderer {
    tera: Tera,
}

impl TeraRenderer {
    /// Load every embedded `.tera` template, named by its path under `templates/`
    pub fn embedded() -> Result<Self, GenerationError> {
        let mut sources = Vec::new();
        for path in EmbeddedTemplates::iter().filter(|p| p.ends_with(".tera")) {
            let file = EmbeddedTemplates::get(&path).ok_or_else(|| {
                GenerationError::RenderError(format!("Embedded template {path} disappeared"))
            })?;
            let content = String::from_utf8(file.data.into_owned()).map_err(|e| {
                GenerationError::RenderError(format!("Template {path} is not UTF-8: {e}"))
            })?;
            sources.push((path.to_string(), content));
        }
        tracing::debug!(templates = sources.len(), "Loaded embedded templates");
        Self::from_sources(sources)
    }

    /// Build from `(name, source)` pairs
    pub fn from_sources<N, S>(sources: impl IntoIterator<Item = (N, S)>) -> Result<Self, GenerationError>
    where
        N: AsRef<str>,
        S: AsRef<str>,
    {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.register_filter("literal", literal);
        let sources: Vec<(N, S)> = sources.into_iter().collect();
        tera.add_raw_templates(
            sources
                .iter()
                .map(|(name, source)| (name.as_ref(), source.as_ref())),
        )
        .map_err(|e| GenerationError::RenderError(format!("Failed to add templates: {}", describe(&e))))?;
        Ok(Self { tera })
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    pub fn render(&self, name: &str, context: &RenderContext) -> Result<String, GenerationError> {
        let tera_context = tera::Context::from_value(context.data.clone()).map_err(|e| {
            GenerationError::RenderError(format!("Invalid render context: {}", describe(&e)))
        })?;
        self.tera.render(name, &tera_context).map_err(|e| {
            GenerationError::RenderError(format!("Failed to render {name}: {}", describe(&e)))
        })
    }
}

/// A Tera error with its causes; the top-level message alone is rarely useful
fn describe(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// `{{ value | literal }}`: the value as a quoted, escaped Rust string literal
fn literal(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Ok(Value::String(format!("{text:?}")))
}
