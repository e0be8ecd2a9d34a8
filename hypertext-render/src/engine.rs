//! Tera-backed template engine.

use hypertext_core::{RenderContext, ResolvedTemplate, TemplateEngine};
use tera::{Context as TeraContext, Tera};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template error in {name}")]
    Tera {
        name: String,
        #[source]
        source: tera::Error,
    },
}

/// Renders templates with Tera's syntax (`{{ title }}`, `{% if %}`, ...).
///
/// Each template is compiled from its source text per render. Values are
/// inserted as plain strings and are not HTML-escaped unless `autoescape`
/// is enabled, so `{{ content }}` emits the rendered markdown as markup.
#[derive(Debug, Clone, Default)]
pub struct TeraEngine {
    autoescape: bool,
}

impl TeraEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Escape every substituted value
    pub fn with_autoescape(mut self, autoescape: bool) -> Self {
        self.autoescape = autoescape;
        self
    }

    /// Render template source text directly
    pub fn render_str(&self, name: &str, source: &str, context: &RenderContext) -> Result<String, RenderError> {
        let mut tera_context = TeraContext::new();
        for (key, value) in context.iter() {
            tera_context.insert(key, value);
        }

        Tera::one_off(source, &tera_context, self.autoescape).map_err(|e| {
            tracing::debug!("Tera error in {}: {:?}", name, e);
            RenderError::Tera {
                name: name.to_string(),
                source: e,
            }
        })
    }
}

impl TemplateEngine for TeraEngine {
    type Error = RenderError;

    fn render(&self, template: &ResolvedTemplate, context: &RenderContext) -> Result<String, RenderError> {
        self.render_str(&template.name, &template.contents, context)
    }
}
