//! Builds the render context handed to the template engine.

use crate::models::ParsedDocument;
use hypertext_types::{RenderContext, CONTENT_KEY};

/// Every metadata entry, then `content` set to the rendered body.
///
/// Metadata is inserted first, so a frontmatter `content` key loses to the body.
pub fn build_context(doc: &ParsedDocument) -> RenderContext {
    let mut context = RenderContext::new();
    for (key, value) in doc.metadata.iter() {
        context.insert(key, value);
    }

    if context.insert(CONTENT_KEY, doc.body_html.as_str()).is_some() {
        tracing::warn!(
            "{:?} defines a `{}` frontmatter key; the rendered body replaces it",
            doc.relative_path,
            CONTENT_KEY
        );
    }

    context
}
