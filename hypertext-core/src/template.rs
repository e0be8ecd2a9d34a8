//! Template lookup and the seam to the template engine.

use crate::error::{BuildError, IoResultExt};
use crate::fs::FileSystem;
use crate::models::{ParsedDocument, ResolvedTemplate};
use hypertext_types::RenderContext;
use std::path::{Component, Path, PathBuf};

/// Renders a template's source text against a context.
///
/// The substitution syntax, escaping and missing-key behavior belong to the
/// implementation.
pub trait TemplateEngine {
    type Error: std::error::Error;

    fn render(&self, template: &ResolvedTemplate, context: &RenderContext) -> Result<String, Self::Error>;
}

/// Finds the template a document declares under the templates root
pub struct TemplateResolver<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    templates_root: PathBuf,
}

impl<'a, F: FileSystem + ?Sized> TemplateResolver<'a, F> {
    pub fn new(fs: &'a F, templates_root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            templates_root: templates_root.into(),
        }
    }

    pub fn resolve(&self, doc: &ParsedDocument) -> Result<ResolvedTemplate, BuildError> {
        let name = doc
            .metadata
            .template()
            .ok_or_else(|| BuildError::MissingTemplateKey(doc.source_path.clone()))?;

        let path = self.templates_root.join(name);
        if !is_contained(Path::new(name)) || !self.fs.exists(&path) {
            return Err(BuildError::TemplateNotFound {
                path: doc.source_path.clone(),
                template: path,
            });
        }

        let contents = self.fs.read_to_string(&path).at(&path)?;
        tracing::debug!("Resolved template {} for {:?}", name, doc.relative_path);

        Ok(ResolvedTemplate {
            name: name.to_string(),
            path,
            contents,
        })
    }
}

/// Only plain relative names stay under the templates root
fn is_contained(name: &Path) -> bool {
    name.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentProcessor;
    use crate::fs::MemoryFs;

    fn parse(raw: &str) -> ParsedDocument {
        DocumentProcessor::new().process_str("/site/content/page.md", raw).unwrap()
    }

    #[test]
    fn test_resolves_declared_template() {
        let fs = MemoryFs::new();
        fs.add_file("/site/templates/page.html", "<main>{{ content }}</main>");

        let resolver = TemplateResolver::new(&fs, "/site/templates");
        let template = resolver.resolve(&parse("---\ntemplate: page.html\n---\nHi")).unwrap();

        assert_eq!(template.name, "page.html");
        assert_eq!(template.path, PathBuf::from("/site/templates/page.html"));
        assert_eq!(template.contents, "<main>{{ content }}</main>");
    }

    #[test]
    fn test_nested_template_name() {
        let fs = MemoryFs::new();
        fs.add_file("/t/layouts/post.html", "post");

        let resolver = TemplateResolver::new(&fs, "/t");
        let template = resolver.resolve(&parse("---\ntemplate: layouts/post.html\n---\n")).unwrap();
        assert_eq!(template.contents, "post");
    }

    #[test]
    fn test_missing_template_key() {
        let fs = MemoryFs::new();
        let resolver = TemplateResolver::new(&fs, "/site/templates");

        match resolver.resolve(&parse("---\ntitle: Untemplated\n---\nHi")) {
            Err(BuildError::MissingTemplateKey(path)) => {
                assert_eq!(path, PathBuf::from("/site/content/page.md"))
            }
            other => panic!("Expected MissingTemplateKey, got {other:?}"),
        }
    }

    #[test]
    fn test_template_not_found_names_path() {
        let fs = MemoryFs::new();
        fs.add_dir("/site/templates");
        let resolver = TemplateResolver::new(&fs, "/site/templates");

        match resolver.resolve(&parse("---\ntemplate: nope.html\n---\nHi")) {
            Err(BuildError::TemplateNotFound { path, template }) => {
                assert_eq!(path, PathBuf::from("/site/content/page.md"));
                assert_eq!(template, PathBuf::from("/site/templates/nope.html"));
            }
            other => panic!("Expected TemplateNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_names_escaping_the_root_are_rejected() {
        let fs = MemoryFs::new();
        fs.add_file("/site/templates/page.html", "page");
        fs.add_file("/site/secret.txt", "top secret");
        fs.add_file("/etc/passwd", "root:x:0:0");
        let resolver = TemplateResolver::new(&fs, "/site/templates");

        for name in ["../secret.txt", "layouts/../../secret.txt", "/etc/passwd"] {
            let doc = parse(&format!("---\ntemplate: {name}\n---\n"));
            match resolver.resolve(&doc) {
                Err(BuildError::TemplateNotFound { path, .. }) => {
                    assert_eq!(path, PathBuf::from("/site/content/page.md"))
                }
                other => panic!("Expected TemplateNotFound for {name}, got {other:?}"),
            }
        }
    }
}
