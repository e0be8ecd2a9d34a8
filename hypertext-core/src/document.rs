//! Turns raw markdown sources into parsed documents.

use crate::error::{BuildError, IoResultExt};
use crate::frontmatter::parse_frontmatter;
use crate::fs::FileSystem;
use crate::markdown::MarkdownProcessor;
use crate::models::{ParsedDocument, SourceDocument};
use std::path::{Path, PathBuf};

/// Read a source file and remember where it sits relative to the content root
pub fn read_source<F: FileSystem + ?Sized>(
    fs: &F,
    content_root: &Path,
    path: &Path,
) -> Result<SourceDocument, BuildError> {
    let relative_path = path
        .strip_prefix(content_root)
        .map(Path::to_path_buf)
        .map_err(|_| BuildError::FileSystem {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not inside content root {}", content_root.display()),
            ),
        })?;
    let raw = fs.read_to_string(path).at(path)?;

    Ok(SourceDocument {
        path: path.to_path_buf(),
        relative_path,
        raw,
    })
}

/// Splits frontmatter from body and renders the body to HTML
#[derive(Debug, Clone, Default)]
pub struct DocumentProcessor {
    markdown: MarkdownProcessor,
}

impl DocumentProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process(&self, source: &SourceDocument) -> Result<ParsedDocument, BuildError> {
        let (metadata, body) =
            parse_frontmatter(&source.raw).map_err(|e| BuildError::MarkdownParse {
                path: source.path.clone(),
                source: e,
            })?;

        Ok(ParsedDocument {
            source_path: source.path.clone(),
            relative_path: source.relative_path.clone(),
            metadata,
            body_html: self.markdown.convert(body),
        })
    }

    /// Parse raw text that did not come from disk
    pub fn process_str(&self, path: impl Into<PathBuf>, raw: &str) -> Result<ParsedDocument, BuildError> {
        let path = path.into();
        self.process(&SourceDocument {
            relative_path: PathBuf::from(path.file_name().unwrap_or(path.as_os_str())),
            path,
            raw: raw.to_string(),
        })
    }
}
