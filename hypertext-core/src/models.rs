//! Content model structs for documents, templates and build output.

use hypertext_types::Metadata;
use serde::Serialize;
use std::path::PathBuf;

/// A markdown file read from the content root
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Absolute path of the source file
    pub path: PathBuf,

    /// Path relative to the content root (e.g., "blog/post.md")
    pub relative_path: PathBuf,

    /// Raw file contents, frontmatter included
    pub raw: String,
}

/// A source document split into metadata and rendered body
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub source_path: PathBuf,
    pub relative_path: PathBuf,
    pub metadata: Metadata,
    pub body_html: String,
}

/// A template located under the templates root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    /// Name as declared in frontmatter
    pub name: String,
    pub path: PathBuf,
    pub contents: String,
}

/// Rendered page ready to be persisted under the output root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    /// Path relative to the output root (e.g., "blog/post.html")
    pub relative_path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Summary of a finished build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Output-relative paths of rendered pages, in build order
    pub pages: Vec<PathBuf>,

    /// Output-relative paths of mirrored assets
    pub assets: Vec<PathBuf>,
}
