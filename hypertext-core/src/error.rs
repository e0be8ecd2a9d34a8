//! Build errors.

use crate::frontmatter::FrontmatterError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Filesystem error at {}: {source}", .path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Missing template in {}", .0.display())]
    MissingTemplateKey(PathBuf),

    #[error("Template not found for {}: {}", .path.display(), .template.display())]
    TemplateNotFound { path: PathBuf, template: PathBuf },

    #[error("Failed to parse {}: {source}", .path.display())]
    MarkdownParse {
        path: PathBuf,
        #[source]
        source: FrontmatterError,
    },

    #[error("Failed to render {} with {}: {message}", .path.display(), .template.display())]
    Render {
        path: PathBuf,
        template: PathBuf,
        message: String,
    },
}

impl BuildError {
    /// Source document or filesystem path the error is about
    pub fn path(&self) -> &Path {
        match self {
            BuildError::FileSystem { path, .. }
            | BuildError::MarkdownParse { path, .. }
            | BuildError::TemplateNotFound { path, .. }
            | BuildError::Render { path, .. } => path,
            BuildError::MissingTemplateKey(path) => path,
        }
    }
}

/// Attach the offending path to an `io::Error`
pub(crate) trait IoResultExt<T> {
    fn at(self, path: &Path) -> Result<T, BuildError>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at(self, path: &Path) -> Result<T, BuildError> {
        self.map_err(|source| BuildError::FileSystem {
            path: path.to_path_buf(),
            source,
        })
    }
}
