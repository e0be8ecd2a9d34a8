//! Output paths and atomic page writes.

use crate::error::{BuildError, IoResultExt};
use crate::fs::FileSystem;
use crate::models::OutputArtifact;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Map a content-relative source path to its output-relative page path.
///
/// A trailing `.md` extension (any case) becomes `.html`; directories are kept.
///
/// ```
/// use hypertext_core::output::output_rel_path;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(output_rel_path(Path::new("a/b.md")), PathBuf::from("a/b.html"));
/// assert_eq!(output_rel_path(Path::new("index.md")), PathBuf::from("index.html"));
/// ```
pub fn output_rel_path(source_rel: &Path) -> PathBuf {
    let is_md = source_rel
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md"));

    if is_md {
        source_rel.with_extension("html")
    } else {
        source_rel.to_path_buf()
    }
}

impl OutputArtifact {
    /// Artifact for a document found at `source_rel` under the content root
    pub fn for_document(source_rel: &Path, html: String) -> Self {
        Self {
            relative_path: output_rel_path(source_rel),
            bytes: html.into_bytes(),
        }
    }
}

/// Persists artifacts under the output root
pub struct OutputWriter<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    output_root: PathBuf,
}

impl<'a, F: FileSystem + ?Sized> OutputWriter<'a, F> {
    pub fn new(fs: &'a F, output_root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            output_root: output_root.into(),
        }
    }

    /// Delete the output root if present and recreate it empty
    pub fn reset(&self) -> Result<(), BuildError> {
        if self.fs.exists(&self.output_root) {
            tracing::debug!("Removing previous output {:?}", self.output_root);
            self.fs
                .remove_dir_all(&self.output_root)
                .at(&self.output_root)?;
        }
        self.fs
            .create_dir_all(&self.output_root)
            .at(&self.output_root)
    }

    /// Write an artifact, creating intermediate directories as needed.
    ///
    /// Bytes land in a hidden sibling first and are renamed into place, so a
    /// reader never sees a partially written page.
    pub fn write(&self, artifact: &OutputArtifact) -> Result<PathBuf, BuildError> {
        let dest = self.output_root.join(&artifact.relative_path);
        if let Some(parent) = dest.parent() {
            self.fs.create_dir_all(parent).at(parent)?;
        }

        let tmp = temp_sibling(&dest);
        self.fs.write(&tmp, &artifact.bytes).at(&tmp)?;
        self.fs.rename(&tmp, &dest).at(&dest)?;

        Ok(dest)
    }
}

fn temp_sibling(dest: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(dest.file_name().unwrap_or_default());
    name.push(format!(".{}.tmp", std::process::id()));
    dest.with_file_name(name)
}
