//! Verbatim copy of asset trees into the output root.

use crate::error::{BuildError, IoResultExt};
use crate::fs::FileSystem;
use std::path::{Path, PathBuf};

pub struct AssetMirror<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    output_root: PathBuf,
}

impl<'a, F: FileSystem + ?Sized> AssetMirror<'a, F> {
    pub fn new(fs: &'a F, output_root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            output_root: output_root.into(),
        }
    }

    /// Copy every file below `source_root` to the same relative path under
    /// the output root, overwriting what is there.
    ///
    /// Returns the output-relative paths copied. A missing source root copies
    /// nothing; any failure on an individual file is returned immediately.
    pub fn mirror(&self, source_root: &Path) -> Result<Vec<PathBuf>, BuildError> {
        if !self.fs.is_dir(source_root) {
            tracing::debug!("Asset directory {:?} not found, skipping", source_root);
            return Ok(Vec::new());
        }

        let mut copied = Vec::new();
        for entry in self.fs.walk_files(source_root).at(source_root)? {
            let source = entry.at(source_root)?;
            let rel = source
                .strip_prefix(source_root)
                .unwrap_or(&source)
                .to_path_buf();
            let dest = self.output_root.join(&rel);

            if let Some(parent) = dest.parent() {
                self.fs.create_dir_all(parent).at(parent)?;
            }
            let bytes = self.fs.read(&source).at(&source)?;
            self.fs.write(&dest, &bytes).at(&dest)?;

            tracing::debug!("Copied {:?}", rel);
            copied.push(rel);
        }

        Ok(copied)
    }

    /// Mirror several roots in order; later roots win on collisions
    pub fn mirror_all<'p>(
        &self,
        roots: impl IntoIterator<Item = &'p Path>,
    ) -> Result<Vec<PathBuf>, BuildError> {
        let mut copied = Vec::new();
        for root in roots {
            copied.extend(self.mirror(root)?);
        }
        Ok(copied)
    }
}
