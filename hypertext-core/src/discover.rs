//! Discovery of markdown sources under the content root.

use crate::error::{BuildError, IoResultExt};
use crate::fs::FileSystem;
use std::path::{Component, Path, PathBuf};

/// Lazily walk `root` and yield every markdown file below it.
///
/// Hidden files and anything inside hidden directories are skipped. The order
/// is deterministic: depth-first, sorted by file name within each directory.
/// A missing root is an error; an empty one yields nothing.
pub fn discover_markdown<'a, F: FileSystem + ?Sized>(
    fs: &'a F,
    root: &Path,
) -> Result<impl Iterator<Item = Result<PathBuf, BuildError>> + 'a, BuildError> {
    let walk = fs.walk_files(root).at(root)?;
    let root = root.to_path_buf();

    Ok(walk.filter_map(move |entry| match entry {
        Ok(path) if is_markdown(&path) && !is_hidden(&root, &path) => Some(Ok(path)),
        Ok(path) => {
            tracing::trace!("Skipping {:?}", path);
            None
        }
        Err(source) => Some(Err(BuildError::FileSystem {
            path: root.clone(),
            source,
        })),
    }))
}

/// True for files with an `md` extension, in any case
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

fn is_hidden(root: &Path, path: &Path) -> bool {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components().any(|c| match c {
        Component::Normal(name) => name.to_str().is_some_and(|n| n.starts_with('.')),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFs;

    fn collect(fs: &MemoryFs, root: &str) -> Vec<PathBuf> {
        discover_markdown(fs, Path::new(root))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_finds_nested_markdown_only() {
        let fs = MemoryFs::new();
        fs.add_file("/site/content/index.md", "");
        fs.add_file("/site/content/blog/post.md", "");
        fs.add_file("/site/content/blog/image.png", "");
        fs.add_file("/site/content/NOTES.MD", "");

        assert_eq!(
            collect(&fs, "/site/content"),
            vec![
                PathBuf::from("/site/content/NOTES.MD"),
                PathBuf::from("/site/content/blog/post.md"),
                PathBuf::from("/site/content/index.md"),
            ]
        );
    }

    #[test]
    fn test_skips_hidden_entries() {
        let fs = MemoryFs::new();
        fs.add_file("/c/.draft.md", "");
        fs.add_file("/c/.git/readme.md", "");
        fs.add_file("/c/visible.md", "");

        assert_eq!(collect(&fs, "/c"), vec![PathBuf::from("/c/visible.md")]);
    }

    #[test]
    fn test_hidden_root_is_not_skipped() {
        let fs = MemoryFs::new();
        fs.add_file("/.site/content/a.md", "");

        assert_eq!(
            collect(&fs, "/.site/content"),
            vec![PathBuf::from("/.site/content/a.md")]
        );
    }

    #[test]
    fn test_empty_root_yields_nothing() {
        let fs = MemoryFs::new();
        fs.add_dir("/c");
        assert!(collect(&fs, "/c").is_empty());
    }

    #[test]
    fn test_missing_root_is_filesystem_error() {
        let fs = MemoryFs::new();
        let result = discover_markdown(&fs, Path::new("/nope"));
        match result {
            Err(BuildError::FileSystem { path, .. }) => assert_eq!(path, PathBuf::from("/nope")),
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn test_discovery_is_deterministic() {
        let fs = MemoryFs::new();
        for name in ["z.md", "a.md", "m/b.md", "m/a.md", "b.md"] {
            fs.add_file(format!("/c/{name}"), name);
        }

        assert_eq!(collect(&fs, "/c"), collect(&fs, "/c"));
    }
}
