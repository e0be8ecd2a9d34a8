//! Site building logic - orchestrates discovery, rendering, and output.

use crate::{
    assets::AssetMirror,
    config::Config,
    context::build_context,
    discover::discover_markdown,
    document::{read_source, DocumentProcessor},
    error::BuildError,
    fs::FileSystem,
    models::{BuildReport, OutputArtifact},
    output::OutputWriter,
    template::{TemplateEngine, TemplateResolver},
};
use std::path::Path;

/// Main site builder
pub struct SiteBuilder<F: FileSystem> {
    config: Config,
    fs: F,
    processor: DocumentProcessor,
}

impl<F: FileSystem> SiteBuilder<F> {
    pub fn new(config: Config, fs: F) -> Self {
        Self {
            config,
            fs,
            processor: DocumentProcessor::new(),
        }
    }

    /// Build the entire site from scratch.
    ///
    /// The output root is recreated, assets are mirrored, then every document
    /// goes through process → resolve → render → write in discovery order.
    /// The first error aborts the build.
    pub fn build<E: TemplateEngine + ?Sized>(&self, engine: &E) -> Result<BuildReport, BuildError> {
        let output_dir = self.config.output_dir();
        let writer = OutputWriter::new(&self.fs, &output_dir);
        writer.reset()?;

        let asset_dirs = self.config.asset_dirs();
        let assets = AssetMirror::new(&self.fs, &output_dir)
            .mirror_all(asset_dirs.iter().map(|p| p.as_path()))?;
        tracing::info!("Copied {} assets", assets.len());

        let content_dir = self.config.content_dir();
        let resolver = TemplateResolver::new(&self.fs, self.config.templates_dir());

        let mut pages = Vec::new();
        for path in discover_markdown(&self.fs, &content_dir)? {
            let path = path?;
            let artifact = self.render_document(&content_dir, &path, &resolver, engine)?;
            writer.write(&artifact)?;

            tracing::info!("✓ Built {}", artifact.relative_path.display());
            pages.push(artifact.relative_path);
        }

        tracing::info!("Built {} pages into {:?}", pages.len(), output_dir);

        Ok(BuildReport { pages, assets })
    }

    /// Run one document through the pipeline without writing it
    pub fn render_document<E: TemplateEngine + ?Sized>(
        &self,
        content_dir: &Path,
        path: &Path,
        resolver: &TemplateResolver<'_, F>,
        engine: &E,
    ) -> Result<OutputArtifact, BuildError> {
        let source = read_source(&self.fs, content_dir, path)?;
        let doc = self.processor.process(&source)?;
        let template = resolver.resolve(&doc)?;
        let context = build_context(&doc);

        let html = engine
            .render(&template, &context)
            .map_err(|e| BuildError::Render {
                path: doc.source_path.clone(),
                template: template.path.clone(),
                message: error_chain(&e),
            })?;

        Ok(OutputArtifact::for_document(&doc.relative_path, html))
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFs;
    use crate::models::ResolvedTemplate;
    use hypertext_types::RenderContext;
    use std::path::PathBuf;

    /// Replaces `{{key}}` with the context value
    struct Substitute;

    #[derive(Debug, thiserror::Error)]
    #[error("template {0} is marked broken")]
    struct Broken(String);

    impl TemplateEngine for Substitute {
        type Error = Broken;

        fn render(&self, template: &ResolvedTemplate, context: &RenderContext) -> Result<String, Broken> {
            if template.contents.contains("BROKEN") {
                return Err(Broken(template.name.clone()));
            }
            let mut out = template.contents.clone();
            for (key, value) in context.iter() {
                out = out.replace(&format!("{{{{{key}}}}}"), value);
            }
            Ok(out)
        }
    }

    fn site() -> (MemoryFs, Config) {
        let fs = MemoryFs::new();
        fs.add_file("/site/templates/page.html", "<title>{{title}}</title>{{content}}");
        fs.add_file("/site/content/index.md", "---\ntemplate: page.html\ntitle: Home\n---\nWelcome");
        fs.add_file("/site/content/a/b.md", "---\ntemplate: page.html\ntitle: B\n---\nBee");
        fs.add_file("/site/static/logo.svg", "<svg/>");
        fs.add_file("/site/styles/site.css", "body{}");
        (fs, Config::rooted_at("/site"))
    }

    #[test]
    fn test_build_maps_paths_and_renders() {
        let (fs, config) = site();
        let builder = SiteBuilder::new(config, &fs);

        let report = builder.build(&Substitute).unwrap();

        assert_eq!(
            report.pages,
            vec![PathBuf::from("a/b.html"), PathBuf::from("index.html")]
        );
        assert_eq!(
            report.assets,
            vec![PathBuf::from("logo.svg"), PathBuf::from("site.css")]
        );
        assert_eq!(
            fs.read_to_string(Path::new("/site/public/index.html")).unwrap(),
            "<title>Home</title><p>Welcome</p>\n"
        );
        assert_eq!(
            fs.read_to_string(Path::new("/site/public/a/b.html")).unwrap(),
            "<title>B</title><p>Bee</p>\n"
        );
        assert_eq!(
            fs.read(Path::new("/site/public/logo.svg")).unwrap(),
            b"<svg/>"
        );
    }

    #[test]
    fn test_build_removes_stale_output() {
        let (fs, config) = site();
        fs.add_file("/site/public/old.html", "stale");

        SiteBuilder::new(config, &fs).build(&Substitute).unwrap();
        assert!(!fs.exists(Path::new("/site/public/old.html")));
    }

    #[test]
    fn test_missing_template_key_stops_later_documents() {
        let (fs, config) = site();
        // Sorts before index.md, after a/b.md
        fs.add_file("/site/content/broken.md", "---\ntitle: No template\n---\nOops");

        let err = SiteBuilder::new(config, &fs).build(&Substitute).unwrap_err();
        match err {
            BuildError::MissingTemplateKey(path) => {
                assert_eq!(path, PathBuf::from("/site/content/broken.md"))
            }
            other => panic!("Expected MissingTemplateKey, got {other:?}"),
        }

        assert!(fs.exists(Path::new("/site/public/a/b.html")));
        assert!(!fs.exists(Path::new("/site/public/index.html")));
    }

    #[test]
    fn test_template_not_found() {
        let (fs, config) = site();
        fs.add_file("/site/content/x.md", "---\ntemplate: missing.html\n---\n");

        let err = SiteBuilder::new(config, &fs).build(&Substitute).unwrap_err();
        match err {
            BuildError::TemplateNotFound { path, template } => {
                assert_eq!(path, PathBuf::from("/site/content/x.md"));
                assert_eq!(template, PathBuf::from("/site/templates/missing.html"));
            }
            other => panic!("Expected TemplateNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_engine_error_carries_document_and_template() {
        let (fs, config) = site();
        fs.add_file("/site/templates/bad.html", "BROKEN");
        fs.add_file("/site/content/bad.md", "---\ntemplate: bad.html\n---\n");

        let err = SiteBuilder::new(config, &fs).build(&Substitute).unwrap_err();
        match err {
            BuildError::Render { path, template, message } => {
                assert_eq!(path, PathBuf::from("/site/content/bad.md"));
                assert_eq!(template, PathBuf::from("/site/templates/bad.html"));
                assert!(message.contains("bad.html is marked broken"));
            }
            other => panic!("Expected Render error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_content_dir() {
        let fs = MemoryFs::new();
        fs.add_dir("/site/templates");

        let err = SiteBuilder::new(Config::rooted_at("/site"), &fs)
            .build(&Substitute)
            .unwrap_err();
        assert!(matches!(err, BuildError::FileSystem { .. }));
        assert_eq!(err.path(), Path::new("/site/content"));
    }

    #[test]
    fn test_empty_content_dir_builds_nothing() {
        let fs = MemoryFs::new();
        fs.add_dir("/site/content");

        let report = SiteBuilder::new(Config::rooted_at("/site"), &fs)
            .build(&Substitute)
            .unwrap();
        assert!(report.pages.is_empty());
        assert!(fs.is_dir(Path::new("/site/public")));
    }

    #[test]
    fn test_rebuild_is_identical() {
        let (fs, config) = site();
        let builder = SiteBuilder::new(config, &fs);

        builder.build(&Substitute).unwrap();
        let first: Vec<_> = fs
            .files_under("/site/public")
            .into_iter()
            .map(|p| (p.clone(), fs.read(&p).unwrap()))
            .collect();

        builder.build(&Substitute).unwrap();
        let second: Vec<_> = fs
            .files_under("/site/public")
            .into_iter()
            .map(|p| (p.clone(), fs.read(&p).unwrap()))
            .collect();

        assert_eq!(first, second);
    }
}
