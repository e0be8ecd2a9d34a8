//! # hypertext-core
//!
//! Core library for the hypertext static site generator.
//!
//! This crate provides the build pipeline (discovery, frontmatter parsing,
//! template resolution, render context, output writing, asset mirroring) and
//! the route resolution used by the preview server. All filesystem access goes
//! through the [`FileSystem`] trait.

pub mod assets;
pub mod builder;
pub mod config;
pub mod context;
pub mod discover;
pub mod document;
pub mod error;
pub mod frontmatter;
pub mod fs;
pub mod markdown;
pub mod models;
pub mod output;
pub mod preview;
pub mod template;

pub use builder::SiteBuilder;
pub use config::Config;
pub use context::build_context;
pub use error::BuildError;
pub use fs::{FileSystem, MemoryFs, OsFs};
pub use models::{BuildReport, OutputArtifact, ParsedDocument, ResolvedTemplate, SourceDocument};
pub use preview::{PreviewHandler, PreviewRequest, PreviewResponse, Resolution};
pub use template::{TemplateEngine, TemplateResolver};

pub use hypertext_types::{Metadata, RenderContext};
