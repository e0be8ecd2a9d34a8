//! Build command implementation.

use anyhow::{Context, Result};
use hypertext_core::{BuildReport, Config, OsFs, SiteBuilder};
use hypertext_render::TeraEngine;
use std::path::Path;

/// Build the static site and print what was written
pub fn build_site(config_path: &Path, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let report = build_with_config(&config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for page in &report.pages {
        println!("{}", page.display());
    }
    println!(
        "✓ Built {} pages and {} assets into {:?}",
        report.pages.len(),
        report.assets.len(),
        config.output_dir()
    );
    Ok(())
}

pub fn load_config(config_path: &Path) -> Result<Config> {
    tracing::info!("Loading config from {:?}", config_path);
    Config::load(config_path).with_context(|| format!("Failed to load {:?}", config_path))
}

/// One full build with the OS filesystem and the Tera engine
pub fn build_with_config(config: &Config) -> Result<BuildReport> {
    let builder = SiteBuilder::new(config.clone(), OsFs);
    builder
        .build(&TeraEngine::new())
        .context("Failed to build site")
}
