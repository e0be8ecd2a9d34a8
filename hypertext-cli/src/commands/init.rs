//! Init command implementation.

use anyhow::{Context, Result};
use hypertext_core::Config;
use std::fs;
use std::path::Path;

const STARTER_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{{ title }}</title>
  <link rel="stylesheet" href="/site.css">
</head>
<body>
  <main>
{{ content }}
  </main>
</body>
</html>
"#;

const STARTER_PAGE: &str = r#"---
template: page.html
title: Welcome
---

# Welcome

This page lives in `content/index.md`. Run:

```bash
hx build
hx serve
```
"#;

const STARTER_STYLES: &str = "body { max-width: 42rem; margin: 2rem auto; font-family: sans-serif; }\n";

/// Create the source layout under `path`, keeping anything already there
pub fn init_project(path: Option<&Path>) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    let config = Config::rooted_at(root);

    for dir in config.source_dirs() {
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }

    write_if_absent(&config.templates_dir().join("page.html"), STARTER_TEMPLATE)?;
    write_if_absent(&config.content_dir().join("index.md"), STARTER_PAGE)?;
    write_if_absent(&config.styles_dir().join("site.css"), STARTER_STYLES)?;

    println!("✓ hypertext initialized in {:?}", root);
    println!("  - Write pages in content/ and layouts in templates/");
    println!("  - Run `hx build` to render into public/");
    Ok(())
}

fn write_if_absent(path: &Path, contents: &str) -> Result<()> {
    if path.exists() {
        println!("{:?} already exists", path);
        return Ok(());
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))?;
    println!("Created {:?}", path);
    Ok(())
}
