//! Frontmatter parsing from markdown files.

use hypertext_types::Metadata;
use regex::Regex;
use serde_yaml::Value;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("Invalid YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Frontmatter must be a mapping of keys to values")]
    NotAMapping,

    #[error("Frontmatter key must be a string: {0}")]
    InvalidKey(String),

    #[error("Frontmatter value for `{0}` must be a string, number or boolean")]
    NonScalarValue(String),
}

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    FRONTMATTER_REGEX.get_or_init(|| {
        Regex::new(r"(?s)^\u{feff}?---[ \t]*\r?\n(?:(.*?)\r?\n)?---[ \t]*(?:\r?\n|$)(.*)$")
            .unwrap()
    })
}

/// Parse frontmatter from markdown content
///
/// Returns a tuple of (metadata, markdown_body).
/// If no frontmatter is present, returns empty metadata with the full content as body.
///
/// # Example
///
/// ```
/// use hypertext_core::frontmatter::parse_frontmatter;
///
/// let content = "---\ntemplate: post.html\ntitle: My Post\n---\n# Hello World\n";
///
/// let (meta, body) = parse_frontmatter(content).unwrap();
/// assert_eq!(meta.template(), Some("post.html"));
/// assert_eq!(meta.get("title"), Some("My Post"));
/// assert!(body.trim().starts_with("# Hello World"));
/// ```
pub fn parse_frontmatter(content: &str) -> Result<(Metadata, &str), FrontmatterError> {
    let Some(captures) = frontmatter_regex().captures(content) else {
        return Ok((Metadata::new(), content));
    };

    let yaml = captures.get(1).map_or("", |m| m.as_str());
    let body = captures.get(2).map_or("", |m| m.as_str());

    Ok((metadata_from_yaml(yaml)?, body))
}

fn metadata_from_yaml(yaml: &str) -> Result<Metadata, FrontmatterError> {
    if yaml.trim().is_empty() {
        return Ok(Metadata::new());
    }

    let mapping = match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(mapping) => mapping,
        Value::Null => return Ok(Metadata::new()),
        _ => return Err(FrontmatterError::NotAMapping),
    };

    let mut metadata = Metadata::new();
    for (key, value) in mapping {
        let key = scalar_to_string(&key)
            .ok_or_else(|| FrontmatterError::InvalidKey(format!("{:?}", key)))?;
        let value =
            scalar_to_string(&value).ok_or_else(|| FrontmatterError::NonScalarValue(key.clone()))?;
        metadata.insert(key, value);
    }

    Ok(metadata)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_frontmatter() {
        let content = r#"---
template: post.html
title: Test Post
description: A test post
---

# Hello World

This is the content."#;

        let (meta, body) = parse_frontmatter(content).unwrap();
        assert_eq!(meta.template(), Some("post.html"));
        assert_eq!(meta.get("title"), Some("Test Post"));
        assert_eq!(meta.get("description"), Some("A test post"));
        assert!(body.contains("# Hello World"));
        assert!(body.contains("This is the content."));
        assert!(!body.contains("template:"));
    }

    #[test]
    fn test_scalars_are_stringified() {
        let content = "---\ntemplate: page.html\norder: 3\nratio: 1.5\ndraft: false\nempty:\n---\nBody";

        let (meta, body) = parse_frontmatter(content).unwrap();
        assert_eq!(meta.get("order"), Some("3"));
        assert_eq!(meta.get("ratio"), Some("1.5"));
        assert_eq!(meta.get("draft"), Some("false"));
        assert_eq!(meta.get("empty"), Some(""));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_parse_no_frontmatter() {
        let content = "# Just Content\n\nNo frontmatter here.";
        let (meta, body) = parse_frontmatter(content).unwrap();
        assert!(meta.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_parse_empty_frontmatter() {
        let (meta, body) = parse_frontmatter("---\n---\nBody").unwrap();
        assert!(meta.is_empty());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_frontmatter_at_end_of_file() {
        let (meta, body) = parse_frontmatter("---\ntemplate: a.html\n---").unwrap();
        assert_eq!(meta.template(), Some("a.html"));
        assert_eq!(body, "");
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "---\r\ntemplate: page.html\r\n---\r\nBody";
        let (meta, body) = parse_frontmatter(content).unwrap();
        assert_eq!(meta.template(), Some("page.html"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_invalid_yaml() {
        let content = r#"---
template: page.html
invalid yaml: [unclosed
---

Content."#;

        assert!(matches!(
            parse_frontmatter(content),
            Err(FrontmatterError::YamlError(_))
        ));
    }

    #[test]
    fn test_sequence_value_rejected() {
        let content = "---\ntemplate: page.html\ntags:\n  - rust\n---\nBody";

        match parse_frontmatter(content) {
            Err(FrontmatterError::NonScalarValue(key)) => assert_eq!(key, "tags"),
            other => panic!("Expected NonScalarValue error, got {:?}", other),
        }
    }

    #[test]
    fn test_scalar_document_rejected() {
        assert!(matches!(
            parse_frontmatter("---\njust a string\n---\nBody"),
            Err(FrontmatterError::NotAMapping)
        ));
    }
}
