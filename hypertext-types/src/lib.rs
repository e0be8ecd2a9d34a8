//! Shared types for hypertext
//!
//! This crate provides the value types passed between the build pipeline and
//! the template engine: document metadata and the render context.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Metadata key naming the template a document renders with.
pub const TEMPLATE_KEY: &str = "template";

/// Render context key holding the document's rendered body.
pub const CONTENT_KEY: &str = "content";

/// Frontmatter metadata of a single document.
///
/// Keys are kept sorted so iteration is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Name of the template this document declares, if any
    pub fn template(&self) -> Option<&str> {
        self.get(TEMPLATE_KEY)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Key/value mapping handed to the template engine.
///
/// Entries keep their insertion order. Inserting a key that is already
/// present replaces the value in place and returns the old one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    entries: Vec<(String, String)>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for RenderContext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_template_lookup() {
        let mut meta = Metadata::new();
        assert_eq!(meta.template(), None);

        meta.insert("template", "page.html");
        meta.insert("title", "Home");
        assert_eq!(meta.template(), Some("page.html"));
        assert_eq!(meta.len(), 2);
    }

    #[test]
    fn test_metadata_iterates_sorted() {
        let meta: Metadata = [("zeta", "1"), ("alpha", "2"), ("mid", "3")]
            .into_iter()
            .collect();
        let keys: Vec<_> = meta.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_context_preserves_insertion_order() {
        let mut ctx = RenderContext::new();
        ctx.insert("title", "Home");
        ctx.insert("author", "me");
        ctx.insert("content", "<p>hi</p>");

        let keys: Vec<_> = ctx.keys().collect();
        assert_eq!(keys, vec!["title", "author", "content"]);
    }

    #[test]
    fn test_context_reinsert_replaces_in_place() {
        let mut ctx = RenderContext::new();
        ctx.insert("content", "X");
        ctx.insert("title", "T");

        let previous = ctx.insert("content", "<p>Y</p>");
        assert_eq!(previous.as_deref(), Some("X"));
        assert_eq!(ctx.get("content"), Some("<p>Y</p>"));
        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.keys().next(), Some("content"));
    }
}
