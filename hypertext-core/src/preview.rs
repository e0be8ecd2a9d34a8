//! Route resolution for the preview server.
//!
//! Requests are resolved against a built output tree in two tiers:
//!
//! 1. Pretty URLs: `/about` and `/about/` serve `about.html`, `/` serves
//!    `index.html`, and `/blog/` falls back to `blog/index.html`.
//! 2. Raw files: anything else is looked up at its literal path, so assets
//!    such as `/logo.png` or `/site.css` are served as-is.
//!
//! Nothing outside the output root is ever read and nothing is written.

use crate::fs::FileSystem;
use std::path::{Path, PathBuf};

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

const NOT_FOUND_PAGE: &str = "404.html";

/// Incoming request, already percent-decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRequest {
    pub path: String,
}

impl PreviewRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

/// Where a request path led
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A rendered page found through the pretty-URL lookup
    Page { file: PathBuf, body: Vec<u8> },
    /// A file served from its literal path
    Asset { file: PathBuf, body: Vec<u8> },
    NotFound,
}

/// Stateless handler serving one build snapshot
#[derive(Debug, Clone)]
pub struct PreviewHandler<F: FileSystem> {
    fs: F,
    output_root: PathBuf,
}

impl<F: FileSystem> PreviewHandler<F> {
    pub fn new(fs: F, output_root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            output_root: output_root.into(),
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn handle(&self, request: &PreviewRequest) -> PreviewResponse {
        match self.resolve(&request.path) {
            Resolution::Page { body, .. } => PreviewResponse {
                status: 200,
                content_type: HTML_CONTENT_TYPE,
                body,
            },
            Resolution::Asset { file, body } => PreviewResponse {
                status: 200,
                content_type: content_type_for_path(&file),
                body,
            },
            Resolution::NotFound => self.not_found(),
        }
    }

    pub fn resolve(&self, request_path: &str) -> Resolution {
        let route = normalize_route(request_path);

        let mut pages = vec![format!("{route}.html")];
        if request_path.len() > 1 && request_path.ends_with('/') {
            pages.push(format!("{request_path}index.html"));
        }

        for page in pages {
            if let Some(file) = confine(&self.output_root, &page) {
                if let Some(body) = self.read(&file) {
                    return Resolution::Page { file, body };
                }
            }
        }

        if let Some(file) = confine(&self.output_root, request_path) {
            if let Some(body) = self.read(&file) {
                return Resolution::Asset { file, body };
            }
        }

        Resolution::NotFound
    }

    fn read(&self, file: &Path) -> Option<Vec<u8>> {
        if !self.fs.is_file(file) {
            return None;
        }
        match self.fs.read(file) {
            Ok(body) => Some(body),
            Err(err) => {
                tracing::debug!("Could not read {:?}: {}", file, err);
                None
            }
        }
    }

    /// 404 response, using `404.html` from the output root when present
    pub fn not_found(&self) -> PreviewResponse {
        let custom = self.read(&self.output_root.join(NOT_FOUND_PAGE));
        match custom {
            Some(body) => PreviewResponse {
                status: 404,
                content_type: HTML_CONTENT_TYPE,
                body,
            },
            None => PreviewResponse {
                status: 404,
                content_type: "text/plain; charset=utf-8",
                body: b"404 Not Found".to_vec(),
            },
        }
    }
}

/// Empty and `/` become `/index`; otherwise one trailing slash is dropped
pub fn normalize_route(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return String::from("/index");
    }
    path.strip_suffix('/').unwrap_or(path).to_string()
}

/// Join a request path onto `root`, refusing anything that could escape it
fn confine(root: &Path, request_path: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for segment in request_path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s if s.contains('\\') || s.contains('\0') => return None,
            s => path.push(s),
        }
    }
    Some(path)
}

pub fn content_type_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
        .as_str()
    {
        "html" | "htm" => HTML_CONTENT_TYPE,
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "json" => "application/json; charset=utf-8",
        "txt" => "text/plain; charset=utf-8",
        "xml" => "application/xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
