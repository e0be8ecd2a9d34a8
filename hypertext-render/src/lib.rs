//! # hypertext-render
//!
//! Template rendering library for hypertext.
//!
//! This crate renders resolved templates with Tera.

pub mod engine;

pub use engine::{RenderError, TeraEngine};
