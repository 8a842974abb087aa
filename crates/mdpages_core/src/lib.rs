//! Core library for serving a markdown tree as HTML pages.
//!
//! # Modules
//!
//! - [`template`] - `!{{name}{args}}` template expansion
//! - [`render`] - Markdown to HTML conversion with link resolution
//! - [`resolve`] - Request path to markdown file mapping
//! - [`page`] - The full pipeline: read, expand, render, wrap
//! - [`assets`] - Embedded HTML shell and styles
//! - [`document`] - Markdown file detection
//! - [`slug`] - Heading anchors

pub mod assets;
pub mod document;
pub mod page;
pub mod render;
pub mod resolve;
pub mod slug;
pub mod template;

// Re-export commonly used types at crate root
pub use page::{Page, PageError, PageRenderer};
pub use render::{to_html, RenderOptions, RenderResult};
pub use resolve::{resolve, Resolved};
pub use template::{ExpanderConfig, FsSource, TemplateError, TemplateExpander, TemplateSource};
