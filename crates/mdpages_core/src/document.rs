//! Markdown file detection.
//!
//! This module is the single source of truth for the file extensions that are
//! served as pages.

use std::path::Path;

/// Lowercase extensions of the files rendered as markdown pages.
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "mdown", "mkdn", "mkd"];

/// Returns `true` if the extension (without the dot) denotes a markdown file.
///
/// The check is case-insensitive.
///
/// # Examples
///
/// ```
/// use mdpages_core::document::is_markdown_extension;
///
/// assert!(is_markdown_extension("md"));
/// assert!(is_markdown_extension("MD"));
/// assert!(!is_markdown_extension("txt"));
/// assert!(!is_markdown_extension(""));
/// ```
pub fn is_markdown_extension(ext: &str) -> bool {
    if ext.is_empty() {
        return false;
    }
    let ext_lower = ext.to_ascii_lowercase();
    MARKDOWN_EXTENSIONS.iter().any(|e| *e == ext_lower)
}

/// Returns `true` if the path has a markdown extension.
pub fn is_markdown_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(is_markdown_extension)
}

/// Strips a markdown extension from a link target, if present.
///
/// `guide/setup.md` becomes `guide/setup`; anything else is returned as is.
pub fn strip_markdown_extension(target: &str) -> &str {
    match target.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.contains('/') && is_markdown_extension(ext) => {
            stem
        }
        _ => target,
    }
}
