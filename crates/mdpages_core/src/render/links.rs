//! Link and image destination rewriting.
//!
//! Pages are served under URLs mirroring their location in the markdown tree,
//! so relative destinations written for a repository browser (`../guide.md`,
//! `img/logo.png`) are turned into absolute site URLs (`/guide`,
//! `/docs/img/logo.png`).

use crate::document::strip_markdown_extension;
use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;

static URL_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*:").unwrap());

/// Characters escaped in a path segment. `%` is left alone so destinations
/// that are already encoded are not encoded twice.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'{')
    .add(b'}');

/// Returns `true` for destinations that are left untouched: URLs with a
/// scheme (`https:`, `mailto:`, `data:`), protocol-relative and absolute
/// paths, and in-page anchors.
pub fn is_absolute(dest: &str) -> bool {
    dest.is_empty()
        || dest.starts_with('/')
        || dest.starts_with('#')
        || URL_SCHEME.is_match(dest)
}

/// Resolves a link destination written in the page whose directory URL is
/// `base` (e.g. `/docs/`).
///
/// Links to markdown files lose their extension and links to `index.md`
/// collapse to the directory URL.
///
/// # Example
///
/// ```
/// use mdpages_core::render::links::resolve_link;
///
/// assert_eq!(resolve_link("/docs/", "guide/setup.md#usage"), "/docs/guide/setup#usage");
/// assert_eq!(resolve_link("/docs/", "../index.md"), "/");
/// assert_eq!(resolve_link("/docs/", "https://example.com"), "https://example.com");
/// ```
pub fn resolve_link(base: &str, dest: &str) -> String {
    resolve(base, dest, true)
}

/// Resolves an image source against `base`, keeping its extension.
pub fn resolve_image(base: &str, dest: &str) -> String {
    resolve(base, dest, false)
}

fn resolve(base: &str, dest: &str, is_page_link: bool) -> String {
    if is_absolute(dest) {
        return dest.to_string();
    }

    let (path, suffix) = match dest.find(|c: char| c == '#' || c == '?') {
        Some(idx) => dest.split_at(idx),
        None => (dest, ""),
    };

    let path = if is_page_link {
        strip_markdown_extension(path)
    } else {
        path
    };

    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    let mut is_dir = path.is_empty() || path.ends_with('/');

    for segment in path.split('/') {
        match segment {
            "" | "." => is_dir = true,
            ".." => {
                segments.pop();
                is_dir = true;
            }
            other => {
                segments.push(other);
                is_dir = false;
            }
        }
    }

    if is_page_link && !is_dir && segments.last() == Some(&"index") {
        segments.pop();
        is_dir = true;
    }

    let mut url = String::from("/");
    url.push_str(
        &segments
            .iter()
            .map(|s| utf8_percent_encode(s, SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/"),
    );
    if is_dir && !segments.is_empty() {
        url.push('/');
    }
    url.push_str(suffix);
    url
}
