//! Heading anchors.
//!
//! Slugs follow GitHub's convention so links written against a repository
//! browser keep working on the served pages.

use std::collections::HashMap;

/// Turns heading text into an anchor id.
///
/// Letters and digits are lowercased, `_` is kept, spaces and `-` become
/// separators, and everything else (backticks of inline code included) is
/// dropped. Runs of separators collapse to a single `-`, with none at either
/// end.
///
/// ```
/// use mdpages_core::slug::slugify;
///
/// assert_eq!(slugify("Using `expand`"), "using-expand");
/// assert_eq!(slugify("  Step 2 -- run it  "), "step-2-run-it");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.extend(c.to_lowercase());
        } else if c == ' ' || c == '-' {
            pending_separator = true;
        }
    }

    slug
}

/// Hands out unique slugs for the headings of a single page.
///
/// Repeated headings get a numeric suffix (`usage`, `usage-1`, `usage-2`),
/// which is what GitHub does as well.
#[derive(Debug, Default)]
pub struct SlugSet {
    seen: HashMap<String, usize>,
}

impl SlugSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unique(&mut self, text: &str) -> String {
        let base = slugify(text);
        let count = self.seen.entry(base.clone()).or_insert(0);
        let slug = if *count == 0 {
            base
        } else {
            format!("{base}-{count}")
        };
        *count += 1;
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_headings() {
        assert_eq!(slugify("Template Tags"), "template-tags");
        assert_eq!(slugify("Serve (HTTP) & Render"), "serve-http-render");
        assert_eq!(slugify("max_depth"), "max_depth");
        assert_eq!(slugify("--Draft--  notes--"), "draft-notes");
        assert_eq!(slugify("The `!{{name}{args}}` tag"), "the-nameargs-tag");
        assert_eq!(slugify("Übersicht"), "übersicht");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn test_unique_slugs() {
        let mut slugs = SlugSet::new();
        assert_eq!(slugs.unique("Usage"), "usage");
        assert_eq!(slugs.unique("Usage"), "usage-1");
        assert_eq!(slugs.unique("`Usage`"), "usage-2");
        assert_eq!(slugs.unique("Install"), "install");
    }
}
