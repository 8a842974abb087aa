//! Embedded web assets for the served pages.
//!
//! Every page is the rendered markdown wrapped into a single HTML shell with
//! the stylesheet inlined, so serving a page never needs a second request.

/// HTML shell with placeholders for the title, CSS and page body.
pub const PAGE_TEMPLATE: &str = include_str!("../assets/page.html");

/// Page styles.
pub const STYLES_CSS: &str = include_str!("../assets/styles.css");

const TITLE_SLOT: &str = "{{page_title}}";
const STYLES_SLOT: &str = "/*__STYLES_CSS__*/";
const BODY_SLOT: &str = "{{page_body}}";

/// Escapes text for use inside HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Build the complete HTML page.
///
/// `title` is escaped, `body_html` is inserted verbatim. The body is spliced
/// in last so text in it that looks like a slot is never replaced.
pub fn build_page(title: &str, body_html: &str) -> String {
    let shell = PAGE_TEMPLATE.replace(STYLES_SLOT, STYLES_CSS);

    let (before_body, after_body) = shell.split_once(BODY_SLOT).unwrap_or((shell.as_str(), ""));
    let before_body = before_body.replace(TITLE_SLOT, &escape_html(title));

    let mut page = String::with_capacity(before_body.len() + body_html.len() + after_body.len());
    page.push_str(&before_body);
    page.push_str(body_html);
    page.push_str(after_body);
    page
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_template_exists() {
        assert!(PAGE_TEMPLATE.contains("<!DOCTYPE html>"));
        assert!(PAGE_TEMPLATE.contains(TITLE_SLOT));
        assert!(PAGE_TEMPLATE.contains(STYLES_SLOT));
        assert!(PAGE_TEMPLATE.contains(BODY_SLOT));
        assert!(!STYLES_CSS.is_empty());
    }

    #[test]
    fn test_build_page() {
        let html = build_page("Guide", "<h1>Guide</h1>");

        assert!(!html.contains(TITLE_SLOT));
        assert!(!html.contains(STYLES_SLOT));
        assert!(!html.contains(BODY_SLOT));

        assert!(html.contains("<title>Guide</title>"));
        assert!(html.contains("<h1>Guide</h1>"));
        assert!(html.contains(".markdown-body"));
    }

    #[test]
    fn test_title_is_escaped() {
        let html = build_page("<script>&", "");
        assert!(html.contains("<title>&lt;script&gt;&amp;</title>"));
    }

    #[test]
    fn test_body_slots_are_not_replaced() {
        let html = build_page("T", "<p>{{page_title}} /*__STYLES_CSS__*/</p>");
        assert!(html.contains("<p>{{page_title}} /*__STYLES_CSS__*/</p>"));
    }
}
