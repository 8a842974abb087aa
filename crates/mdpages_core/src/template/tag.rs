//! Locating `!{{name}{args}}` tags in markdown text.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// Opening part of a tag: `!{{`, the name, then `}{`.
///
/// The name runs up to the first `}{` and cannot contain `}`.
static TAG_HEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\{\{([^}]+)\}\{").unwrap());

/// A template tag found in some text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    /// Byte range of the whole tag, from `!{{` to the closing `}}`.
    pub span: Range<usize>,
    /// Template name, as written.
    pub name: &'a str,
    /// Everything between `}{` and the closing `}}`, untrimmed.
    pub raw_args: &'a str,
}

/// Returns the first complete tag in `text`.
///
/// A head without a closing `}}` is not a tag and is skipped.
pub fn find_first_tag(text: &str) -> Option<Tag<'_>> {
    let mut offset = 0;

    while let Some(caps) = TAG_HEAD.captures_at(text, offset) {
        let head = caps.get(0)?;
        let name = caps.get(1)?;
        let body_start = head.end();

        if let Some(body_len) = find_body_end(&text[body_start..]) {
            let body_end = body_start + body_len;
            return Some(Tag {
                span: head.start()..body_end + 2,
                name: name.as_str(),
                raw_args: &text[body_start..body_end],
            });
        }

        offset = head.start() + 1;
    }

    None
}

/// Length of the argument body, i.e. the offset of the `}}` closing the tag.
///
/// The tag ends at the nearest `}}`. The one exception is a body that opens
/// with its own object, as in `{"x":"1"}`: when that object closes and is
/// directly followed by `}}`, that `}}` ends the tag.
fn find_body_end(body: &str) -> Option<usize> {
    let nearest = body.find("}}")?;

    if body.trim_start().starts_with('{') {
        Some(object_end(body).unwrap_or(nearest))
    } else {
        Some(nearest)
    }
}

/// Offset of the `}}` following the JSON object `body` starts with.
///
/// Braces inside string literals are not counted. Returns `None` when the
/// object never closes or is followed by anything but `}}`.
fn object_end(body: &str) -> Option<usize> {
    let start = body.len() - body.trim_start().len();
    let bytes = body.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    let rest = &body[i + 1..];
                    let gap = rest.len() - rest.trim_start().len();
                    return rest[gap..].starts_with("}}").then_some(i + 1 + gap);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(text: &str) -> Option<(&str, &str, &str)> {
        find_first_tag(text).map(|t| (&text[t.span.clone()], t.name, t.raw_args))
    }

    #[test]
    fn test_no_tags() {
        assert_eq!(tag("plain markdown {{title}} and {braces}"), None);
        assert_eq!(tag(""), None);
    }

    #[test]
    fn test_simple_tags() {
        assert_eq!(
            tag("before !{{card}{}} after"),
            Some(("!{{card}{}}", "card", ""))
        );
        assert_eq!(
            tag(r#"!{{card}{ "title": "Hi" }}"#),
            Some((r#"!{{card}{ "title": "Hi" }}"#, "card", r#" "title": "Hi" "#))
        );
    }

    #[test]
    fn test_braced_body() {
        let text = r#"x !{{foo}{{"x":"1"}}} y"#;
        assert_eq!(
            tag(text),
            Some((r#"!{{foo}{{"x":"1"}}}"#, "foo", r#"{"x":"1"}"#))
        );
        assert_eq!(tag("!{{foo}{{}}}"), Some(("!{{foo}{{}}}", "foo", "{}")));
    }

    #[test]
    fn test_braces_inside_strings() {
        let text = r#"!{{foo}{{"code": "}}"}}}"#;
        assert_eq!(tag(text), Some((text, "foo", r#"{"code": "}}"}"#)));

        // Without its own braces the body ends at the nearest `}}`.
        assert_eq!(
            tag(r#"!{{foo}{"code": "}}"}}"#),
            Some((r#"!{{foo}{"code": "}}"#, "foo", r#""code": ""#))
        );
    }

    #[test]
    fn test_stray_quote_does_not_swallow_text() {
        let text = r#"!{{t}{ "x": "1 }} keep "this }} tail"#;
        let found = find_first_tag(text).unwrap();
        assert_eq!(found.raw_args, r#" "x": "1 "#);
        assert_eq!(&text[found.span.end..], r#" keep "this }} tail"#);

        let text = r#"!{{t}{ {"x": "1 }} keep "this }} tail"#;
        let found = find_first_tag(text).unwrap();
        assert_eq!(found.raw_args, r#" {"x": "1 "#);
        assert_eq!(&text[found.span.end..], r#" keep "this }} tail"#);
    }

    #[test]
    fn test_object_followed_by_text_falls_back_to_nearest_close() {
        assert_eq!(
            tag(r#"!{{foo}{{"a": 1}, "b" }} rest"#),
            Some((r#"!{{foo}{{"a": 1}, "b" }}"#, "foo", r#"{"a": 1}, "b" "#))
        );
    }

    #[test]
    fn test_multiline_body() {
        let text = "!{{note}{\n  \"kind\": \"tip\",\n  \"body\": \"x\"\n}}\nrest";
        let (span, name, raw) = tag(text).unwrap();
        assert_eq!(name, "note");
        assert!(raw.contains("\"kind\": \"tip\""));
        assert!(span.ends_with("}}"));
    }

    #[test]
    fn test_unbalanced_body_falls_back_to_nearest_close() {
        assert_eq!(
            tag("!{{foo}{ { not json }}"),
            Some(("!{{foo}{ { not json }}", "foo", " { not json "))
        );
    }

    #[test]
    fn test_unterminated_head_is_skipped() {
        assert_eq!(tag("!{{broken}{ no end"), None);
        assert_eq!(
            tag("!{{broken}{ {{{ !{{ok}{}}"),
            Some(("!{{broken}{ {{{ !{{ok}{}}", "broken", " {{{ !{{ok}{"))
        );
        assert_eq!(tag("!{{x}y}} !{{ok}{}}"), Some(("!{{ok}{}}", "ok", "")));
    }

    #[test]
    fn test_first_tag_wins() {
        let text = "!{{a}{}} and !{{b}{}}";
        assert_eq!(tag(text), Some(("!{{a}{}}", "a", "")));
    }

    #[test]
    fn test_name_may_contain_open_brace() {
        assert_eq!(tag("!{{a{b}{}}"), Some(("!{{a{b}{}}", "a{b", "")));
        assert_eq!(tag("!{{!{{a}{}}"), Some(("!{{!{{a}{}}", "!{{a", "")));
    }
}
