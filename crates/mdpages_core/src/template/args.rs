//! Tag arguments and placeholder substitution.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Placeholder name to substituted value.
pub type ArgumentMap = BTreeMap<String, String>;

/// Parses the argument body of a tag.
///
/// The body is a JSON object whose outer braces may be omitted, so
/// `"title": "Hi"` and `{"title": "Hi"}` are equivalent. An empty body or `{}`
/// yields no arguments.
pub fn parse_args(name: &str, raw_args: &str) -> Result<ArgumentMap, serde_json::Error> {
    let trimmed = raw_args.trim();

    if trimmed.is_empty() || trimmed == "{}" {
        tracing::debug!(name, "Template tag has no arguments");
        return Ok(ArgumentMap::new());
    }

    let object: Map<String, Value> = if is_wrapped_in_braces(trimmed) {
        serde_json::from_str(trimmed)?
    } else {
        tracing::debug!(name, raw_args = trimmed, "Wrapping bare template arguments in braces");
        serde_json::from_str(&format!("{{{trimmed}}}"))?
    };

    let args: ArgumentMap = object
        .into_iter()
        .map(|(key, value)| (key, value_to_string(value)))
        .collect();

    tracing::debug!(name, ?args, "Parsed template arguments");

    Ok(args)
}

/// Strings are substituted raw, everything else as its JSON text.
fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Whether the leading `{` is closed by the trailing `}`.
///
/// `{"a": 1}, {"b": 2}` starts and ends with braces but is not a single
/// object, so it still gets wrapped (and then fails to parse).
fn is_wrapped_in_braces(s: &str) -> bool {
    if !s.starts_with('{') || !s.ends_with('}') {
        return false;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in s.bytes().enumerate() {
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
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i == s.len() - 1;
                }
            }
            _ => {}
        }
    }

    false
}

/// Replaces every `{{key}}` whose key is in `args` with its value.
///
/// This is a single left-to-right pass: substituted values are never scanned
/// again, and placeholders without an argument are kept literally.
pub fn substitute(content: &str, args: &ArgumentMap) -> String {
    if args.is_empty() {
        return content.to_string();
    }

    let mut output = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(open) = rest.find("{{") {
        output.push_str(&rest[..open]);
        let candidate = &rest[open + 2..];

        let replaced = candidate.find("}}").and_then(|close| {
            args.get(&candidate[..close])
                .map(|value| (value, open + 2 + close + 2))
        });

        match replaced {
            Some((value, consumed)) => {
                output.push_str(value);
                rest = &rest[consumed..];
            }
            None => {
                // Advance by a single brace so `{{{key}}}` still finds `{{key}}`.
                output.push('{');
                rest = &rest[open + 1..];
            }
        }
    }

    output.push_str(rest);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> ArgumentMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_args() {
        assert!(parse_args("t", "").unwrap().is_empty());
        assert!(parse_args("t", "   \n ").unwrap().is_empty());
        assert!(parse_args("t", "{}").unwrap().is_empty());
        assert!(parse_args("t", " {} ").unwrap().is_empty());
    }

    #[test]
    fn test_bare_pairs_are_auto_braced() {
        let bare = parse_args("foo", r#""x":"1""#).unwrap();
        let braced = parse_args("foo", r#"{"x":"1"}"#).unwrap();
        assert_eq!(bare, args(&[("x", "1")]));
        assert_eq!(bare, braced);
    }

    #[test]
    fn test_non_string_values_are_coerced() {
        let parsed =
            parse_args("t", r#""n": 3, "ok": true, "none": null, "list": [1, "a"]"#).unwrap();
        assert_eq!(
            parsed,
            args(&[("n", "3"), ("ok", "true"), ("none", "null"), ("list", r#"[1,"a"]"#)])
        );
    }

    #[test]
    fn test_invalid_json() {
        assert!(parse_args("foo", " not json ").is_err());
        assert!(parse_args("foo", r#""x": "#).is_err());
        assert!(parse_args("foo", r#"{"a": 1}, {"b": 2}"#).is_err());
    }

    #[test]
    fn test_non_object_arguments_are_rejected() {
        // Wrapping turns these into `{[1, 2]}` and `{"x"}`, neither is an object.
        assert!(parse_args("foo", "[1, 2]").is_err());
        assert!(parse_args("foo", r#""x""#).is_err());
    }

    #[test]
    fn test_is_wrapped_in_braces() {
        assert!(is_wrapped_in_braces("{}"));
        assert!(is_wrapped_in_braces(r#"{"a": {"b": "}"}}"#));
        assert!(!is_wrapped_in_braces(r#"{"a": 1}, {"b": 2}"#));
        assert!(!is_wrapped_in_braces(r#""a": 1"#));
    }

    #[test]
    fn test_substitute() {
        let a = args(&[("title", "Hello"), ("who", "world")]);
        assert_eq!(
            substitute("# {{title}}, {{who}}! {{title}}", &a),
            "# Hello, world! Hello"
        );
    }

    #[test]
    fn test_missing_keys_survive() {
        let a = args(&[("title", "Hello")]);
        assert_eq!(
            substitute("{{title}} by {{author}}", &a),
            "Hello by {{author}}"
        );
        assert_eq!(substitute("{{author}}", &ArgumentMap::new()), "{{author}}");
    }

    #[test]
    fn test_substitution_is_not_recursive() {
        let a = args(&[("a", "{{b}}"), ("b", "B")]);
        assert_eq!(substitute("{{a}} {{b}}", &a), "{{b}} B");
    }

    #[test]
    fn test_substitute_edge_cases() {
        let a = args(&[("x", "1")]);
        assert_eq!(substitute("{{{x}}}", &a), "{1}");
        assert_eq!(substitute("{{x", &a), "{{x");
        assert_eq!(substitute("{{ x }}", &a), "{{ x }}");
        assert_eq!(substitute("ünï {{x}} cödé", &a), "ünï 1 cödé");
    }
}
