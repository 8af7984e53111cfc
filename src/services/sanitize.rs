//! Cleanup of JSON replies from the language model.
//!
//! Replies often arrive wrapped in markdown fences or carry `//` and `/* */`
//! comments. Both are removed before parsing; comment markers inside string
//! literals are left alone so URLs survive.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Strip fences and comments, then parse.
pub fn sanitize_json_reply(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(&strip_comments(&strip_fences(text)))
}

/// Parse a reply into `T`, returning `fallback` when it is not usable.
pub fn parse_or<T: DeserializeOwned>(text: &str, fallback: T) -> T {
    match sanitize_json_reply(text).and_then(serde_json::from_value::<T>) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Unusable model reply, using fallback");
            fallback
        }
    }
}

fn strip_fences(text: &str) -> String {
    text.replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                // line comment; keep the newline
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn strips_markdown_fences() {
        let reply = "```json\n{\"landCost\": 100}\n```";
        assert_eq!(sanitize_json_reply(reply).unwrap(), json!({"landCost": 100}));
    }

    #[test]
    fn strips_line_and_block_comments() {
        let reply = r#"{
            "a": 1, // first
            /* second
               spans lines */
            "b": 2
        }"#;
        assert_eq!(sanitize_json_reply(reply).unwrap(), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn keeps_comment_markers_inside_strings() {
        let reply = r#"{"source": "https://example.sa/data", "note": "a /* b */ c", "q": "say \"//\""}"#;
        let value = sanitize_json_reply(reply).unwrap();
        assert_eq!(value["source"], "https://example.sa/data");
        assert_eq!(value["note"], "a /* b */ c");
        assert_eq!(value["q"], "say \"//\"");
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Split {
        total: f64,
    }

    #[test]
    fn parse_or_falls_back_on_garbage() {
        let fallback = Split { total: 5.0 };
        assert_eq!(parse_or("not json at all", Split { total: 5.0 }), fallback);
        assert_eq!(
            parse_or("```json\n{\"total\": 7}\n```", Split { total: 5.0 }),
            Split { total: 7.0 }
        );
        assert_eq!(parse_or("{\"other\": 1}", Split { total: 5.0 }), fallback);
    }
}
