//! Stream event types and `data:` line parsing.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Marker preceding the JSON payload of a meaningful line.
pub const DATA_PREFIX: &str = "data: ";

/// Event kinds understood by the decoder.
pub const KNOWN_EVENT_TYPES: [&str; 6] = ["token", "sources", "thinking", "final_response", "done", "error"];

/// One decoded event, in wire order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Token {
        #[serde(default, deserialize_with = "lenient_text")]
        content: String,
    },
    /// The payload must be present and is passed through untouched.
    Sources { sources: Value },
    Thinking {
        #[serde(default, deserialize_with = "lenient_text")]
        content: String,
    },
    FinalResponse {
        #[serde(default, deserialize_with = "lenient_text")]
        content: String,
    },
    Done,
    Error {
        #[serde(default = "unknown_error", deserialize_with = "lenient_message")]
        message: String,
    },
}

fn unknown_error() -> String {
    "Unknown error".to_string()
}

/// Strings as-is, `null` as empty, anything else as its JSON text.
fn text_or<'de, D>(deserializer: D, on_null: fn() -> String) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => on_null(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    text_or(deserializer, String::new)
}

fn lenient_message<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    text_or(deserializer, unknown_error)
}

/// Classification of a single complete line.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    Event(StreamEvent),
    /// Valid JSON with a `type` this decoder does not know.
    Unknown(String),
    /// Not a `data:` line (blank separators, comments, other fields).
    Ignored,
    /// A `data:` line whose payload could not be parsed.
    Invalid(String),
}

pub fn parse_line(line: &str) -> ParsedLine {
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return ParsedLine::Ignored;
    };

    let value: Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(e) => return ParsedLine::Invalid(e.to_string()),
    };

    let kind = match value.get("type").and_then(Value::as_str) {
        Some(kind) => kind.to_string(),
        None => return ParsedLine::Invalid("missing \"type\" field".to_string()),
    };

    if !KNOWN_EVENT_TYPES.contains(&kind.as_str()) {
        return ParsedLine::Unknown(kind);
    }

    match serde_json::from_value(value) {
        Ok(event) => ParsedLine::Event(event),
        Err(e) => ParsedLine::Invalid(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_each_kind() {
        assert_eq!(
            parse_line(r#"data: {"type":"token","content":"hi"}"#),
            ParsedLine::Event(StreamEvent::Token { content: "hi".into() })
        );
        assert_eq!(
            parse_line(r#"data: {"type":"thinking","content":"hmm"}"#),
            ParsedLine::Event(StreamEvent::Thinking { content: "hmm".into() })
        );
        assert_eq!(
            parse_line(r#"data: {"type":"final_response","content":"ok"}"#),
            ParsedLine::Event(StreamEvent::FinalResponse { content: "ok".into() })
        );
        assert_eq!(parse_line(r#"data: {"type":"done"}"#), ParsedLine::Event(StreamEvent::Done));
        assert_eq!(
            parse_line(r#"data: {"type":"error","message":"rate limited"}"#),
            ParsedLine::Event(StreamEvent::Error { message: "rate limited".into() })
        );
    }

    #[test]
    fn test_sources_pass_through() {
        let line = r#"data: {"type":"sources","sources":[{"title":"FAQ","url":"/faq","score":0.93},"raw"]}"#;
        assert_eq!(
            parse_line(line),
            ParsedLine::Event(StreamEvent::Sources {
                sources: json!([{"title": "FAQ", "url": "/faq", "score": 0.93}, "raw"]),
            })
        );
    }

    #[test]
    fn test_invalid_and_ignored() {
        assert!(matches!(parse_line("data: not-json"), ParsedLine::Invalid(_)));
        assert!(matches!(parse_line(r#"data: {"content":"x"}"#), ParsedLine::Invalid(_)));
        assert_eq!(parse_line(""), ParsedLine::Ignored);
        assert_eq!(parse_line(": keep-alive"), ParsedLine::Ignored);
        assert_eq!(parse_line(r#"event: {"type":"token"}"#), ParsedLine::Ignored);
        // The marker includes the space
        assert_eq!(parse_line(r#"data:{"type":"done"}"#), ParsedLine::Ignored);
    }

    #[test]
    fn test_unknown_type() {
        assert_eq!(parse_line(r#"data: {"type":"ping"}"#), ParsedLine::Unknown("ping".into()));
    }

    #[test]
    fn test_mistyped_payload_still_dispatched() {
        assert_eq!(
            parse_line(r#"data: {"type":"token","content":null}"#),
            ParsedLine::Event(StreamEvent::Token { content: String::new() })
        );
        assert_eq!(
            parse_line(r#"data: {"type":"thinking","content":42}"#),
            ParsedLine::Event(StreamEvent::Thinking { content: "42".into() })
        );
        assert_eq!(
            parse_line(r#"data: {"type":"error","message":null}"#),
            ParsedLine::Event(StreamEvent::Error { message: "Unknown error".into() })
        );
        assert_eq!(
            parse_line(r#"data: {"type":"error","message":{"code":429}}"#),
            ParsedLine::Event(StreamEvent::Error { message: r#"{"code":429}"#.into() })
        );
    }

    #[test]
    fn test_sources_must_be_present() {
        assert!(matches!(parse_line(r#"data: {"type":"sources"}"#), ParsedLine::Invalid(_)));
        assert_eq!(
            parse_line(r#"data: {"type":"sources","sources":null}"#),
            ParsedLine::Event(StreamEvent::Sources { sources: Value::Null })
        );
    }

    #[test]
    fn test_missing_payload_fields_default() {
        assert_eq!(
            parse_line(r#"data: {"type":"token"}"#),
            ParsedLine::Event(StreamEvent::Token { content: String::new() })
        );
        assert_eq!(
            parse_line(r#"data: {"type":"error"}"#),
            ParsedLine::Event(StreamEvent::Error { message: "Unknown error".into() })
        );
    }
}
