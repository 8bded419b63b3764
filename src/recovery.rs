//! Best-effort repair of tool-call arguments emitted by a model.
//!
//! Models regularly produce almost-JSON: curly quotes, a missing closing
//! brace, an object wrapped in an extra pair of quotes. [`parse_tool_arguments`]
//! tries a strict parse first and only then runs a fixed sequence of textual
//! fixes before a second and final attempt. It never fails; an argument string
//! that cannot be rescued becomes an empty object.

use serde_json::{Map, Value};

pub type Arguments = Map<String, Value>;

pub fn parse_tool_arguments(raw: &str) -> Arguments {
    if raw.is_empty() {
        return Arguments::new();
    }

    if let Ok(arguments) = parse_object(raw) {
        return arguments;
    }

    let cleaned = clean_json_string(raw);
    match parse_object(&cleaned) {
        Ok(arguments) => arguments,
        Err(error) => {
            tracing::warn!(
                original = raw,
                cleaned = cleaned.as_str(),
                error = %error,
                "failed to parse tool arguments"
            );
            Arguments::new()
        }
    }
}

/// Applies every repair step in order. Each step runs unconditionally.
pub fn clean_json_string(raw: &str) -> String {
    let mut cleaned = raw.trim();

    // `{}{"a": 1}`: an empty object glued in front of the real one
    if cleaned.starts_with("{}{") {
        cleaned = &cleaned[2..];
    }

    if cleaned.len() >= 2 && cleaned.starts_with("\"{") && cleaned.ends_with("}\"") {
        cleaned = &cleaned[1..cleaned.len() - 1];
    }

    let mut cleaned = cleaned
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace('\n', " ")
        .replace("\\\"", "\"")
        .replace("\\\\", "\\");

    let open_braces = cleaned.matches('{').count();
    let close_braces = cleaned.matches('}').count();
    if open_braces > close_braces {
        cleaned.push_str(&"}".repeat(open_braces - close_braces));
    }

    cleaned
}

#[derive(Debug, thiserror::Error)]
enum ParseError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}

fn parse_object(data: &str) -> Result<Arguments, ParseError> {
    match serde_json::from_str::<Value>(data)? {
        Value::Object(map) => Ok(map),
        Value::Null => Err(ParseError::NotAnObject("null")),
        Value::Bool(_) => Err(ParseError::NotAnObject("a boolean")),
        Value::Number(_) => Err(ParseError::NotAnObject("a number")),
        Value::String(_) => Err(ParseError::NotAnObject("a string")),
        Value::Array(_) => Err(ParseError::NotAnObject("an array")),
    }
}
