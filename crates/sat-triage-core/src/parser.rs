//! Raw observation parser
//!
//! Recovers a JSON object from untrusted model output that may be wrapped in
//! markdown fences or surrounded by prose.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::ParseError;

/// The first well-formed JSON object found in the model text.
pub type ParsedJson = Map<String, Value>;

static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)```(?:json)?").expect("fence pattern is valid"));

/// Extract a JSON object from raw model text.
///
/// Strips code fences, then parses the span from the first `{` to the last
/// `}`. If that span is not valid JSON (for example two objects separated by
/// prose), the first balanced object that parses is used instead.
pub fn parse_observation_text(raw: &str) -> Result<ParsedJson, ParseError> {
    let text = FENCE_RE.replace_all(raw, "");
    let text = text.trim();

    let (start, end) = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => return Err(ParseError::NoJsonObject),
    };

    let outer_err = match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(Value::Object(map)) => return Ok(map),
        Ok(_) => "extracted span is not an object".to_string(),
        Err(e) => e.to_string(),
    };

    for candidate in balanced_objects(text) {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(candidate) {
            tracing::debug!("recovered JSON object from balanced span");
            return Ok(map);
        }
    }

    Err(ParseError::InvalidJson(outer_err))
}

/// Top-level `{...}` spans in `text`, skipping braces inside string literals.
fn balanced_objects(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        spans.push(&text[s..=i]);
                    }
                }
            }
            _ => {}
        }
    }
    spans
}
