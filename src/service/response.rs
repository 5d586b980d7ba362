//! Extraction of the JSON payload from free-form model output
//!
//! Models wrap their answer in prose or markdown fences often enough that the
//! raw text cannot be handed to `serde_json` directly. The scanner here finds
//! balanced `[...]` / `{...}` spans while tracking string and escape state, so
//! brackets inside string literals never end a span early.

use serde_json::Value;

/// Maximum number of characters of a raw response carried in diagnostics
pub const RECEIVED_PREFIX_LIMIT: usize = 500;

/// The model output could not be turned into the expected JSON shape
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Malformed model response: {diagnostic}")]
pub struct MalformedResponse {
    /// Short description of what went wrong
    pub diagnostic: String,
    /// Bounded prefix of the raw response
    pub received: String,
}

impl MalformedResponse {
    pub fn new(diagnostic: impl Into<String>, raw: &str) -> Self {
        Self {
            diagnostic: diagnostic.into(),
            received: bounded_prefix(raw, RECEIVED_PREFIX_LIMIT),
        }
    }
}

/// First `limit` characters of `raw`, with a `...` marker when truncated
pub fn bounded_prefix(raw: &str, limit: usize) -> String {
    let mut chars = raw.chars();
    let prefix: String = chars.by_ref().take(limit).collect();
    if chars.next().is_some() {
        format!("{}...", prefix)
    } else {
        prefix
    }
}

/// Human-readable JSON type name for diagnostics
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Non-blank string field of a model record, trimmed
pub fn str_field<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// String items of an array field; non-string items are skipped
pub fn string_list(record: &Value, key: &str) -> Vec<String> {
    record
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Find the end (inclusive byte index) of the balanced span opening at `start`.
/// Returns `None` if the span never closes or closes with the wrong bracket.
fn scan_balanced(bytes: &[u8], start: usize) -> Option<usize> {
    let mut expected: Vec<u8> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'[' => expected.push(b']'),
            b'{' => expected.push(b'}'),
            b']' | b'}' => {
                if expected.pop() != Some(byte) {
                    return None;
                }
                if expected.is_empty() {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }

    None
}

/// Balanced top-level spans, left to right. A span that fails to balance is
/// skipped and scanning resumes at the next opening bracket; after a balanced
/// span, scanning resumes past its end.
fn balanced_spans(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut position = 0;

    while position < bytes.len() {
        let Some(relative) = bytes[position..]
            .iter()
            .position(|&b| b == b'[' || b == b'{')
        else {
            break;
        };
        let start = position + relative;

        match scan_balanced(bytes, start) {
            Some(end) => {
                spans.push(&text[start..=end]);
                position = end + 1;
            }
            None => position = start + 1,
        }
    }

    spans
}

/// Top-level JSON shape a caller expects from the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Array,
    Object,
}

impl JsonShape {
    fn matches(self, value: &Value) -> bool {
        match self {
            JsonShape::Array => value.is_array(),
            JsonShape::Object => value.is_object(),
        }
    }
}

/// Parse the model output as JSON.
///
/// The left-most balanced span that parses to the `expected` shape wins. When
/// no span has that shape, the left-most span that parses at all is returned,
/// then the trimmed response itself.
pub fn parse_model_json(raw: &str, expected: JsonShape) -> Result<Value, MalformedResponse> {
    let spans = balanced_spans(raw);

    let mut first_parsed = None;
    let mut first_error = None;
    for span in &spans {
        match serde_json::from_str::<Value>(span) {
            Ok(value) if expected.matches(&value) => return Ok(value),
            Ok(value) => {
                first_parsed.get_or_insert(value);
            }
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    if let Some(value) = first_parsed {
        return Ok(value);
    }

    let error = match first_error {
        Some(e) => e,
        None => match serde_json::from_str::<Value>(raw.trim()) {
            Ok(value) => return Ok(value),
            Err(e) => e,
        },
    };

    tracing::warn!(
        error = %error,
        candidates = spans.len(),
        received = %bounded_prefix(raw, RECEIVED_PREFIX_LIMIT),
        "Model response is not valid JSON"
    );

    Err(MalformedResponse::new(
        format!("Response is not valid JSON: {}", error),
        raw,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_spans_of_plain_array() {
        assert_eq!(balanced_spans(" [1, 2] "), vec!["[1, 2]"]);
    }

    #[test]
    fn test_spans_from_code_fence_and_prose() {
        let raw = "Here is my analysis:\n```json\n[{\"name\": \"Straw Man\"}]\n```\nHope this helps!";
        assert_eq!(balanced_spans(raw), vec!["[{\"name\": \"Straw Man\"}]"]);
    }

    #[test]
    fn test_brackets_inside_strings_do_not_end_span() {
        let raw = r#"Result: {"explanation": "uses ] and } freely", "quote": "a \"[quoted]\" span"} trailing"#;
        let value = parse_model_json(raw, JsonShape::Object).unwrap();

        assert_eq!(value["quote"], "a \"[quoted]\" span");
        assert_eq!(value["explanation"], "uses ] and } freely");
    }

    #[test]
    fn test_nested_structures_extracted_whole() {
        let raw = r#"{"misconceptions": [{"examples": ["a", "b"]}], "frameworkAnalysis": {"x": 1}}"#;
        assert_eq!(balanced_spans(raw), vec![raw]);
    }

    #[test]
    fn test_unbalanced_text_has_no_spans() {
        assert!(balanced_spans("  [1, 2  ").is_empty());
        assert!(parse_model_json("  [1, 2  ", JsonShape::Array).is_err());
    }

    #[test]
    fn test_mismatched_closer_is_skipped() {
        assert_eq!(balanced_spans("oops [1, 2} then [3]"), vec!["[3]"]);
    }

    #[test]
    fn test_parse_skips_bracketed_prose() {
        let raw = "I found [two] issues: [{\"name\": \"Straw Man\"}]";
        let value = parse_model_json(raw, JsonShape::Array).unwrap();
        assert_eq!(value, json!([{"name": "Straw Man"}]));
    }

    #[test]
    fn test_footnote_before_object_payload() {
        let raw = "Per the framework [1], here is the analysis:\n```json\n{\"misconceptions\": []}\n```";
        let value = parse_model_json(raw, JsonShape::Object).unwrap();
        assert_eq!(value, json!({"misconceptions": []}));
    }

    #[test]
    fn test_other_shape_returned_when_expected_one_is_absent() {
        let value = parse_model_json("Answer: [1, 2]", JsonShape::Object).unwrap();
        assert_eq!(value, json!([1, 2]));
    }

    #[test]
    fn test_parse_empty_array() {
        assert_eq!(parse_model_json("[]", JsonShape::Array).unwrap(), json!([]));
    }

    #[test]
    fn test_plain_prose_is_malformed() {
        let err = parse_model_json("I could not find any fallacies in this text.", JsonShape::Array).unwrap_err();

        assert!(err.diagnostic.contains("not valid JSON"));
        assert_eq!(err.received, "I could not find any fallacies in this text.");
    }

    #[test]
    fn test_malformed_prefix_is_capped() {
        let raw = "x".repeat(2000);
        let err = parse_model_json(&raw, JsonShape::Array).unwrap_err();

        assert_eq!(err.received.chars().count(), RECEIVED_PREFIX_LIMIT + 3);
        assert!(err.received.ends_with("..."));
    }

    #[test]
    fn test_bounded_prefix_respects_char_boundaries() {
        let raw = "é".repeat(600);
        let prefix = bounded_prefix(&raw, 500);

        assert_eq!(prefix.chars().count(), 503);
        assert_eq!(bounded_prefix("short", 500), "short");
    }

    #[test]
    fn test_field_helpers() {
        let record = json!({
            "name": "  Straw Man ",
            "blank": "   ",
            "count": 3,
            "examples": ["a", 1, " ", "b "]
        });

        assert_eq!(str_field(&record, "name"), Some("Straw Man"));
        assert_eq!(str_field(&record, "blank"), None);
        assert_eq!(str_field(&record, "count"), None);
        assert_eq!(str_field(&record, "missing"), None);
        assert_eq!(string_list(&record, "examples"), vec!["a", "b"]);
        assert!(string_list(&record, "name").is_empty());
    }

    #[test]
    fn test_non_ascii_text_around_payload() {
        let raw = "Résumé — voilà: [{\"name\": \"Ad Hominem\", \"quote\": \"naïve\"}] ✓";
        let value = parse_model_json(raw, JsonShape::Array).unwrap();
        assert_eq!(value[0]["quote"], "naïve");
    }
}
