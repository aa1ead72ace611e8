//! Defensive JSON extraction from model output.
//!
//! Models are instructed to emit a lone JSON object but routinely wrap it in
//! prose or Markdown fencing. Extraction runs in tiers:
//!
//! 1. A regex scan for balanced `{...}` spans tolerant of one nesting level;
//!    among multiple candidates the longest wins (the full answer, not a
//!    nested sub-object, is usually the largest match).
//! 2. Brace counting from the first `{`, string-aware, which handles the
//!    arbitrarily deep nesting the shallow regex cannot. When both tiers
//!    produce a span, the longer one is kept, so a deeply nested object
//!    extracts to exactly its source span.
//! 3. With no `{` at all, the trimmed input is returned and the caller's
//!    decode attempt fails explicitly.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

/// Matches `{...}` spans containing at most one level of nested braces.
static SHALLOW_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(?:[^{}]|\{[^{}]*\})*\}").expect("shallow object pattern"));

/// Errors raised when model output cannot be decoded as a JSON object.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("model output is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("model output decoded to {0}, expected a JSON object")]
    NotAnObject(&'static str),
}

/// Pulls the best JSON object candidate out of surrounding text.
pub fn extract_json(text: &str) -> String {
    let mut best: Option<&str> = SHALLOW_OBJECT
        .find_iter(text)
        .map(|m| m.as_str())
        .max_by_key(|s| s.len());

    if let Some(span) = balanced_span(text) {
        if best.map_or(true, |b| span.len() >= b.len()) {
            best = Some(span);
        }
    }

    best.unwrap_or_else(|| text.trim()).to_string()
}

/// Extracts and decodes a JSON object from model output.
pub fn parse_structured(text: &str) -> Result<Map<String, Value>, ExtractError> {
    let candidate = extract_json(text);
    let value: Value =
        serde_json::from_str(&candidate).map_err(|e| ExtractError::InvalidJson(e.to_string()))?;

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Err(ExtractError::NotAnObject("null")),
        Value::Bool(_) => Err(ExtractError::NotAnObject("a boolean")),
        Value::Number(_) => Err(ExtractError::NotAnObject("a number")),
        Value::String(_) => Err(ExtractError::NotAnObject("a string")),
        Value::Array(_) => Err(ExtractError::NotAnObject("an array")),
    }
}

/// Walks from the first `{` and cuts where the brace counter returns to
/// zero. Braces inside JSON strings are ignored.
fn balanced_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;

    let mut depth: u32 = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
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
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn no_brace_returns_trimmed_input() {
        assert_eq!(extract_json("  not json at all \n"), "not json at all");
        assert_eq!(extract_json(""), "");
    }

    #[test]
    fn extracts_bare_object() {
        let text = r#"{"next_action": "scoring"}"#;
        assert_eq!(extract_json(text), text);
    }

    #[test]
    fn extracts_object_from_surrounding_prose() {
        let text = r#"Sure! {"next_action": "scoring", "reasoning": "asked for a grade"} Hope that helps."#;
        assert_eq!(
            extract_json(text),
            r#"{"next_action": "scoring", "reasoning": "asked for a grade"}"#
        );
    }

    #[test]
    fn extracts_object_from_markdown_fence() {
        let text = "```json\n{\"final_response\": \"try the add-node button\"}\n```";
        assert_eq!(
            extract_json(text),
            "{\"final_response\": \"try the add-node button\"}"
        );
    }

    #[test]
    fn deep_nesting_extracts_exact_span() {
        // Three levels; beyond what the shallow regex can cover.
        let object = r#"{"Claim": {"detail": {"score": 3, "feedback": "solid"}}}"#;
        let text = format!("Here you go: {object} — done.");
        assert_eq!(extract_json(&text), object);
    }

    #[test]
    fn braces_inside_strings_do_not_confuse_the_span() {
        let object = r#"{"feedback": "use { and } literally", "score": 2}"#;
        let text = format!("note: {object}");
        assert_eq!(extract_json(&text), object);
    }

    #[test]
    fn stray_open_brace_before_object_falls_back_to_regex() {
        let text = r#"press { to open. {"a": 1}"#;
        assert_eq!(extract_json(text), r#"{"a": 1}"#);
    }

    #[test]
    fn parse_structured_decodes_extracted_object() {
        let map =
            parse_structured(r#"answer: {"next_action": "scoring", "reasoning": "grade"}"#).unwrap();
        assert_eq!(map["next_action"], "scoring");
        assert_eq!(map["reasoning"], "grade");
    }

    #[test]
    fn parse_structured_rejects_plain_prose() {
        let err = parse_structured("not json at all").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidJson(_)));
    }

    #[test]
    fn parse_structured_rejects_truncated_object() {
        let err = parse_structured(r#"{"next_action": "scor"#).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidJson(_)));
    }

    #[test]
    fn parse_structured_rejects_non_object_json() {
        let err = parse_structured(r#"[1, 2, 3]"#).unwrap_err();
        assert_eq!(err, ExtractError::NotAnObject("an array"));
    }

    #[test]
    fn empty_input_fails_decode() {
        assert!(matches!(
            parse_structured(""),
            Err(ExtractError::InvalidJson(_))
        ));
    }

    /// Builds a JSON object nested to the given depth.
    fn nested_object(depth: usize) -> Value {
        let mut value = json!({"score": 3, "feedback": "ok"});
        for _ in 0..depth {
            value = json!({ "inner": value });
        }
        value
    }

    proptest! {
        /// Re-decoding the extracted span yields the same structure as the
        /// embedded object, for any nesting depth and any prose padding
        /// that carries no braces of its own.
        #[test]
        fn embedded_object_round_trips(
            depth in 0usize..6,
            prefix in "[a-zA-Z0-9 .,!]{0,40}",
            suffix in "[a-zA-Z0-9 .,!]{0,40}",
        ) {
            let object = nested_object(depth);
            let source = serde_json::to_string(&object).unwrap();
            let text = format!("{prefix}{source}{suffix}");

            let extracted = extract_json(&text);
            let decoded: Value = serde_json::from_str(&extracted).unwrap();
            prop_assert_eq!(decoded, object);
        }

        /// Inputs with no opening brace come back trimmed, verbatim.
        #[test]
        fn braceless_input_is_trimmed(text in "[a-zA-Z0-9 .,!\n\t]*") {
            prop_assume!(!text.contains('{'));
            prop_assert_eq!(extract_json(&text), text.trim());
        }
    }
}
