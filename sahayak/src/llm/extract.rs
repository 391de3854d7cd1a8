//! Best-effort extraction of structured data from free-form LLM output.
//!
//! Models asked for strict JSON routinely wrap it in prose, code fences, or
//! single quotes. Extraction runs an ordered list of candidate substrings
//! through the parser and returns the first one that parses (and passes the
//! caller's validator, when given). No model retries happen here; callers
//! decide whether to re-prompt or fall back to a default object.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;

use crate::error::{Result, SahayakError};

static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json)?([\s\S]*?)```").unwrap());

/// Extract a value of type `T` from raw model output.
///
/// Equivalent to [`extract_json_with`] with a validator that accepts
/// everything that deserializes.
pub fn extract_json<T: DeserializeOwned>(text: &str) -> Result<T> {
    extract_json_with(text, |_| true)
}

/// Extract a value of type `T` from raw model output, keeping only
/// candidates accepted by `validate`.
///
/// Strategies, in order:
/// 1. the whole text, trimmed;
/// 2. the interior of the first triple-backtick fence (optionally tagged
///    `json`);
/// 3. the greedy span from the first `{` to the last `}`;
/// 4. the whole text with single quotes replaced by double quotes — a
///    last-resort heuristic that corrupts legitimate apostrophes.
///
/// A candidate that parses but fails validation is a soft failure; later
/// strategies still run.
pub fn extract_json_with<T, F>(text: &str, validate: F) -> Result<T>
where
    T: DeserializeOwned,
    F: Fn(&T) -> bool,
{
    let candidates = [
        Some(text.trim().to_string()),
        fenced_block(text),
        brace_span(text),
        Some(text.replace('\'', "\"")),
    ];

    for candidate in candidates.into_iter().flatten() {
        if let Ok(value) = serde_json::from_str::<T>(&candidate) {
            if validate(&value) {
                return Ok(value);
            }
        }
    }

    Err(SahayakError::Extraction(
        "could not extract structured data".to_string(),
    ))
}

fn fenced_block(text: &str) -> Option<String> {
    FENCED_BLOCK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn brace_span(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(text[start..=end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::Value;

    #[derive(Debug, Deserialize, PartialEq)]
    struct CropSuggestions {
        message: String,
        #[serde(rename = "suggestedCrops")]
        suggested_crops: Vec<Crop>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Crop {
        name: String,
        rationale: String,
    }

    #[test]
    fn test_extract_strict_json() {
        let value: Value = extract_json(r#"{"message": "ok"}"#).unwrap();
        assert_eq!(value["message"], "ok");
    }

    #[test]
    fn test_extract_from_fenced_block_with_prose() {
        let text = "Here is the data:\n```json\n{\"message\":\"ok\",\"suggestedCrops\":[{\"name\":\"Rice\",\"rationale\":\"wet climate\"}]}\n```";
        let result: CropSuggestions = extract_json(text).unwrap();
        assert_eq!(result.message, "ok");
        assert_eq!(result.suggested_crops.len(), 1);
        assert_eq!(result.suggested_crops[0].name, "Rice");
        assert_eq!(result.suggested_crops[0].rationale, "wet climate");
    }

    #[test]
    fn test_extract_from_untagged_fence() {
        let text = "```\n{\"message\": \"hi\"}\n```";
        let value: Value = extract_json(text).unwrap();
        assert_eq!(value["message"], "hi");
    }

    #[test]
    fn test_extract_brace_span_among_prose() {
        let text = "Sure! Here's what I found: {\"message\": \"embedded\"} Hope that helps.";
        let value: Value = extract_json(text).unwrap();
        assert_eq!(value["message"], "embedded");
    }

    #[test]
    fn test_extract_single_quoted_pseudo_json() {
        let text = "{'message': 'single quoted'}";
        let value: Value = extract_json(text).unwrap();
        assert_eq!(value["message"], "single quoted");
    }

    #[test]
    fn test_extract_no_json_fails_cleanly() {
        let result: Result<Value> = extract_json("The weather is lovely today.");
        assert!(matches!(result, Err(SahayakError::Extraction(_))));
    }

    #[test]
    fn test_validator_reject_is_soft_failure() {
        // The whole text parses as an array, which the validator rejects;
        // the brace-span strategy then yields the inner object.
        let text = r#"[{"message": "ok"}]"#;
        let value: Value =
            extract_json_with(text, |v: &Value| v.get("message").is_some()).unwrap();
        assert_eq!(value["message"], "ok");
    }

    #[test]
    fn test_validator_rejects_everything() {
        let result: Result<Value> = extract_json_with(r#"{"a": 1}"#, |_| false);
        assert!(result.is_err());
    }

    #[test]
    fn test_first_accepted_candidate_wins() {
        // Both the fence and a later brace span parse; the fence comes first.
        let text = "```json\n{\"which\": \"fence\"}\n```\nAlso: {\"which\": \"span\"}";
        let value: Value = extract_json(text).unwrap();
        assert_eq!(value["which"], "fence");
    }
}
