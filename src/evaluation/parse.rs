//! Parsers for raw judge responses
//!
//! Pure transformations from judge output text into validated verdicts.
//! The quality judge is asked for JSON but models routinely return fenced
//! or slightly broken payloads, so parsing fails soft: a corrupt judgment
//! becomes "score 1, retry needed" instead of an error, favoring a retry
//! over trusting garbage. The faithfulness judge replies in line-oriented
//! `key: value` text and is scanned case-insensitively.

use serde_json::Value;
use tracing::debug;

use crate::types::{FaithfulnessVerdict, Judgment};

/// Parse a quality judge response into a [`Judgment`]
///
/// Expected payload: `{"score": 1-5, "justification": "...", "retry_needed":
/// bool}`. A missing justification defaults to empty and a missing
/// `retry_needed` to false, but a missing or non-numeric score is treated
/// as a parse failure. Any failure yields the fail-soft judgment: score 1,
/// retry requested, diagnostic in the justification.
pub fn parse_judgment(raw: &str) -> Judgment {
    let cleaned = strip_code_fence(raw);

    let value: Value = match serde_json::from_str(cleaned) {
        Ok(v) => v,
        Err(e) => {
            debug!("Judgment response was not valid JSON: {}", e);
            return parse_failure(format!("Failed to parse judgment response: {}", e));
        }
    };

    let score = match value.get("score").and_then(coerce_int) {
        Some(s) => s,
        None => {
            debug!("Judgment response had no usable score field");
            return parse_failure(
                "Failed to parse judgment response: missing or non-numeric score".to_string(),
            );
        }
    };

    let justification = value
        .get("justification")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    let retry_needed = value
        .get("retry_needed")
        .and_then(coerce_bool)
        .unwrap_or(false);

    Judgment::new(score, justification, retry_needed)
}

/// Parse a faithfulness judge response into a [`FaithfulnessVerdict`]
///
/// Scans line by line for `faithful:` (value starting with `y` counts as
/// yes, anything else as no) and `explanation:`. When no verdict line
/// exists `faithful` stays unknown; when no explanation line exists the
/// entire raw response becomes the explanation so nothing is lost for
/// audit.
pub fn parse_faithfulness(raw: &str) -> FaithfulnessVerdict {
    let mut faithful = None;
    let mut explanation = String::new();

    for line in raw.lines() {
        let lowered = line.to_lowercase();
        if lowered.starts_with("faithful:") {
            let answer = line
                .splitn(2, ':')
                .nth(1)
                .map(|s| s.trim().to_lowercase())
                .unwrap_or_default();
            faithful = Some(answer.starts_with('y'));
        } else if lowered.starts_with("explanation:") {
            if let Some(rest) = line.splitn(2, ':').nth(1) {
                explanation = rest.trim().to_string();
            }
        }
    }

    if explanation.is_empty() {
        explanation = raw.to_string();
    }

    FaithfulnessVerdict {
        faithful,
        explanation,
    }
}

fn parse_failure(justification: String) -> Judgment {
    Judgment {
        score: 1,
        justification,
        retry_needed: true,
    }
}

/// Strip a surrounding markdown code fence, if present
///
/// gpt-3.5-class judges often wrap the requested JSON in markdown fences.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let inner = match trimmed.find('\n') {
        Some(idx) => &trimmed[idx + 1..],
        None => return trimmed,
    };
    inner.strip_suffix("```").map(str::trim).unwrap_or(trimmed)
}

/// Coerce a JSON value into an integer score
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Coerce a JSON value into a boolean
fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_judgment_happy_path() {
        let judgment =
            parse_judgment(r#"{"score": 4, "justification": "ok", "retry_needed": false}"#);
        assert_eq!(judgment.score, 4);
        assert_eq!(judgment.justification, "ok");
        assert!(!judgment.retry_needed);
    }

    #[test]
    fn test_parse_judgment_malformed_fails_soft() {
        let judgment = parse_judgment("not json");
        assert_eq!(judgment.score, 1);
        assert!(judgment.retry_needed);
        assert!(judgment.justification.contains("Failed to parse"));
    }

    #[test]
    fn test_parse_judgment_missing_score_fails_soft() {
        let judgment = parse_judgment(r#"{"justification": "fine", "retry_needed": false}"#);
        assert_eq!(judgment.score, 1);
        assert!(judgment.retry_needed);
    }

    #[test]
    fn test_parse_judgment_defaults_for_optional_fields() {
        let judgment = parse_judgment(r#"{"score": 5}"#);
        assert_eq!(judgment.score, 5);
        assert_eq!(judgment.justification, "");
        assert!(!judgment.retry_needed);
    }

    #[test]
    fn test_parse_judgment_clamps_out_of_range_score() {
        let judgment = parse_judgment(r#"{"score": 11, "retry_needed": true}"#);
        assert_eq!(judgment.score, 5);
        assert!(judgment.retry_needed);
    }

    #[test]
    fn test_parse_judgment_coerces_string_score() {
        let judgment = parse_judgment(r#"{"score": "3", "justification": "meh"}"#);
        assert_eq!(judgment.score, 3);
    }

    #[test]
    fn test_parse_judgment_strips_code_fence() {
        let raw = "```json\n{\"score\": 2, \"justification\": \"thin\", \"retry_needed\": true}\n```";
        let judgment = parse_judgment(raw);
        assert_eq!(judgment.score, 2);
        assert!(judgment.retry_needed);
    }

    #[test]
    fn test_parse_judgment_is_idempotent() {
        let raw = r#"{"score": 4, "justification": "ok", "retry_needed": false}"#;
        assert_eq!(parse_judgment(raw), parse_judgment(raw));

        let bad = "{{ nope";
        assert_eq!(parse_judgment(bad), parse_judgment(bad));
    }

    #[test]
    fn test_parse_faithfulness_yes() {
        let verdict = parse_faithfulness("faithful: Yes\nexplanation: matches the context");
        assert_eq!(verdict.faithful, Some(true));
        assert_eq!(verdict.explanation, "matches the context");
    }

    #[test]
    fn test_parse_faithfulness_no_and_case_insensitive() {
        let verdict = parse_faithfulness("Faithful: NO\nExplanation: contradicts the source");
        assert_eq!(verdict.faithful, Some(false));
        assert_eq!(verdict.explanation, "contradicts the source");
    }

    #[test]
    fn test_parse_faithfulness_missing_verdict_line() {
        let raw = "The model rambled instead of answering the rubric.";
        let verdict = parse_faithfulness(raw);
        assert_eq!(verdict.faithful, None);
        assert_eq!(verdict.explanation, raw);
    }

    #[test]
    fn test_parse_faithfulness_missing_explanation_keeps_raw() {
        let raw = "faithful: yes";
        let verdict = parse_faithfulness(raw);
        assert_eq!(verdict.faithful, Some(true));
        assert_eq!(verdict.explanation, raw);
    }
}
