//! Scalar quality metrics for an evaluated Q&A
//!
//! A second JSON-scored judge pass rating faithfulness, relevance, and
//! conciseness on 1-5 scales. Parsed with the same fail-soft policy as the
//! retry judgment: a corrupt response pins every axis at 1 and keeps a
//! diagnostic, so the analytics rows always exist.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::evaluation::heuristic::char_prefix;
use crate::evaluation::reflection::Generator;
use crate::types::ContextFragment;

/// Fragments are truncated to this many characters in the metrics prompt
const METRICS_CONTEXT_CHARS: usize = 1000;

const METRICS_PROMPT_TEMPLATE: &str = "\
Question: {question}
Answer: {answer}
Context: {context}

Evaluate the answer with respect to the given context.
Respond in JSON with: faithfulness (1-5), relevance (1-5), conciseness (1-5), justification";

/// 1-5 scores over the three dashboard axes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerMetrics {
    pub faithfulness: u8,
    pub relevance: u8,
    pub conciseness: u8,
    pub justification: String,
}

/// Run the metrics judge pass over an evaluated Q&A
///
/// The metrics call is a plain prompt-to-text completion, issued at
/// temperature zero through the same generation capability the retry pass
/// uses.
pub async fn collect_metrics(
    llm: &dyn Generator,
    question: &str,
    answer: &str,
    sources: &[ContextFragment],
) -> Result<AnswerMetrics> {
    let context = sources
        .iter()
        .map(|f| char_prefix(&f.text, METRICS_CONTEXT_CHARS))
        .collect::<Vec<_>>()
        .join("\n\n");

    let prompt = METRICS_PROMPT_TEMPLATE
        .replace("{question}", question)
        .replace("{answer}", answer)
        .replace("{context}", &context);

    let raw = llm.generate(&prompt, 0.0).await?;
    Ok(parse_metrics(&raw))
}

/// Parse the metrics judge response, failing soft on corrupt payloads
pub fn parse_metrics(raw: &str) -> AnswerMetrics {
    let value: Value = match serde_json::from_str(raw.trim()) {
        Ok(v) => v,
        Err(e) => {
            debug!("metrics response was not valid JSON: {}", e);
            return AnswerMetrics {
                faithfulness: 1,
                relevance: 1,
                conciseness: 1,
                justification: format!("Failed to parse metrics response: {}", e),
            };
        }
    };

    AnswerMetrics {
        faithfulness: axis(&value, "faithfulness"),
        relevance: axis(&value, "relevance"),
        conciseness: axis(&value, "conciseness"),
        justification: value
            .get("justification")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
    }
}

/// Read one 1-5 axis, defaulting a missing value to 1
fn axis(value: &Value, key: &str) -> u8 {
    value
        .get(key)
        .and_then(Value::as_i64)
        .unwrap_or(1)
        .clamp(1, 5) as u8
}
