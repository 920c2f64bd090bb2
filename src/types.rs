//! Core data types for the Argus evaluation core
//!
//! Defines the value types threaded through an evaluation pass: retrieved
//! context fragments, judge verdicts, and the final outcome handed back to
//! the caller. Everything here is created fresh per request and never
//! mutated after construction; persistence belongs to the outcome recorder.

use serde::{Deserialize, Serialize};

/// A retrieved text snippet with a provenance label
///
/// The source identifier is typically the original PDF filename the chunk
/// was split from. Fragments arrive as a finite ordered sequence per answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFragment {
    /// Snippet text as returned by the retriever
    pub text: String,

    /// Provenance label (source document identifier)
    pub source: String,
}

impl ContextFragment {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
        }
    }
}

/// An answer together with the fragments that supported it
///
/// What an answer source returns for a question. Passed by value; there is
/// no shared retrieval state inside the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcedAnswer {
    pub answer: String,
    pub sources: Vec<ContextFragment>,
}

/// A quality judgment over (question, answer)
///
/// Produced once per evaluation pass by parsing the quality judge's raw
/// response. Scores are always within 1-5; out-of-range judge output is
/// clamped at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgment {
    /// Quality score on a 1-5 scale
    pub score: u8,

    /// Short free-text reasoning from the judge
    pub justification: String,

    /// Whether the judge asked for a regeneration pass
    pub retry_needed: bool,
}

impl Judgment {
    /// Build a judgment, clamping the score into the 1-5 range
    pub fn new(score: i64, justification: impl Into<String>, retry_needed: bool) -> Self {
        Self {
            score: score.clamp(1, 5) as u8,
            justification: justification.into(),
            retry_needed,
        }
    }
}

/// Faithfulness verdict from the context-aware judge call
///
/// Distinct from [`Judgment`]: this comes from a separate judge invocation
/// that sees the retrieved context. `faithful` is `None` when the response
/// carried no parseable verdict line; consumers treat that as not-faithful
/// but the explanation keeps the full raw response for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaithfulnessVerdict {
    pub faithful: Option<bool>,
    pub explanation: String,
}

impl FaithfulnessVerdict {
    /// Whether downstream consumers should treat the answer as grounded
    pub fn is_faithful(&self) -> bool {
        self.faithful.unwrap_or(false)
    }
}

/// The unit returned to the caller after an evaluation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    pub question: String,

    /// The draft answer, or the regenerated answer when a retry ran
    pub final_answer: String,

    /// Judgment from the last accepted pass (the retried answer is not
    /// re-judged)
    pub judgment: Judgment,

    pub retry_applied: bool,

    /// The judge's justification, surfaced verbatim when a retry ran
    pub retry_justification: Option<String>,
}

/// Structured record emitted to the tracing sink after every loop invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub user_id: String,
    pub session_id: String,
    pub question: String,

    /// Chain identifier carried through for dashboard filtering
    pub chain_type: String,

    pub answer: String,
    pub num_sources: usize,
    pub score: u8,
    pub retry_applied: bool,
    pub justification: String,
}
