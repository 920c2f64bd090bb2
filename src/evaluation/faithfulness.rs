//! Judge-based faithfulness pass
//!
//! Sends (question, answer, concatenated context) to the faithfulness judge
//! and parses its line-oriented verdict. Runs separately from the retry
//! loop; dashboards join this verdict with the overlap heuristic to spot
//! ungrounded answers.

use tracing::debug;

use crate::error::Result;
use crate::evaluation::parse::parse_faithfulness;
use crate::evaluation::reflection::Judge;
use crate::types::{ContextFragment, FaithfulnessVerdict};

/// Check whether an answer is faithful to its retrieved context
///
/// Fragment texts are joined with newlines into the context block, in
/// retrieval order. A judge transport failure propagates; an unparseable
/// verdict does not (it comes back as unknown with the raw text kept).
pub async fn check_faithfulness(
    judge: &dyn Judge,
    question: &str,
    answer: &str,
    sources: &[ContextFragment],
) -> Result<FaithfulnessVerdict> {
    let context = sources
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let raw = judge.judge_faithfulness(question, answer, &context).await?;
    let verdict = parse_faithfulness(&raw);
    debug!(faithful = ?verdict.faithful, "faithfulness verdict parsed");
    Ok(verdict)
}
