//! Append-only CSV rows for the analytics dashboards
//!
//! One row per evaluated Q&A, written to flat CSV files the dashboards
//! read directly. The core never reads these back. Column names are part
//! of the dashboard contract and must not change.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::evaluation::heuristic::{answer_grounded, DEFAULT_MIN_OVERLAP};
use crate::evaluation::metrics::AnswerMetrics;
use crate::types::{ContextFragment, FaithfulnessVerdict};

/// Row for the faithfulness results file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalRow {
    pub question: String,
    pub answer: String,
    pub num_sources: usize,
    /// Overlap-heuristic grounding signal
    pub answer_grounded: bool,
    /// Judge verdict; `None` when the judge gave no parseable verdict
    pub faithful: Option<bool>,
    /// Judge explanation (or raw response when unparseable)
    pub feedback: String,
}

impl EvalRow {
    const HEADER: &'static [&'static str] = &[
        "question",
        "answer",
        "num_sources",
        "answer_based_on_sources",
        "faithful",
        "llm_feedback",
    ];

    /// Assemble a row from an evaluated Q&A, computing the grounding
    /// heuristic over the retrieved fragments
    pub fn from_evaluation(
        question: &str,
        answer: &str,
        sources: &[ContextFragment],
        verdict: &FaithfulnessVerdict,
    ) -> Self {
        Self {
            question: question.to_string(),
            answer: answer.to_string(),
            num_sources: sources.len(),
            answer_grounded: answer_grounded(answer, sources, DEFAULT_MIN_OVERLAP),
            faithful: verdict.faithful,
            feedback: verdict.explanation.clone(),
        }
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.question.clone(),
            self.answer.clone(),
            self.num_sources.to_string(),
            self.answer_grounded.to_string(),
            match self.faithful {
                Some(true) => "true".to_string(),
                Some(false) => "false".to_string(),
                None => "unknown".to_string(),
            },
            self.feedback.clone(),
        ]
    }
}

/// Row for the scalar metrics file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsRow {
    pub question: String,
    pub answer: String,
    pub metrics: AnswerMetrics,
}

impl MetricsRow {
    const HEADER: &'static [&'static str] = &[
        "question",
        "answer",
        "faithfulness",
        "relevance",
        "conciseness",
        "justification",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.question.clone(),
            self.answer.clone(),
            self.metrics.faithfulness.to_string(),
            self.metrics.relevance.to_string(),
            self.metrics.conciseness.to_string(),
            self.metrics.justification.clone(),
        ]
    }
}

/// Appends rows to the two analytics files, writing each header once
pub struct CsvRecorder {
    eval_path: PathBuf,
    metrics_path: PathBuf,
}

impl CsvRecorder {
    pub fn new(eval_path: impl Into<PathBuf>, metrics_path: impl Into<PathBuf>) -> Self {
        Self {
            eval_path: eval_path.into(),
            metrics_path: metrics_path.into(),
        }
    }

    /// Append one faithfulness row
    pub fn append_eval(&self, row: &EvalRow) -> Result<()> {
        append_row(&self.eval_path, EvalRow::HEADER, &row.fields())
    }

    /// Append one metrics row
    pub fn append_metrics(&self, row: &MetricsRow) -> Result<()> {
        append_row(&self.metrics_path, MetricsRow::HEADER, &row.fields())
    }
}

fn append_row(path: &Path, header: &[&str], fields: &[String]) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    if file.metadata()?.len() == 0 {
        debug!(path = %path.display(), "writing CSV header");
        writeln!(file, "{}", header.join(","))?;
    }

    let line = fields
        .iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(file, "{}", line)?;
    Ok(())
}

/// Quote a field when it contains a delimiter, quote, or newline
///
/// Embedded newlines become spaces first; the dashboards treat every line
/// as one record.
fn escape_field(field: &str) -> String {
    let flat = field.replace(['\n', '\r'], " ");
    if flat.contains(',') || flat.contains('"') {
        format!("\"{}\"", flat.replace('"', "\"\""))
    } else {
        flat
    }
}
