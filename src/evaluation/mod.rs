//! Self-evaluation and self-reflection for generated answers.
//!
//! This module implements the control loop that scores a draft answer with a
//! secondary judge call, decides whether to regenerate, and reports the final
//! outcome together with structured telemetry:
//!
//! - **parse**: fail-soft conversion of raw judge responses into verdicts
//! - **heuristic**: cheap substring-overlap grounding signal, no model calls
//! - **reflection**: the Draft -> Judged -> (Final | Retrying -> Final) machine
//! - **faithfulness**: context-aware judge pass for groundedness
//! - **metrics**: 1-5 scalar scores (faithfulness/relevance/conciseness)
//! - **recorder**: append-only CSV rows consumed by the analytics dashboards
//!
//! The loop holds no state between requests; collaborators are reached
//! through the [`reflection`] traits so tests can script them.

pub mod faithfulness;
pub mod heuristic;
pub mod metrics;
pub mod parse;
pub mod recorder;
pub mod reflection;

pub use faithfulness::check_faithfulness;
pub use heuristic::answer_grounded;
pub use metrics::{collect_metrics, AnswerMetrics};
pub use parse::{parse_faithfulness, parse_judgment};
pub use recorder::{CsvRecorder, EvalRow, MetricsRow};
pub use reflection::{AnswerSource, Generator, Judge, ReflectiveLoop, TraceSink};
