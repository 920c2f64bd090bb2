//! Argus - Self-Evaluation Core for a PDF QA Assistant
//!
//! The retrieval-augmented assistant answers questions over uploaded PDFs;
//! this crate is its self-evaluation and self-reflection control loop:
//! - Judge a draft answer with a secondary model call
//! - Retry once with an improvement prompt when the judge asks for it
//! - Check answer faithfulness against the retrieved context
//! - Record structured outcomes for the analytics dashboards
//!
//! PDF parsing, vector retrieval, and the web UI are external collaborators
//! reached through the trait seams in [`evaluation::reflection`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use argus_core::{LlmConfig, OpenAiClient, ReflectionConfig, ReflectiveLoop, SessionContext};
//! use argus_core::evaluation::reflection::NoopSink;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let llm = Arc::new(OpenAiClient::new(LlmConfig::default())?);
//!     let looper = ReflectiveLoop::new(
//!         llm.clone(),
//!         llm,
//!         Arc::new(NoopSink),
//!         ReflectionConfig::default(),
//!     );
//!
//!     let mut session = SessionContext::new("web");
//!     let outcome = looper
//!         .reflect_and_answer(&mut session, &retriever, "What does chapter 2 cover?")
//!         .await?;
//!     println!("{}", outcome.final_answer);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod evaluation;
pub mod router;
pub mod services;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use config::{LangfuseConfig, LlmConfig, ReflectionConfig};
pub use error::{ArgusError, Result};
pub use evaluation::{
    answer_grounded, check_faithfulness, collect_metrics, parse_faithfulness, parse_judgment,
    AnswerMetrics, AnswerSource, CsvRecorder, EvalRow, Generator, Judge, MetricsRow,
    ReflectiveLoop, TraceSink,
};
pub use router::{route, Capability};
pub use services::{LangfuseSink, OpenAiClient};
pub use session::SessionContext;
pub use types::{
    ContextFragment, EvaluationOutcome, FaithfulnessVerdict, Judgment, SourcedAnswer, TraceRecord,
};
