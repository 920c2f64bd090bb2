//! The self-reflection retry loop
//!
//! Draft -> Judged -> (Final | Retrying -> Final). One judge call scores the
//! draft; if the judge asks for a retry and budget remains, an improvement
//! prompt embedding the judge's justification drives a single regeneration
//! pass at an elevated temperature. The retried answer is not re-judged and
//! at most one retry runs regardless of a larger configured budget (the
//! assistant has always behaved this way; see DESIGN.md).
//!
//! Collaborators sit behind traits so the loop owns no network code and
//! tests can script every branch.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::ReflectionConfig;
use crate::error::Result;
use crate::evaluation::parse::parse_judgment;
use crate::session::SessionContext;
use crate::types::{EvaluationOutcome, SourcedAnswer, TraceRecord};

/// Chain label attached to trace records from this loop
const CHAIN_TYPE: &str = "reflection";

/// Scores answers. Both judge calls return the raw response text; parsing
/// and fail-soft handling happen in [`crate::evaluation::parse`].
#[async_trait]
pub trait Judge: Send + Sync {
    /// Judge (question, answer) quality; expected to reply in JSON
    async fn judge_quality(&self, question: &str, answer: &str) -> Result<String>;

    /// Judge answer faithfulness against retrieved context; expected to
    /// reply in `faithful:`/`explanation:` lines
    async fn judge_faithfulness(
        &self,
        question: &str,
        answer: &str,
        context: &str,
    ) -> Result<String>;
}

/// Produces free text from a prompt at a caller-chosen temperature
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String>;
}

/// Answers a question with supporting context fragments (the RAG pipeline,
/// reached through whatever capability the router selected)
#[async_trait]
pub trait AnswerSource: Send + Sync {
    async fn ask(&self, session: &SessionContext, question: &str) -> Result<SourcedAnswer>;
}

/// Best-effort telemetry sink; emission failures are logged and swallowed
/// by the loop, never surfaced to the caller
#[async_trait]
pub trait TraceSink: Send + Sync {
    async fn emit(&self, record: &TraceRecord) -> Result<()>;
}

/// Sink for callers without tracing configured
pub struct NoopSink;

#[async_trait]
impl TraceSink for NoopSink {
    async fn emit(&self, _record: &TraceRecord) -> Result<()> {
        Ok(())
    }
}

/// The evaluation loop
///
/// Holds no per-request state; a single instance serves concurrent requests.
pub struct ReflectiveLoop {
    judge: Arc<dyn Judge>,
    generator: Arc<dyn Generator>,
    sink: Arc<dyn TraceSink>,
    config: ReflectionConfig,
}

impl ReflectiveLoop {
    pub fn new(
        judge: Arc<dyn Judge>,
        generator: Arc<dyn Generator>,
        sink: Arc<dyn TraceSink>,
        config: ReflectionConfig,
    ) -> Self {
        Self {
            judge,
            generator,
            sink,
            config,
        }
    }

    /// Ask the answer source for a draft, then evaluate it
    ///
    /// The final answer is appended to the session history so follow-up
    /// questions see the reflected answer, not the discarded draft.
    pub async fn reflect_and_answer(
        &self,
        session: &mut SessionContext,
        source: &dyn AnswerSource,
        question: &str,
    ) -> Result<EvaluationOutcome> {
        let draft = source.ask(session, question).await?;
        let outcome = self.evaluate(session, question, &draft).await?;
        session.push_turn(question, outcome.final_answer.clone());
        Ok(outcome)
    }

    /// Score a draft answer and retry once if the judge asks for it
    ///
    /// Judge and generator failures propagate as hard errors; a corrupt
    /// judge *response* does not (it parses to the fail-soft judgment and
    /// triggers a retry instead). Exactly one trace record is emitted per
    /// invocation, whichever branch runs.
    pub async fn evaluate(
        &self,
        session: &SessionContext,
        question: &str,
        draft: &SourcedAnswer,
    ) -> Result<EvaluationOutcome> {
        let raw = self.judge.judge_quality(question, &draft.answer).await?;
        let judgment = parse_judgment(&raw);
        debug!(
            score = judgment.score,
            retry_needed = judgment.retry_needed,
            "draft answer judged"
        );

        let record = TraceRecord {
            user_id: session.user_id.clone(),
            session_id: session.session_id.clone(),
            question: question.to_string(),
            chain_type: CHAIN_TYPE.to_string(),
            answer: draft.answer.clone(),
            num_sources: draft.sources.len(),
            score: judgment.score,
            retry_applied: judgment.retry_needed && self.config.max_retries > 0,
            justification: judgment.justification.clone(),
        };
        if let Err(e) = self.sink.emit(&record).await {
            warn!("trace emission failed (ignored): {}", e);
        }

        if !judgment.retry_needed || self.config.max_retries == 0 {
            return Ok(EvaluationOutcome {
                question: question.to_string(),
                final_answer: draft.answer.clone(),
                judgment,
                retry_applied: false,
                retry_justification: None,
            });
        }

        // Single retry pass; the regenerated answer is taken as final
        // without a second judge call.
        let prompt = improvement_prompt(question, &draft.answer, &judgment.justification);
        let revised = self
            .generator
            .generate(&prompt, self.config.retry_temperature)
            .await?;
        info!(score = judgment.score, "judge requested retry; answer regenerated");

        let retry_justification = Some(judgment.justification.clone());
        Ok(EvaluationOutcome {
            question: question.to_string(),
            final_answer: revised,
            judgment,
            retry_applied: true,
            retry_justification,
        })
    }
}

/// Build the regeneration prompt, embedding the judge's feedback verbatim
fn improvement_prompt(question: &str, answer: &str, justification: &str) -> String {
    format!(
        "Improve the following answer based on this feedback: '{}'.\n\
         Original Question: {}\n\
         Original Answer: {}",
        justification, question, answer
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::error::ArgusError;

    /// Judge that always returns the same canned response
    struct CannedJudge {
        response: String,
        calls: AtomicUsize,
    }

    impl CannedJudge {
        fn new(response: &str) -> Self {
            Self {
                response: response.to_string(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Judge for CannedJudge {
        async fn judge_quality(&self, _question: &str, _answer: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }

        async fn judge_faithfulness(
            &self,
            _question: &str,
            _answer: &str,
            _context: &str,
        ) -> Result<String> {
            Ok("faithful: yes".to_string())
        }
    }

    /// Generator that records prompts and returns a fixed revision
    struct RecordingGenerator {
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl RecordingGenerator {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Generator for RecordingGenerator {
        async fn generate(&self, prompt: &str, _temperature: f32) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("revised answer".to_string())
        }
    }

    /// Sink that always fails, for the swallow-on-outage property
    struct FailingSink;

    #[async_trait]
    impl TraceSink for FailingSink {
        async fn emit(&self, _record: &TraceRecord) -> Result<()> {
            Err(ArgusError::Trace("sink outage".to_string()))
        }
    }

    fn draft(answer: &str) -> SourcedAnswer {
        SourcedAnswer {
            answer: answer.to_string(),
            sources: vec![],
        }
    }

    fn make_loop(
        judge: Arc<CannedJudge>,
        generator: Arc<RecordingGenerator>,
        max_retries: u32,
    ) -> ReflectiveLoop {
        ReflectiveLoop::new(
            judge,
            generator,
            Arc::new(NoopSink),
            ReflectionConfig {
                max_retries,
                ..ReflectionConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_no_retry_keeps_draft() {
        let judge = Arc::new(CannedJudge::new(
            r#"{"score": 5, "justification": "solid", "retry_needed": false}"#,
        ));
        let generator = Arc::new(RecordingGenerator::new());
        let looper = make_loop(judge, generator.clone(), 1);
        let session = SessionContext::new("tester");

        let outcome = looper
            .evaluate(&session, "q", &draft("draft answer"))
            .await
            .unwrap();

        assert_eq!(outcome.final_answer, "draft answer");
        assert!(!outcome.retry_applied);
        assert!(outcome.retry_justification.is_none());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_retry_runs_once_and_surfaces_justification() {
        let judge = Arc::new(CannedJudge::new(
            r#"{"score": 2, "justification": "too vague", "retry_needed": true}"#,
        ));
        let generator = Arc::new(RecordingGenerator::new());
        // Budget larger than one still produces a single retry pass.
        let looper = make_loop(judge.clone(), generator.clone(), 3);
        let session = SessionContext::new("tester");

        let outcome = looper
            .evaluate(&session, "q", &draft("draft answer"))
            .await
            .unwrap();

        assert_eq!(outcome.final_answer, "revised answer");
        assert!(outcome.retry_applied);
        assert_eq!(outcome.retry_justification.as_deref(), Some("too vague"));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(judge.calls.load(Ordering::SeqCst), 1);

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("'too vague'"));
        assert!(prompts[0].contains("Original Question: q"));
        assert!(prompts[0].contains("Original Answer: draft answer"));
    }

    #[tokio::test]
    async fn test_zero_budget_skips_retry() {
        let judge = Arc::new(CannedJudge::new(
            r#"{"score": 1, "justification": "bad", "retry_needed": true}"#,
        ));
        let generator = Arc::new(RecordingGenerator::new());
        let looper = make_loop(judge, generator.clone(), 0);
        let session = SessionContext::new("tester");

        let outcome = looper
            .evaluate(&session, "q", &draft("draft answer"))
            .await
            .unwrap();

        assert_eq!(outcome.final_answer, "draft answer");
        assert!(!outcome.retry_applied);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_judgment_triggers_retry() {
        let judge = Arc::new(CannedJudge::new("the judge rambled"));
        let generator = Arc::new(RecordingGenerator::new());
        let looper = make_loop(judge, generator.clone(), 1);
        let session = SessionContext::new("tester");

        let outcome = looper
            .evaluate(&session, "q", &draft("draft answer"))
            .await
            .unwrap();

        assert!(outcome.retry_applied);
        assert_eq!(outcome.judgment.score, 1);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sink_outage_does_not_change_outcome() {
        let judge = Arc::new(CannedJudge::new(
            r#"{"score": 4, "justification": "fine", "retry_needed": false}"#,
        ));
        let looper = ReflectiveLoop::new(
            judge,
            Arc::new(RecordingGenerator::new()),
            Arc::new(FailingSink),
            ReflectionConfig::default(),
        );
        let session = SessionContext::new("tester");

        let outcome = looper
            .evaluate(&session, "q", &draft("draft answer"))
            .await
            .unwrap();

        assert_eq!(outcome.final_answer, "draft answer");
        assert!(!outcome.retry_applied);
    }
}
