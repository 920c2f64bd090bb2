//! Configuration for the Argus evaluation core
//!
//! All settings come from the environment, matching how the assistant is
//! deployed (a `.env` file loaded by the process supervisor):
//! - `OPENAI_API_KEY` / `OPENAI_BASE_URL` for the judge and retry generator
//! - `LANGFUSE_HOST`, `LANGFUSE_PUBLIC_KEY`, `LANGFUSE_SECRET_KEY` for tracing
//! - `ARGUS_EVAL_CSV` for the analytics recorder output path

use std::env;

use crate::error::{ArgusError, Result};

/// Default chat model for judge and generation calls
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Configuration for the chat-completion client
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// OpenAI API key
    pub api_key: String,

    /// API base URL (override for proxies and compatible servers)
    pub base_url: String,

    /// Model to use for judge and generation calls
    pub model: String,

    /// Max tokens for responses
    pub max_tokens: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1024,
        }
    }
}

/// Retry policy for the evaluation loop
#[derive(Debug, Clone)]
pub struct ReflectionConfig {
    /// Retry budget. Only zero vs. non-zero matters: the loop performs at
    /// most one regeneration pass and never re-judges the retried answer.
    pub max_retries: u32,

    /// Sampling temperature for the regeneration call. Deliberately higher
    /// than the judge's 0.0 so the retry explores a materially different
    /// answer.
    pub retry_temperature: f32,
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            max_retries: 1,
            retry_temperature: 0.7,
        }
    }
}

/// Configuration for the Langfuse tracing sink
#[derive(Debug, Clone)]
pub struct LangfuseConfig {
    pub host: String,
    pub public_key: String,
    pub secret_key: String,
}

impl LangfuseConfig {
    /// Read the sink configuration from the environment
    ///
    /// Returns a `Config` error when the host or keys are missing; callers
    /// that want tracing to be optional fall back to the no-op sink.
    pub fn from_env() -> Result<Self> {
        let host = require_env("LANGFUSE_HOST")?;
        let public_key = require_env("LANGFUSE_PUBLIC_KEY")?;
        let secret_key = require_env("LANGFUSE_SECRET_KEY")?;
        Ok(Self {
            host,
            public_key,
            secret_key,
        })
    }
}

/// Output path for the faithfulness results file
pub fn eval_csv_path() -> String {
    env::var("ARGUS_EVAL_CSV").unwrap_or_else(|_| "eval_results.csv".to_string())
}

/// Output path for the scalar metrics file
pub fn metrics_csv_path() -> String {
    env::var("ARGUS_METRICS_CSV").unwrap_or_else(|_| "llm_eval_metrics.csv".to_string())
}

fn require_env(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(ArgusError::Config(config::ConfigError::Message(format!(
            "{} not set",
            key
        )))),
    }
}
