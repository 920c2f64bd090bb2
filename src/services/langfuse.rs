//! Langfuse tracing sink
//!
//! Emits one trace plus one nested span per evaluation loop invocation,
//! mirroring what the dashboards expect: the trace carries the reflection
//! metadata (score, retry decision, justification) and the span carries
//! the answer payload. Emission returns a Result; the loop decides to log
//! and swallow, this client never prints.

use serde_json::json;
use tracing::debug;

use crate::config::LangfuseConfig;
use crate::error::{ArgusError, Result};
use crate::evaluation::reflection::TraceSink;
use crate::types::TraceRecord;

/// Trace name expected by the dashboard filters
const TRACE_NAME: &str = "PDF QA Chain";
const SPAN_NAME: &str = "RetrievalQA";

/// Langfuse HTTP sink
pub struct LangfuseSink {
    config: LangfuseConfig,
    client: reqwest::Client,
}

impl LangfuseSink {
    pub fn new(config: LangfuseConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Create from the environment
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(LangfuseConfig::from_env()?))
    }

    async fn post(&self, path: &str, payload: serde_json::Value) -> Result<serde_json::Value> {
        let response = self
            .client
            .post(format!("{}{}", self.config.host, path))
            .basic_auth(&self.config.public_key, Some(&self.config.secret_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| ArgusError::Trace(format!("{} request failed: {}", path, e)))?;

        if !response.status().is_success() {
            return Err(ArgusError::Trace(format!(
                "{} returned status {}",
                path,
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ArgusError::Trace(format!("{} response unreadable: {}", path, e)))
    }
}

#[async_trait::async_trait]
impl TraceSink for LangfuseSink {
    async fn emit(&self, record: &TraceRecord) -> Result<()> {
        let trace_payload = json!({
            "name": TRACE_NAME,
            "userId": record.user_id,
            "sessionId": record.session_id,
            "input": { "query": record.question },
            "metadata": {
                "chain_type": record.chain_type,
                "component": "evaluation_loop",
                "reflection_score": record.score,
                "reflection_retry": record.retry_applied,
                "reflection_justification": record.justification,
            },
        });

        let trace = self.post("/api/public/traces", trace_payload).await?;
        let trace_id = trace
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ArgusError::Trace("trace response had no id".to_string()))?
            .to_string();
        debug!(%trace_id, "langfuse trace created");

        let span_payload = json!({
            "traceId": trace_id,
            "name": SPAN_NAME,
            "input": { "query": record.question },
            "output": {
                "result": record.answer,
                "num_source_docs": record.num_sources,
            },
        });
        self.post("/api/public/spans", span_payload).await?;

        Ok(())
    }
}
