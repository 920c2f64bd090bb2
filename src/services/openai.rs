//! Chat-completion client for judge and regeneration calls
//!
//! Talks to the OpenAI chat completions endpoint (or any compatible
//! server via `OPENAI_BASE_URL`). The judge prompts live here as the
//! single source of truth for what the judges are asked; both judge
//! calls run at temperature zero so verdicts are as stable as the model
//! allows, while regeneration uses the caller's temperature.

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LlmConfig;
use crate::error::{ArgusError, Result};
use crate::evaluation::reflection::{Generator, Judge};

const QUALITY_SYSTEM_PROMPT: &str = "You are an assistant that evaluates the quality of AI responses. \
Given a question and an AI-generated answer, you will judge its quality on a scale of 1 to 5. \
Also provide a short justification and whether a retry is needed.";

const QUALITY_PROMPT_TEMPLATE: &str = "\
Question: {question}
Answer: {answer}

Evaluate the answer. Respond in JSON format:
{
  \"score\": 1-5, \"justification\": \"...\", \"retry_needed\": true/false
}";

const FAITHFULNESS_PROMPT_TEMPLATE: &str = "\
Context (fragments of retrieved documents):
{reference}

User question:
{query}

Agent's answer:
{result}

Analyze whether the agent's answer correctly addresses the user question based on the given context.
If the answer is semantically aligned with the information in the context (even if not quoted verbatim), consider it faithful.

Reply in this format:
faithful: <Yes/No>
explanation: <short reasoning>";

/// Chat-completion client
pub struct OpenAiClient {
    config: LlmConfig,
    client: reqwest::Client,
}

/// Chat completions request body
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: usize,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Chat completions response body
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiClient {
    /// Create a new client with custom config
    pub fn new(config: LlmConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(ArgusError::Config(config::ConfigError::Message(
                "OPENAI_API_KEY not set".to_string(),
            )));
        }

        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }

    /// Create with default config (reads the environment)
    pub fn with_default() -> Result<Self> {
        Self::new(LlmConfig::default())
    }

    /// Make a chat completion call and return the first choice's text
    async fn call_api(&self, messages: Vec<ChatMessage>, temperature: f32) -> Result<String> {
        debug!(model = %self.config.model, temperature, "calling chat completions API");

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages,
            temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.config.base_url))
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.config.api_key),
            )
            .header(header::CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(ArgusError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ArgusError::LlmApi(format!(
                "API request failed with status {}: {}",
                status, error_text
            )));
        }

        let api_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ArgusError::LlmApi(format!("Failed to parse response: {}", e)))?;

        api_response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| ArgusError::LlmApi("Empty response from API".to_string()))
    }
}

#[async_trait::async_trait]
impl Judge for OpenAiClient {
    async fn judge_quality(&self, question: &str, answer: &str) -> Result<String> {
        let user_prompt = QUALITY_PROMPT_TEMPLATE
            .replace("{question}", question)
            .replace("{answer}", answer);

        self.call_api(
            vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: QUALITY_SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt,
                },
            ],
            0.0,
        )
        .await
    }

    async fn judge_faithfulness(
        &self,
        question: &str,
        answer: &str,
        context: &str,
    ) -> Result<String> {
        let prompt = FAITHFULNESS_PROMPT_TEMPLATE
            .replace("{reference}", context)
            .replace("{query}", question)
            .replace("{result}", answer);

        self.call_api(
            vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            0.0,
        )
        .await
    }
}

#[async_trait::async_trait]
impl Generator for OpenAiClient {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String> {
        self.call_api(
            vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature,
        )
        .await
    }
}
