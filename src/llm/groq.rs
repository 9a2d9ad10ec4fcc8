//! Groq chat-completions client
//!
//! Talks to Groq's OpenAI-compatible `/chat/completions` endpoint with a
//! single user message per call.
//!
//! # Production Features
//!
//! - HTTP timeout from configuration
//! - Retry with exponential backoff on transient failures only
//! - Typed errors for auth, rate limits and server faults

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::LanguageModel;
use crate::config::Config;
use crate::error::LlmError;

/// Base delay for exponential backoff (milliseconds)
const RETRY_BASE_DELAY_MS: u64 = 500;

/// Groq-hosted language model
pub struct GroqModel {
    api_key: String,
    base_url: String,
    model: String,
    temperature: f64,
    max_retries: u32,
    client: Client,
}

impl GroqModel {
    /// Create a client with the default temperature, timeout and retries
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let defaults = Config::default();
        Self::with_settings(
            api_key,
            base_url,
            model,
            defaults.temperature,
            Duration::from_secs(defaults.request_timeout_secs),
            defaults.max_retries,
        )
    }

    /// Create a client from pipeline configuration
    pub fn from_config(api_key: String, config: &Config) -> Result<Self, LlmError> {
        Self::with_settings(
            api_key,
            config.groq_base_url.clone(),
            config.model.clone(),
            config.temperature,
            Duration::from_secs(config.request_timeout_secs),
            config.max_retries,
        )
    }

    fn with_settings(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        temperature: f64,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;

        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            temperature,
            max_retries,
            client,
        })
    }

    /// Set custom max retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    async fn execute_with_retry(&self, request: &ChatRequest<'_>) -> Result<String, LlmError> {
        let mut attempt = 0;

        loop {
            match self.execute_single(request).await {
                Ok(content) => return Ok(content),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = Duration::from_millis(RETRY_BASE_DELAY_MS * 2u64.pow(attempt - 1));
                    warn!(attempt, error = %e, delay_ms = delay.as_millis() as u64, "Groq request failed, will retry");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn execute_single(&self, request: &ChatRequest<'_>) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(url = %url, model = %self.model, "Sending chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else if e.is_connect() {
                    LlmError::Connection(e.to_string())
                } else {
                    LlmError::Network(e.to_string())
                }
            })?;

        let status = response.status();

        if status.is_success() {
            let body: ChatResponse = response
                .json()
                .await
                .map_err(|e| LlmError::ParseError(e.to_string()))?;

            return body
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .ok_or(LlmError::EmptyResponse);
        }

        let error_text = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 => Err(LlmError::Unauthorized),
            429 => Err(LlmError::RateLimited),
            400 => Err(LlmError::BadRequest(error_text)),
            500..=599 => Err(LlmError::ServerError(status.as_u16(), error_text)),
            code => Err(LlmError::HttpError(code, error_text)),
        }
    }
}

#[async_trait]
impl LanguageModel for GroqModel {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        self.execute_with_retry(&request).await
    }

    fn name(&self) -> &str {
        "groq"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}
