//! Local Ollama backend via Rig
//!
//! Builds a Rig agent per call against an Ollama server. No tools, no
//! preamble: the stage prompts are self-contained.

use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;
use rig::providers::ollama;
use tracing::debug;

use super::LanguageModel;
use crate::error::LlmError;

/// Ollama-served language model
pub struct OllamaModel {
    host: String,
    model: String,
    temperature: f64,
}

impl OllamaModel {
    pub fn new(host: impl Into<String>, model: impl Into<String>, temperature: f64) -> Self {
        Self {
            host: host.into(),
            model: model.into(),
            temperature,
        }
    }
}

#[async_trait]
impl LanguageModel for OllamaModel {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        // Rig's Ollama client reads its endpoint from the environment
        std::env::set_var("OLLAMA_API_BASE_URL", &self.host);
        let client = ollama::Client::from_env();

        debug!(host = %self.host, model = %self.model, "Prompting Ollama");

        let agent = client
            .agent(&self.model)
            .temperature(self.temperature)
            .build();

        let prompt = prompt.to_string();
        let response = agent
            .prompt(&prompt)
            .await
            .map_err(|e| LlmError::Completion(format!("Ollama completion failed: {}", e)))?;

        if response.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(response)
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
