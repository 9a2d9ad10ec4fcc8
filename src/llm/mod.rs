//! Language-model boundary
//!
//! The analysis and innovation stages only need single-prompt, single-response
//! text completion. [`LanguageModel`] is that seam; backends live in the
//! submodules and are chosen from [`Config`].

mod groq;
mod ollama;

pub use groq::GroqModel;
pub use ollama::OllamaModel;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::{Config, ProviderKind};
use crate::error::LlmError;

/// Single-shot text completion.
///
/// No streaming and no conversation state: each call is one prompt in, one
/// response out.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete a prompt and return the model's text
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model identifier in use
    fn model(&self) -> &str;
}

/// Build the configured language model.
///
/// Returns `Ok(None)` when the Groq backend is selected without an API key.
/// The pipeline still runs in that case; both LLM stages degrade.
pub fn build_model(config: &Config) -> Result<Option<Arc<dyn LanguageModel>>> {
    match config.provider {
        ProviderKind::Groq => match &config.groq_api_key {
            Some(key) => {
                let model = GroqModel::from_config(key.clone(), config)?;
                info!(model = %config.model, "Using Groq language model");
                Ok(Some(Arc::new(model)))
            }
            None => {
                warn!("GROQ_API_KEY not set, language model stages will be skipped");
                Ok(None)
            }
        },
        ProviderKind::Ollama => {
            let model = OllamaModel::new(&config.ollama_host, &config.model, config.temperature);
            info!(model = %config.model, host = %config.ollama_host, "Using Ollama language model");
            Ok(Some(Arc::new(model)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groq_without_key_is_unavailable() {
        let config = Config::default();
        let model = build_model(&config).unwrap();
        assert!(model.is_none());
    }

    #[test]
    fn test_groq_with_key() {
        let config = Config {
            groq_api_key: Some("gsk-test".to_string()),
            ..Config::default()
        };
        let model = build_model(&config).unwrap().expect("model should be built");
        assert_eq!(model.name(), "groq");
        assert_eq!(model.model(), "llama3-70b-8192");
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let config = Config {
            provider: ProviderKind::Ollama,
            model: "llama3.2".to_string(),
            ..Config::default()
        };
        let model = build_model(&config).unwrap().expect("model should be built");
        assert_eq!(model.name(), "ollama");
        assert_eq!(model.model(), "llama3.2");
    }
}
