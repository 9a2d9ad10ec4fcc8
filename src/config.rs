//! # Configuration Module
//!
//! Loads pipeline configuration from environment variables (and `.env`).
//! Every provider and stage receives its settings from a [`Config`] value at
//! construction; nothing reads ambient secrets on its own.

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Hard ceiling on papers kept per query.
pub const MAX_PAPERS: usize = 3;

// =============================================================================
// PROVIDER SELECTION
// =============================================================================
/// Which language-model backend drives the analysis and innovation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Hosted Groq inference (OpenAI-compatible chat completions)
    #[default]
    Groq,
    /// Local Ollama server via Rig
    Ollama,
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groq" => Ok(ProviderKind::Groq),
            "ollama" => Ok(ProviderKind::Ollama),
            other => anyhow::bail!("Unknown LLM provider '{}', expected 'groq' or 'ollama'", other),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Groq => write!(f, "groq"),
            ProviderKind::Ollama => write!(f, "ollama"),
        }
    }
}

// =============================================================================
// CONFIGURATION STRUCT
// =============================================================================
/// Main configuration for the research pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    /// Language-model backend
    pub provider: ProviderKind,

    /// Model identifier passed to the backend
    pub model: String,

    /// Groq API key. `None` leaves the pipeline without a language model.
    pub groq_api_key: Option<String>,

    /// Groq OpenAI-compatible endpoint root
    pub groq_base_url: String,

    /// Ollama server URL
    pub ollama_host: String,

    /// Sampling temperature for both LLM stages
    pub temperature: f64,

    /// arXiv Atom query endpoint
    pub arxiv_base_url: String,

    /// Papers kept per query (1..=3)
    pub max_papers: usize,

    /// Queries longer than this are truncated before hitting arXiv
    pub max_query_length: usize,

    /// Each paper summary is capped at this many characters
    pub summary_max_chars: usize,

    /// HTTP client timeout for every provider call
    pub request_timeout_secs: u64,

    /// Extra attempts on transient LLM failures
    pub max_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Groq,
            model: "llama3-70b-8192".to_string(),
            groq_api_key: None,
            groq_base_url: "https://api.groq.com/openai/v1".to_string(),
            ollama_host: "http://localhost:11434".to_string(),
            temperature: 0.7,
            arxiv_base_url: "https://export.arxiv.org/api/query".to_string(),
            max_papers: MAX_PAPERS,
            max_query_length: 300,
            summary_max_chars: 50_000,
            request_timeout_secs: 60,
            max_retries: 2,
        }
    }
}

// =============================================================================
// CONFIGURATION LOADING
// =============================================================================
impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = Config::default();

        if let Ok(val) = env::var("LLM_PROVIDER") {
            config.provider = val.parse()?;
        }

        if let Ok(val) = env::var("LLM_MODEL") {
            config.model = val;
        }

        // Empty keys are treated as absent
        config.groq_api_key = env::var("GROQ_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        if let Ok(val) = env::var("GROQ_API_BASE_URL") {
            config.groq_base_url = val;
        }

        if let Ok(val) = env::var("OLLAMA_API_BASE_URL") {
            config.ollama_host = val;
        }

        if let Ok(val) = env::var("TEMPERATURE") {
            config.temperature = val
                .parse()
                .context("TEMPERATURE must be a valid floating-point number (e.g., 0.7)")?;
        }

        if let Ok(val) = env::var("ARXIV_API_URL") {
            config.arxiv_base_url = val;
        }

        if let Ok(val) = env::var("MAX_PAPERS") {
            config.max_papers = val
                .parse()
                .context("MAX_PAPERS must be a valid positive integer")?;
        }

        if let Ok(val) = env::var("ARXIV_MAX_QUERY_LENGTH") {
            config.max_query_length = val
                .parse()
                .context("ARXIV_MAX_QUERY_LENGTH must be a valid positive integer")?;
        }

        if let Ok(val) = env::var("SUMMARY_MAX_CHARS") {
            config.summary_max_chars = val
                .parse()
                .context("SUMMARY_MAX_CHARS must be a valid positive integer")?;
        }

        if let Ok(val) = env::var("REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = val
                .parse()
                .context("REQUEST_TIMEOUT_SECS must be a valid positive integer")?;
        }

        if let Ok(val) = env::var("LLM_MAX_RETRIES") {
            config.max_retries = val
                .parse()
                .context("LLM_MAX_RETRIES must be a valid non-negative integer")?;
        }

        Ok(config)
    }

    /// Validate the configuration before any provider is built.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            anyhow::bail!(
                "Temperature must be between 0.0 and 2.0, got: {}",
                self.temperature
            );
        }

        if self.max_papers == 0 || self.max_papers > MAX_PAPERS {
            anyhow::bail!(
                "MAX_PAPERS must be between 1 and {}, got: {}",
                MAX_PAPERS,
                self.max_papers
            );
        }

        if self.max_query_length == 0 {
            anyhow::bail!("ARXIV_MAX_QUERY_LENGTH must be at least 1");
        }

        if self.summary_max_chars == 0 {
            anyhow::bail!("SUMMARY_MAX_CHARS must be at least 1");
        }

        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be at least 1");
        }

        if self.model.trim().is_empty() {
            anyhow::bail!("LLM_MODEL cannot be empty");
        }

        Ok(())
    }
}
