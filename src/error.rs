//! # Error Module
//!
//! Typed errors for the pipeline's external collaborators.
//!
//! Library code returns these `thiserror` enums so callers can match on the
//! failure kind. The binary and the configuration layer use `anyhow` instead.

use thiserror::Error;

// =============================================================================
// SEARCH ERRORS
// =============================================================================
/// Failures from the document-search provider.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Rate limited by search provider, please wait")]
    RateLimited,

    #[error("HTTP error ({0}): {1}")]
    HttpError(u16, String),

    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SearchError::Timeout
        } else if e.is_connect() {
            SearchError::Connection(e.to_string())
        } else {
            SearchError::Network(e.to_string())
        }
    }
}

// =============================================================================
// LLM ERRORS
// =============================================================================
/// Failures from a language-model backend.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unauthorized - check API key")]
    Unauthorized,

    #[error("Rate limited - too many requests")]
    RateLimited,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error ({0}): {1}")]
    ServerError(u16, String),

    #[error("HTTP error ({0}): {1}")]
    HttpError(u16, String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Model returned no content")]
    EmptyResponse,

    #[error("Completion failed: {0}")]
    Completion(String),
}

impl LlmError {
    /// Transient errors worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::Timeout
                | LlmError::Connection(_)
                | LlmError::RateLimited
                | LlmError::ServerError(_, _)
        )
    }
}

// =============================================================================
// STAGE ERRORS
// =============================================================================
/// Failure of the analysis stage.
///
/// The display text keeps the `Error in analysis:` prefix users of the
/// rendered output are used to seeing.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Error in analysis: no language model configured")]
    ModelUnavailable,

    #[error("Error in analysis: {0}")]
    Model(#[from] LlmError),

    #[error("Error in analysis: failed to serialize search results: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_error_retryable() {
        assert!(LlmError::Timeout.is_retryable());
        assert!(LlmError::RateLimited.is_retryable());
        assert!(LlmError::ServerError(503, "busy".into()).is_retryable());
        assert!(!LlmError::Unauthorized.is_retryable());
        assert!(!LlmError::BadRequest("bad".into()).is_retryable());
        assert!(!LlmError::EmptyResponse.is_retryable());
    }

    #[test]
    fn test_analysis_error_keeps_prefix() {
        let err = AnalysisError::from(LlmError::Unauthorized);
        assert_eq!(
            err.to_string(),
            "Error in analysis: Unauthorized - check API key"
        );
        assert!(AnalysisError::ModelUnavailable
            .to_string()
            .starts_with("Error in analysis:"));
    }
}
