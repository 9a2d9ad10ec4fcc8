//! # Workflow State
//!
//! The record threaded through the pipeline. Each output field is written
//! once, by the stage that owns it, in pipeline order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder title when the provider omits one
pub const UNTITLED: &str = "Untitled";

/// Placeholder summary when the provider omits one
pub const NO_SUMMARY: &str = "No summary";

// =============================================================================
// PAPER RECORD
// =============================================================================
/// One paper returned by the search stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub title: String,
    pub summary: String,
}

impl PaperRecord {
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
        }
    }
}

impl Default for PaperRecord {
    fn default() -> Self {
        Self::new(UNTITLED, NO_SUMMARY)
    }
}

// =============================================================================
// STAGE FAILURES
// =============================================================================
/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Search,
    Analysis,
    Innovation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Search => write!(f, "search"),
            Stage::Analysis => write!(f, "analysis"),
            Stage::Innovation => write!(f, "innovation"),
        }
    }
}

/// A stage that degraded instead of producing its normal output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageFailure {
    pub stage: Stage,
    pub message: String,
}

impl StageFailure {
    pub fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} stage: {}", self.stage, self.message)
    }
}

// =============================================================================
// WORKFLOW STATE
// =============================================================================
/// Result of one pipeline run.
///
/// Every field is always present once [`crate::ResearchPipeline::run`]
/// returns. A stage that failed leaves its empty default and records a
/// [`StageFailure`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub query: String,
    pub search_results: Vec<PaperRecord>,
    pub analysis_report: String,
    pub suggested_topics: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<StageFailure>,
}

impl WorkflowState {
    /// Fresh state for a query, all outputs empty
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            search_results: Vec::new(),
            analysis_report: String::new(),
            suggested_topics: String::new(),
            failures: Vec::new(),
        }
    }

    /// Whether any stage fell back to a degraded output
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }

    /// The failure recorded for `stage`, if any
    pub fn failure(&self, stage: Stage) -> Option<&StageFailure> {
        self.failures.iter().find(|f| f.stage == stage)
    }

    pub(crate) fn record_failure(&mut self, stage: Stage, message: impl Into<String>) {
        self.failures.push(StageFailure::new(stage, message));
    }
}
