//! # Analysis Stage
//!
//! Asks the language model to cluster the search results and name the gaps,
//! returning a markdown report in the layout [`crate::report`] parses.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::AnalysisError;
use crate::llm::LanguageModel;
use crate::state::PaperRecord;

/// Second pipeline stage.
pub struct AnalysisStage {
    model: Option<Arc<dyn LanguageModel>>,
}

impl AnalysisStage {
    pub fn new(model: Option<Arc<dyn LanguageModel>>) -> Self {
        Self { model }
    }

    /// Analyze already-serialized research data.
    ///
    /// One model call; no timeout beyond the model client's own.
    pub async fn analyze(&self, research_data: &str) -> Result<String, AnalysisError> {
        let model = self.model.as_ref().ok_or(AnalysisError::ModelUnavailable)?;

        info!(model = model.model(), "Analyzing search results");
        let prompt = analysis_prompt(research_data);
        debug!(prompt_chars = prompt.len(), "Analysis prompt built");

        let report = model.complete(&prompt).await?;

        info!(report_chars = report.len(), "Analysis completed");
        Ok(report)
    }

    /// Serialize `papers` as JSON and analyze them.
    pub async fn analyze_papers(&self, papers: &[PaperRecord]) -> Result<String, AnalysisError> {
        let research_data = serde_json::to_string(papers)?;
        self.analyze(&research_data).await
    }
}

/// Prompt instructing the model to emit the report layout.
pub fn analysis_prompt(research_data: &str) -> String {
    format!(
        r#"Analyze the following research data: {research_data}
Identify key themes, clusters, and gaps. Format as markdown:
**Inferred Topic**: [Topic]
### Cluster 1
**Common terms**: [Terms]
## Research Gaps
- [Gap 1]
- [Gap 2]"#
    )
}
