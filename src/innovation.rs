//! # Innovation Stage
//!
//! Reads the analysis report, then asks the language model for new research
//! topics grounded in the report's gaps and cluster terms.
//!
//! Without a model, or when the call fails, the topic list is empty. The
//! header and topic lines are still rendered.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::llm::LanguageModel;
use crate::report::{MarkdownReportParser, ReportParser};

/// At most this many topics are kept from a model response
pub const MAX_TOPICS: usize = 5;

const HEADER: &str = "# Suggested Research Topics";
const NO_REPORT: &str = "No report provided to suggest topics.";
const NONE_IDENTIFIED: &str = "none identified";

/// Numbered-list markers recognised as topic lines
const NUMBER_MARKERS: [&str; MAX_TOPICS] = ["1.", "2.", "3.", "4.", "5."];

// =============================================================================
// SUGGESTIONS
// =============================================================================
/// How the topic list came to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationStatus {
    /// The model answered and its list was parsed
    Generated,
    /// The report was empty, nothing was attempted
    NoReport,
    /// No language model is configured
    ModelUnavailable,
    /// The model call failed
    Failed(String),
}

/// Output of the innovation stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestions {
    pub topic: String,
    pub topics: Vec<String>,
    pub status: GenerationStatus,
}

impl Suggestions {
    fn no_report() -> Self {
        Self {
            topic: String::new(),
            topics: Vec::new(),
            status: GenerationStatus::NoReport,
        }
    }

    /// Render as the markdown document shown to users.
    ///
    /// Topics are renumbered `1..=k` whatever markers the model used.
    pub fn to_markdown(&self) -> String {
        if self.status == GenerationStatus::NoReport {
            return format!("{}\n{}", HEADER, NO_REPORT);
        }

        let mut lines = vec![
            HEADER.to_string(),
            format!("**Based on Topic**: {}", self.topic),
            "\n## Proposed Topics".to_string(),
        ];
        lines.extend(
            self.topics
                .iter()
                .enumerate()
                .map(|(i, topic)| format!("{}. {}", i + 1, topic)),
        );

        lines.join("\n")
    }
}

// =============================================================================
// INNOVATION STAGE
// =============================================================================
/// Third pipeline stage.
pub struct InnovationStage {
    model: Option<Arc<dyn LanguageModel>>,
    parser: Arc<dyn ReportParser>,
}

impl InnovationStage {
    pub fn new(model: Option<Arc<dyn LanguageModel>>) -> Self {
        Self {
            model,
            parser: Arc::new(MarkdownReportParser),
        }
    }

    /// Swap in a different report parser
    pub fn with_parser(mut self, parser: Arc<dyn ReportParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Propose topics from an analysis report.
    pub async fn suggest_topics(&self, report: &str) -> Suggestions {
        if report.trim().is_empty() {
            info!("No analysis report, skipping topic generation");
            return Suggestions::no_report();
        }

        let parsed = self.parser.parse(report);
        let terms = parsed.all_terms();
        debug!(
            topic = %parsed.topic,
            clusters = parsed.cluster_terms.len(),
            gaps = parsed.gaps.len(),
            "Parsed analysis report"
        );

        let prompt = innovation_prompt(&parsed.topic, &parsed.gaps, &terms);

        let (topics, status) = match &self.model {
            None => {
                warn!("No language model configured, proposing no topics");
                (Vec::new(), GenerationStatus::ModelUnavailable)
            }
            Some(model) => match model.complete(&prompt).await {
                Ok(response) => {
                    let topics = extract_topics(&response);
                    info!(count = topics.len(), "Topics generated");
                    (topics, GenerationStatus::Generated)
                }
                Err(e) => {
                    warn!(error = %e, "Topic generation failed");
                    (Vec::new(), GenerationStatus::Failed(e.to_string()))
                }
            },
        };

        Suggestions {
            topic: parsed.topic,
            topics,
            status,
        }
    }
}

/// Prompt asking for 3-5 topics as a numbered list.
pub fn innovation_prompt(topic: &str, gaps: &[String], terms: &[&str]) -> String {
    let gaps = if gaps.is_empty() {
        NONE_IDENTIFIED.to_string()
    } else {
        gaps.join(", ")
    };
    let terms = if terms.is_empty() {
        NONE_IDENTIFIED.to_string()
    } else {
        terms.join(", ")
    };

    format!(
        "You are an expert researcher tasked with proposing innovative research topics based on an analysis of recent literature. \
         The inferred topic is \"{topic}\". \
         The analysis identified the following research gaps: {gaps}. \
         Dominant themes include: {terms}. \
         Propose 3-5 specific, innovative, and actionable research topics that address the gaps and build on the dominant themes. \
         Each topic should be concise, forward-looking, and relevant to the inferred topic. \
         Format as a numbered list."
    )
}

/// Pull list items out of a model response.
///
/// Keeps lines starting with `-` or `1.`..`5.`, strips the marker, drops
/// empties and keeps the first [`MAX_TOPICS`].
pub fn extract_topics(response: &str) -> Vec<String> {
    response
        .lines()
        .map(str::trim)
        .filter_map(strip_marker)
        .filter(|topic| !topic.is_empty())
        .take(MAX_TOPICS)
        .map(str::to_string)
        .collect()
}

/// Strip one `-` bullet, then one `1.`..`5.` marker if present.
fn strip_marker(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix('-') {
        let rest = rest.trim_start();
        return Some(strip_number(rest).unwrap_or(rest).trim());
    }

    strip_number(line).map(str::trim)
}

fn strip_number(line: &str) -> Option<&str> {
    NUMBER_MARKERS
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
}
