//! # Search Stage
//!
//! Fetches papers for a query and turns the provider's text response into
//! [`PaperRecord`]s.
//!
//! Providers speak a plain-text convention: one block per document, blocks
//! separated by a blank line, with `Title: ` and `Summary: ` lines inside each
//! block. The stage depends on that convention only.

mod arxiv;

pub use arxiv::ArxivProvider;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::{Config, MAX_PAPERS};
use crate::error::SearchError;
use crate::state::{PaperRecord, NO_SUMMARY, UNTITLED};

const TITLE_PREFIX: &str = "Title: ";
const SUMMARY_PREFIX: &str = "Summary: ";

/// A document-search backend.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run `query` and return the provider's raw text response
    async fn fetch(&self, query: &str) -> Result<String, SearchError>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

// =============================================================================
// SEARCH STAGE
// =============================================================================
/// First pipeline stage: query in, at most three papers out.
pub struct SearchStage {
    provider: Arc<dyn SearchProvider>,
    max_papers: usize,
    summary_max_chars: usize,
}

impl SearchStage {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        let defaults = Config::default();
        Self {
            provider,
            max_papers: defaults.max_papers,
            summary_max_chars: defaults.summary_max_chars,
        }
    }

    pub fn from_config(provider: Arc<dyn SearchProvider>, config: &Config) -> Self {
        Self::new(provider)
            .with_max_papers(config.max_papers)
            .with_summary_max_chars(config.summary_max_chars)
    }

    /// Papers kept per query, clamped to `1..=MAX_PAPERS`
    pub fn with_max_papers(mut self, max_papers: usize) -> Self {
        self.max_papers = max_papers.clamp(1, MAX_PAPERS);
        self
    }

    pub fn with_summary_max_chars(mut self, max_chars: usize) -> Self {
        self.summary_max_chars = max_chars;
        self
    }

    /// Search for papers matching `query`.
    pub async fn search(&self, query: &str) -> Result<Vec<PaperRecord>, SearchError> {
        info!(query = %query, provider = self.provider.name(), "Searching for papers");

        let raw = self.provider.fetch(query).await?;

        let papers: Vec<PaperRecord> = parse_papers(&raw, self.max_papers)
            .into_iter()
            .map(|mut paper| {
                paper.summary = truncate_chars(&paper.summary, self.summary_max_chars);
                paper
            })
            .collect();

        if papers.is_empty() {
            warn!(query = %query, "No papers found");
        } else {
            info!(query = %query, count = papers.len(), "Search completed");
        }

        Ok(papers)
    }
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================
/// Split a provider response into at most `max_papers` records.
///
/// Blank blocks are skipped; a block with no `Title: ` or `Summary: ` line
/// still yields a record carrying the placeholders.
pub fn parse_papers(raw: &str, max_papers: usize) -> Vec<PaperRecord> {
    raw.split("\n\n")
        .filter(|block| !block.trim().is_empty())
        .take(max_papers.min(MAX_PAPERS))
        .map(parse_block)
        .collect()
}

fn parse_block(block: &str) -> PaperRecord {
    let field = |prefix: &str| {
        block
            .lines()
            .find_map(|line| line.strip_prefix(prefix))
            .map(|value| value.to_string())
    };

    PaperRecord {
        title: field(TITLE_PREFIX).unwrap_or_else(|| UNTITLED.to_string()),
        summary: field(SUMMARY_PREFIX).unwrap_or_else(|| NO_SUMMARY.to_string()),
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
