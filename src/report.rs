//! # Report Parser
//!
//! Extracts structure from the analysis stage's markdown report.
//!
//! The report format is the contract between the analysis and innovation
//! stages:
//!
//! ```text
//! **Inferred Topic**: <topic>
//! ### Cluster 1
//! ...
//! **Common terms**: <term>, <term>, ...
//! ## Research Gaps
//! - <gap>
//! - <gap>
//! ```
//!
//! Parsing never fails. Anything missing comes back as its default.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// Topic used when the report has no `**Inferred Topic**` line
pub const DEFAULT_TOPIC: &str = "research";

static TOPIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*Inferred Topic\*\*: (.*?)(?:\r?\n|$)").expect("valid regex")
});

static CLUSTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"### Cluster (\d+)\r?\n[\s\S]*?\*\*Common terms\*\*: (.*?)(?:\r?\n|$)")
        .expect("valid regex")
});

static GAPS_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"## Research Gaps\r?\n").expect("valid regex"));

/// Structured view of an analysis report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReport {
    pub topic: String,
    /// Terms per cluster, keyed by the number in its `### Cluster <n>` header
    pub cluster_terms: BTreeMap<usize, Vec<String>>,
    pub gaps: Vec<String>,
}

impl Default for ParsedReport {
    fn default() -> Self {
        Self {
            topic: DEFAULT_TOPIC.to_string(),
            cluster_terms: BTreeMap::new(),
            gaps: Vec::new(),
        }
    }
}

impl ParsedReport {
    /// All cluster terms, in cluster order
    pub fn all_terms(&self) -> Vec<&str> {
        self.cluster_terms
            .values()
            .flatten()
            .map(String::as_str)
            .collect()
    }
}

/// Turns report text into a [`ParsedReport`].
pub trait ReportParser: Send + Sync {
    fn parse(&self, report: &str) -> ParsedReport;
}

/// Parser for the markdown layout the analysis prompt asks for.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownReportParser;

impl ReportParser for MarkdownReportParser {
    fn parse(&self, report: &str) -> ParsedReport {
        let mut parsed = ParsedReport::default();

        if let Some(topic) = TOPIC_RE.captures(report) {
            parsed.topic = topic[1].trim().to_string();
        }

        for cluster in CLUSTER_RE.captures_iter(report) {
            // Digits only, but may still overflow usize
            let Ok(number) = cluster[1].parse::<usize>() else {
                continue;
            };
            let terms = cluster[2]
                .split(',')
                .map(str::trim)
                .filter(|term| !term.is_empty())
                .map(str::to_string)
                .collect();
            parsed.cluster_terms.insert(number, terms);
        }

        parsed.gaps = parse_gaps(report);

        parsed
    }
}

/// Bullet items between `## Research Gaps` and the next `##` heading.
fn parse_gaps(report: &str) -> Vec<String> {
    let Some(header) = GAPS_HEADER_RE.find(report) else {
        return Vec::new();
    };
    let section = &report[header.end()..];
    let section = match section.find("\n##") {
        Some(end) => &section[..end],
        None => section,
    };

    section
        .lines()
        .filter_map(|line| line.trim().strip_prefix("- "))
        .map(str::trim)
        .filter(|gap| !gap.is_empty())
        .map(str::to_string)
        .collect()
}
