//! Terminal rendering of pipeline results
//!
//! Plain markdown-ish text: one section per query with the papers, the
//! analysis report and the suggested topics.

use std::fmt::Write;

use crate::session::ResearchSession;
use crate::state::WorkflowState;

/// Banner shown above results that used a fallback
pub const DEGRADED_WARNING: &str =
    "⚠ Some results used fallback mechanisms due to issues with the search or language model APIs.";

/// Shown when the session holds no results
pub const EMPTY_SESSION: &str = "No results yet. Submit a query to see results.";

const NO_PAPERS: &str = "No papers found or error in search.";

/// Render every result in the session, numbered from 1.
pub fn render_session(session: &ResearchSession) -> String {
    if session.is_empty() {
        return EMPTY_SESSION.to_string();
    }

    session
        .results()
        .iter()
        .enumerate()
        .map(|(idx, state)| render_state(idx + 1, state))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render a single result as section `number`.
pub fn render_state(number: usize, state: &WorkflowState) -> String {
    let rule = "=".repeat(60);
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "Query {}: {}", number, state.query);
    let _ = writeln!(out, "{}", rule);

    if state.is_degraded() {
        let _ = writeln!(out, "{}", DEGRADED_WARNING);
        for failure in &state.failures {
            let _ = writeln!(out, "  - {}", failure);
        }
    }

    let _ = writeln!(out, "\n## Research Papers (arXiv)\n");
    if state.search_results.is_empty() {
        let _ = writeln!(out, "{}", NO_PAPERS);
    } else {
        for (i, paper) in state.search_results.iter().enumerate() {
            let _ = writeln!(out, "{}. **{}**\n   {}", i + 1, paper.title, paper.summary);
        }
    }

    let _ = writeln!(out, "\n## Analysis Report\n");
    if state.analysis_report.is_empty() {
        let _ = writeln!(out, "(no report)");
    } else {
        let _ = writeln!(out, "{}", state.analysis_report);
    }

    let _ = writeln!(out, "\n## Suggested Topics\n");
    let _ = write!(out, "{}", state.suggested_topics);

    out
}
