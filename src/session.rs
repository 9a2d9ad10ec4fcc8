//! Result session
//!
//! Keeps every completed run for display, in submission order.

use crate::pipeline::ResearchPipeline;
use crate::state::WorkflowState;

/// Accumulated pipeline results.
#[derive(Debug, Default)]
pub struct ResearchSession {
    results: Vec<WorkflowState>,
}

impl ResearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `query` through the pipeline and keep the result.
    ///
    /// Blank queries are ignored and return `None`.
    pub async fn submit(&mut self, pipeline: &ResearchPipeline, query: &str) -> Option<&WorkflowState> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let state = pipeline.run(query).await;
        self.results.push(state);
        self.results.last()
    }

    /// Keep an externally produced result
    pub fn push(&mut self, state: WorkflowState) {
        self.results.push(state);
    }

    pub fn clear(&mut self) {
        self.results.clear();
    }

    pub fn results(&self) -> &[WorkflowState] {
        &self.results
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }
}
