//! # Research Pipeline
//!
//! Runs search → analysis → innovation in fixed order.
//!
//! ```text
//!   query ──▶ SearchStage ──▶ AnalysisStage ──▶ InnovationStage ──▶ WorkflowState
//!             papers          report            suggested topics
//! ```
//!
//! The state is moved through each step by value. A failing stage leaves its
//! field at the empty default, records a [`StageFailure`](crate::StageFailure),
//! and the next stage still runs. `run` always returns a complete state.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::analysis::AnalysisStage;
use crate::config::Config;
use crate::innovation::{GenerationStatus, InnovationStage};
use crate::llm::{self, LanguageModel};
use crate::search::{ArxivProvider, SearchProvider, SearchStage};
use crate::state::{Stage, WorkflowState};

/// The three-stage workflow sequencer.
pub struct ResearchPipeline {
    search: SearchStage,
    analysis: AnalysisStage,
    innovation: InnovationStage,
}

impl ResearchPipeline {
    /// Assemble a pipeline from already-built stages
    pub fn new(search: SearchStage, analysis: AnalysisStage, innovation: InnovationStage) -> Self {
        Self {
            search,
            analysis,
            innovation,
        }
    }

    /// Assemble a pipeline around a search provider and an optional model.
    ///
    /// Both LLM stages share the same model.
    pub fn with_providers(
        search: Arc<dyn SearchProvider>,
        model: Option<Arc<dyn LanguageModel>>,
        config: &Config,
    ) -> Self {
        Self::new(
            SearchStage::from_config(search, config),
            AnalysisStage::new(model.clone()),
            InnovationStage::new(model),
        )
    }

    /// Build the production pipeline: arXiv search plus the configured model.
    pub fn from_config(config: &Config) -> Result<Self> {
        let search = Arc::new(ArxivProvider::from_config(config)?);
        let model = llm::build_model(config)?;
        Ok(Self::with_providers(search, model, config))
    }

    /// Run the whole pipeline for one query.
    pub async fn run(&self, query: &str) -> WorkflowState {
        info!(query = %query, "Starting research pipeline");

        let state = WorkflowState::new(query);
        let state = self.search_step(state).await;
        let state = self.analysis_step(state).await;
        let state = self.innovation_step(state).await;

        if state.is_degraded() {
            warn!(query = %query, failures = state.failures.len(), "Pipeline completed with degraded output");
        } else {
            info!(query = %query, "Pipeline completed");
        }

        state
    }

    async fn search_step(&self, mut state: WorkflowState) -> WorkflowState {
        match self.search.search(&state.query).await {
            Ok(papers) => state.search_results = papers,
            Err(e) => {
                let message = format!("arXiv search failed: {}", e);
                warn!(error = %e, "Search stage degraded");
                state.record_failure(Stage::Search, message);
            }
        }
        state
    }

    async fn analysis_step(&self, mut state: WorkflowState) -> WorkflowState {
        match self.analysis.analyze_papers(&state.search_results).await {
            Ok(report) => state.analysis_report = report,
            Err(e) => {
                warn!(error = %e, "Analysis stage degraded");
                state.record_failure(Stage::Analysis, e.to_string());
            }
        }
        state
    }

    async fn innovation_step(&self, mut state: WorkflowState) -> WorkflowState {
        let suggestions = self.innovation.suggest_topics(&state.analysis_report).await;

        match &suggestions.status {
            GenerationStatus::Failed(reason) => {
                state.record_failure(Stage::Innovation, format!("LLM generation failed: {}", reason));
            }
            GenerationStatus::ModelUnavailable => {
                state.record_failure(Stage::Innovation, "no language model configured");
            }
            GenerationStatus::Generated | GenerationStatus::NoReport => {}
        }

        state.suggested_topics = suggestions.to_markdown();
        state
    }
}
