//! # research-mas
//!
//! A three-stage research pipeline:
//!
//! 1. **Search** arXiv for up to three papers matching a query
//! 2. **Analyze** them with a language model into a markdown report of
//!    clusters and research gaps
//! 3. **Innovate**: parse that report and ask the model for new topics
//!
//! Each stage degrades on its own. A run always produces a complete
//! [`WorkflowState`]; failures are listed in `WorkflowState::failures`.
//!
//! ```ignore
//! use research_mas::{Config, ResearchPipeline};
//!
//! let config = Config::from_env()?;
//! let pipeline = ResearchPipeline::from_config(&config)?;
//! let state = pipeline.run("AI in healthcare").await;
//! println!("{}", state.suggested_topics);
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod innovation;
pub mod llm;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod search;
pub mod session;
pub mod state;

pub use analysis::AnalysisStage;
pub use config::{Config, ProviderKind};
pub use error::{AnalysisError, LlmError, SearchError};
pub use innovation::{GenerationStatus, InnovationStage, Suggestions};
pub use llm::LanguageModel;
pub use pipeline::ResearchPipeline;
pub use report::{MarkdownReportParser, ParsedReport, ReportParser};
pub use search::{SearchProvider, SearchStage};
pub use session::ResearchSession;
pub use state::{PaperRecord, Stage, StageFailure, WorkflowState};
