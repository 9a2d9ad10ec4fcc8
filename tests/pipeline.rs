//! Integration tests for the research pipeline
//!
//! These tests drive `ResearchPipeline::run` end to end with:
//! - in-process fake search providers and language models
//! - wiremock servers standing in for arXiv and Groq

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use research_mas::{
    Config, LanguageModel, LlmError, ResearchPipeline, ResearchSession, SearchError,
    SearchProvider, Stage,
};

// =============================================================================
// FAKES
// =============================================================================

struct FakeArxiv {
    papers: usize,
}

#[async_trait]
impl SearchProvider for FakeArxiv {
    async fn fetch(&self, query: &str) -> Result<String, SearchError> {
        Ok((1..=self.papers)
            .map(|n| {
                format!(
                    "Published: 2024-01-0{n}\nTitle: {query} paper {n}\nAuthors: Someone\nSummary: Findings number {n}."
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n"))
    }

    fn name(&self) -> &str {
        "fake-arxiv"
    }
}

struct DownSearch;

#[async_trait]
impl SearchProvider for DownSearch {
    async fn fetch(&self, _query: &str) -> Result<String, SearchError> {
        Err(SearchError::Timeout)
    }

    fn name(&self) -> &str {
        "down"
    }
}

const ANALYSIS_REPORT: &str = "# Analysis\n\
**Inferred Topic**: AI in Healthcare\n\
\n\
### Cluster 1\n\
Papers on diagnostic models.\n\
**Common terms**: deep learning, diagnosis, medical imaging\n\
\n\
## Research Gaps\n\
- Limited clinical validation\n\
- Bias in patient datasets\n";

const TOPICS_RESPONSE: &str = "Here are some proposals:\n\
1. Prospective trials for deep-learning diagnosis\n\
2. Bias audits for medical imaging datasets\n\
3. Federated learning across hospitals\n\
4. Explainable triage models\n\
5. Continual learning under distribution shift\n\
6. This one is dropped\n";

/// Answers analysis and innovation prompts differently and counts calls.
struct StagedModel {
    analysis: Result<&'static str, ()>,
    innovation: Result<&'static str, ()>,
    calls: AtomicUsize,
}

impl StagedModel {
    fn new(analysis: Result<&'static str, ()>, innovation: Result<&'static str, ()>) -> Arc<Self> {
        Arc::new(Self {
            analysis,
            innovation,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl LanguageModel for StagedModel {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = if prompt.starts_with("Analyze the following research data:") {
            self.analysis
        } else {
            self.innovation
        };
        reply
            .map(str::to_string)
            .map_err(|_| LlmError::ServerError(500, "upstream exploded".to_string()))
    }

    fn name(&self) -> &str {
        "staged"
    }

    fn model(&self) -> &str {
        "staged-v1"
    }
}

fn pipeline(search: Arc<dyn SearchProvider>, model: Option<Arc<dyn LanguageModel>>) -> ResearchPipeline {
    ResearchPipeline::with_providers(search, model, &Config::default())
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[tokio::test]
async fn test_ai_in_healthcare_scenario() {
    let model = StagedModel::new(Ok(ANALYSIS_REPORT), Ok(TOPICS_RESPONSE));
    let pipeline = pipeline(Arc::new(FakeArxiv { papers: 5 }), Some(model.clone()));

    let state = pipeline.run("AI in healthcare").await;

    assert_eq!(state.query, "AI in healthcare");
    assert_eq!(state.search_results.len(), 3);
    assert_eq!(state.search_results[0].title, "AI in healthcare paper 1");
    assert_eq!(state.search_results[2].summary, "Findings number 3.");
    assert_eq!(state.analysis_report, ANALYSIS_REPORT);
    assert_eq!(
        state.suggested_topics,
        "# Suggested Research Topics\n\
         **Based on Topic**: AI in Healthcare\n\
         \n\
         ## Proposed Topics\n\
         1. Prospective trials for deep-learning diagnosis\n\
         2. Bias audits for medical imaging datasets\n\
         3. Federated learning across hospitals\n\
         4. Explainable triage models\n\
         5. Continual learning under distribution shift"
    );
    assert!(!state.is_degraded());
    assert_eq!(model.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_total_provider_failure_still_completes() {
    let pipeline = pipeline(Arc::new(DownSearch), None);

    let state = pipeline.run("anything").await;

    assert_eq!(state.query, "anything");
    assert!(state.search_results.is_empty());
    assert!(state.analysis_report.is_empty());
    assert_eq!(
        state.suggested_topics,
        "# Suggested Research Topics\nNo report provided to suggest topics."
    );

    assert!(state.is_degraded());
    assert!(state.failure(Stage::Search).is_some());
    let analysis = state.failure(Stage::Analysis).expect("analysis failure recorded");
    assert!(analysis.message.starts_with("Error in analysis:"));
    assert!(state.failure(Stage::Innovation).is_none());
}

#[tokio::test]
async fn test_search_failure_does_not_stop_analysis() {
    let model = StagedModel::new(Ok(ANALYSIS_REPORT), Ok("- Only topic"));
    let pipeline = pipeline(Arc::new(DownSearch), Some(model.clone()));

    let state = pipeline.run("anything").await;

    assert_eq!(
        state.failure(Stage::Search).map(|f| f.message.as_str()),
        Some("arXiv search failed: Request timed out")
    );
    assert_eq!(state.analysis_report, ANALYSIS_REPORT);
    assert!(state.suggested_topics.ends_with("## Proposed Topics\n1. Only topic"));
    assert_eq!(model.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_analysis_failure_skips_generation() {
    let model = StagedModel::new(Err(()), Ok(TOPICS_RESPONSE));
    let pipeline = pipeline(Arc::new(FakeArxiv { papers: 2 }), Some(model.clone()));

    let state = pipeline.run("anything").await;

    assert_eq!(state.search_results.len(), 2);
    assert!(state.analysis_report.is_empty());
    assert_eq!(
        state.failure(Stage::Analysis).map(|f| f.message.as_str()),
        Some("Error in analysis: Server error (500): upstream exploded")
    );
    assert!(state.suggested_topics.contains("No report provided"));
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_innovation_failure_keeps_header() {
    let model = StagedModel::new(Ok(ANALYSIS_REPORT), Err(()));
    let pipeline = pipeline(Arc::new(FakeArxiv { papers: 1 }), Some(model));

    let state = pipeline.run("anything").await;

    assert_eq!(
        state.suggested_topics,
        "# Suggested Research Topics\n**Based on Topic**: AI in Healthcare\n\n## Proposed Topics"
    );
    let failure = state.failure(Stage::Innovation).expect("innovation failure recorded");
    assert!(failure.message.starts_with("LLM generation failed:"));
}

#[tokio::test]
async fn test_session_accumulates_runs() {
    let model = StagedModel::new(Ok(ANALYSIS_REPORT), Ok(TOPICS_RESPONSE));
    let pipeline = pipeline(Arc::new(FakeArxiv { papers: 3 }), Some(model));
    let mut session = ResearchSession::new();

    assert!(session.submit(&pipeline, "   ").await.is_none());
    session.submit(&pipeline, "first").await;
    session.submit(&pipeline, " second ").await;

    let queries: Vec<&str> = session.results().iter().map(|s| s.query.as_str()).collect();
    assert_eq!(queries, vec!["first", "second"]);

    session.clear();
    assert!(session.is_empty());
}

// =============================================================================
// HTTP END TO END
// =============================================================================

mod http {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FEED: &str = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <published>2024-03-01T00:00:00Z</published>
    <title>Transformers for Radiology</title>
    <summary>We apply transformers to chest X-rays.</summary>
    <author><name>R. Searcher</name></author>
  </entry>
</feed>"#;

    fn chat(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
        })
    }

    #[tokio::test]
    async fn test_pipeline_over_http() {
        let arxiv = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/query"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
            .mount(&arxiv)
            .await;

        let groq = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat(ANALYSIS_REPORT)))
            .up_to_n_times(1)
            .mount(&groq)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat("1. Radiology foundation models")))
            .mount(&groq)
            .await;

        let config = Config {
            groq_api_key: Some("test-key".to_string()),
            groq_base_url: groq.uri(),
            arxiv_base_url: format!("{}/api/query", arxiv.uri()),
            max_retries: 0,
            ..Config::default()
        };
        let pipeline = ResearchPipeline::from_config(&config).unwrap();

        let state = pipeline.run("radiology").await;

        assert!(!state.is_degraded(), "unexpected failures: {:?}", state.failures);
        assert_eq!(state.search_results.len(), 1);
        assert_eq!(state.search_results[0].title, "Transformers for Radiology");
        assert_eq!(state.analysis_report, ANALYSIS_REPORT);
        assert!(state.suggested_topics.ends_with("1. Radiology foundation models"));
    }

    #[tokio::test]
    async fn test_pipeline_over_http_without_key() {
        let arxiv = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
            .mount(&arxiv)
            .await;

        let config = Config {
            arxiv_base_url: arxiv.uri(),
            ..Config::default()
        };
        let pipeline = ResearchPipeline::from_config(&config).unwrap();

        let state = pipeline.run("radiology").await;

        assert_eq!(state.search_results.len(), 1);
        assert!(state.analysis_report.is_empty());
        assert!(state.failure(Stage::Analysis).is_some());
        assert!(state.suggested_topics.contains("No report provided"));
    }
}
