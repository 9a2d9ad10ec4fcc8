//! # Research MAS
//!
//! Command-line front end for the research pipeline.
//!
//! For every query it will:
//! 1. Search arXiv for up to three papers
//! 2. Ask a language model to cluster them and find research gaps
//! 3. Propose new research topics from that analysis
//!
//! ## Quick Start
//! ```bash
//! GROQ_API_KEY=gsk-... cargo run -- "AI in healthcare"
//! ```

use std::io::Write as _;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::io::AsyncBufReadExt;
use tracing::{error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use research_mas::render::{render_session, render_state};
use research_mas::{Config, ResearchPipeline, ResearchSession};

// =============================================================================
// CLI ARGUMENTS
// =============================================================================
#[derive(Parser, Debug)]
#[command(
    name = "research-mas",
    version,
    about = "Search arXiv, analyze the papers with an LLM and propose new research topics",
    long_about = r#"
Research MAS - a small multi-stage research pipeline.

Each query runs three stages in order:
  1. search      arXiv, up to 3 papers
  2. analysis    LLM report: inferred topic, clusters, research gaps
  3. innovation  LLM proposes up to 5 new research topics

A failing stage never aborts the run; the output is marked as degraded.

CONFIGURATION (environment or .env):
  GROQ_API_KEY     Groq API key (without it the LLM stages are skipped)
  LLM_PROVIDER     groq | ollama
  LLM_MODEL        model name (default: llama3-70b-8192)

EXAMPLES:
  research-mas "AI in healthcare"
  research-mas --json "graph neural networks" "protein folding"
  research-mas --provider ollama --model llama3.2 --interactive
"#
)]
struct Args {
    /// Research queries, run one after another
    #[arg(value_name = "QUERY")]
    queries: Vec<String>,

    /// Model to use (overrides LLM_MODEL)
    #[arg(short = 'm', long = "model", env = "LLM_MODEL")]
    model: Option<String>,

    /// Language-model backend: groq or ollama (overrides LLM_PROVIDER)
    #[arg(short = 'p', long = "provider")]
    provider: Option<String>,

    /// Print results as JSON instead of text
    #[arg(long = "json", default_value = "false")]
    json: bool,

    /// Give up on a query after this many seconds
    #[arg(short = 't', long = "timeout", value_name = "SECS")]
    timeout: Option<u64>,

    /// Read queries from stdin (:clear, :results, :quit)
    #[arg(short = 'i', long = "interactive", default_value = "false")]
    interactive: bool,

    /// Enable verbose/debug logging
    #[arg(short = 'v', long = "verbose", default_value = "false")]
    verbose: bool,
}

// =============================================================================
// MAIN FUNCTION
// =============================================================================
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose)?;

    if args.queries.is_empty() && !args.interactive {
        anyhow::bail!("Provide at least one QUERY or use --interactive");
    }

    let mut config = Config::from_env()?;

    if let Some(model) = args.model.clone() {
        info!(model = %model, "Using model from command line");
        config.model = model;
    }
    if let Some(provider) = &args.provider {
        config.provider = provider.parse()?;
    }

    config.validate()?;

    info!(
        provider = %config.provider,
        model = %config.model,
        "Configuration loaded"
    );

    let pipeline = ResearchPipeline::from_config(&config)?;
    let timeout = args.timeout.map(Duration::from_secs);
    let mut session = ResearchSession::new();

    for query in &args.queries {
        run_query(&pipeline, &mut session, query, timeout).await;
    }

    if args.interactive {
        if !session.is_empty() {
            print_results(&session, args.json)?;
        }
        interactive(&pipeline, &mut session, timeout, args.json).await?;
    } else {
        print_results(&session, args.json)?;
    }

    info!(runs = session.len(), "Done");
    Ok(())
}

/// Run one query, bounded by `timeout` when given.
///
/// A timed-out run is dropped whole; nothing is added to the session.
async fn run_query(
    pipeline: &ResearchPipeline,
    session: &mut ResearchSession,
    query: &str,
    timeout: Option<Duration>,
) -> bool {
    match timeout {
        Some(limit) => match tokio::time::timeout(limit, session.submit(pipeline, query)).await {
            Ok(state) => state.is_some(),
            Err(_) => {
                error!(query = %query, secs = limit.as_secs(), "Query timed out");
                eprintln!("\n❌ Query timed out after {}s: {}", limit.as_secs(), query);
                false
            }
        },
        None => session.submit(pipeline, query).await.is_some(),
    }
}

async fn interactive(
    pipeline: &ResearchPipeline,
    session: &mut ResearchSession,
    timeout: Option<Duration>,
    json: bool,
) -> Result<()> {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("research> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "" => continue,
            ":quit" | ":q" => break,
            ":clear" => {
                session.clear();
                println!("Results cleared.");
            }
            ":results" => print_results(session, json)?,
            query => {
                if run_query(pipeline, session, query, timeout).await {
                    if let Some(state) = session.results().last() {
                        if json {
                            println!("{}", serde_json::to_string_pretty(state)?);
                        } else {
                            println!("{}", render_state(session.len(), state));
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_results(session: &ResearchSession, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(session.results())?);
    } else {
        println!("{}", render_session(session));
    }
    Ok(())
}

// =============================================================================
// LOGGING INITIALIZATION
// =============================================================================
/// Logs go to stderr so `--json` output stays machine-readable.
fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str().to_ascii_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set logging subscriber: {}", e))?;

    Ok(())
}
