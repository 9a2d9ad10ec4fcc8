//! arXiv search provider
//!
//! Queries the public arXiv Atom API and renders each entry in the
//! `Published/Title/Authors/Summary` text convention the search stage parses.
//!
//! The Atom feed is scraped with a handful of regexes rather than a full XML
//! parser; only four elements per entry are needed.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use tracing::debug;

use super::SearchProvider;
use crate::config::{Config, MAX_PAPERS};
use crate::error::SearchError;

static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<entry[^>]*>(.*?)</entry>").expect("valid regex"));
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<title[^>]*>(.*?)</title>").expect("valid regex"));
static SUMMARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<summary[^>]*>(.*?)</summary>").expect("valid regex"));
static PUBLISHED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<published[^>]*>(.*?)</published>").expect("valid regex"));
static AUTHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<author[^>]*>\s*<name[^>]*>(.*?)</name>").expect("valid regex")
});
static CHAR_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(?:x([0-9A-Fa-f]+)|([0-9]+));").expect("valid regex"));

/// arXiv Atom API client
#[derive(Debug, Clone)]
pub struct ArxivProvider {
    base_url: String,
    max_results: usize,
    max_query_length: usize,
    client: Client,
}

impl ArxivProvider {
    /// Create a client with the default result limit, query length and timeout
    pub fn new(base_url: impl Into<String>) -> Result<Self, SearchError> {
        let defaults = Config::default();
        Self::with_settings(
            base_url,
            defaults.max_papers,
            defaults.max_query_length,
            Duration::from_secs(defaults.request_timeout_secs),
        )
    }

    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        Self::with_settings(
            config.arxiv_base_url.clone(),
            config.max_papers,
            config.max_query_length,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn with_settings(
        base_url: impl Into<String>,
        max_results: usize,
        max_query_length: usize,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("research-mas/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            max_results: max_results.clamp(1, MAX_PAPERS),
            max_query_length,
            client,
        })
    }

    fn request_url(&self, query: &str) -> String {
        let query: String = query.chars().take(self.max_query_length).collect();
        format!(
            "{}?search_query=all:{}&start=0&max_results={}",
            self.base_url,
            urlencoding::encode(query.trim()),
            self.max_results
        )
    }
}

#[async_trait]
impl SearchProvider for ArxivProvider {
    async fn fetch(&self, query: &str) -> Result<String, SearchError> {
        let url = self.request_url(query);
        debug!(url = %url, "Fetching arXiv feed");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(SearchError::RateLimited);
            }
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::HttpError(status.as_u16(), body));
        }

        let feed = response.text().await?;
        Ok(render_feed(&feed, self.max_results))
    }

    fn name(&self) -> &str {
        "arxiv"
    }
}

// =============================================================================
// FEED RENDERING
// =============================================================================
/// Render up to `max_entries` Atom entries as text blocks.
fn render_feed(feed: &str, max_entries: usize) -> String {
    ENTRY_RE
        .captures_iter(feed)
        .take(max_entries)
        .map(|entry| render_entry(&entry[1]))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_entry(entry: &str) -> String {
    let mut lines = Vec::with_capacity(4);

    if let Some(published) = capture(&PUBLISHED_RE, entry) {
        let date = published.split('T').next().unwrap_or(&published).to_string();
        lines.push(format!("Published: {}", date));
    }
    if let Some(title) = capture(&TITLE_RE, entry) {
        lines.push(format!("Title: {}", title));
    }

    let authors: Vec<String> = AUTHOR_RE
        .captures_iter(entry)
        .map(|c| clean_text(&c[1]))
        .collect();
    if !authors.is_empty() {
        lines.push(format!("Authors: {}", authors.join(", ")));
    }

    if let Some(summary) = capture(&SUMMARY_RE, entry) {
        lines.push(format!("Summary: {}", summary));
    }

    lines.join("\n")
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .map(|c| clean_text(&c[1]))
        .filter(|value| !value.is_empty())
}

/// Collapse whitespace onto one line and decode the XML entities arXiv emits.
fn clean_text(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    // `&amp;` goes last so `&amp;#39;` stays literal text
    CHAR_REF_RE
        .replace_all(&collapsed, |caps: &regex::Captures| {
            let code = match (caps.get(1), caps.get(2)) {
                (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
                (None, Some(dec)) => dec.as_str().parse::<u32>().ok(),
                (None, None) => None,
            };
            code.and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
