//! Literature search backends

use crate::config::SearchConfig;
use crate::error::ToolError;
use async_trait::async_trait;
use cognito_domain::text::truncate_chars;
use cognito_domain::{LiteratureSearch, PaperSummary};
use serde::Deserialize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

/// Abstracts longer than this are cut
pub const MAX_ABSTRACT_CHARS: usize = 500;

const FIELDS: &str = "title,abstract,authors,year,citationCount,url";

/// Semantic Scholar Graph API client
pub struct SemanticScholarClient {
    endpoint: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<PaperRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaperRecord {
    #[serde(default)]
    title: Option<String>,
    #[serde(default, rename = "abstract")]
    abstract_text: Option<String>,
    #[serde(default)]
    authors: Vec<AuthorRecord>,
    #[serde(default)]
    year: Option<u32>,
    #[serde(default)]
    citation_count: Option<u64>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Deserialize)]
struct AuthorRecord {
    #[serde(default)]
    name: Option<String>,
}

impl From<PaperRecord> for PaperSummary {
    fn from(record: PaperRecord) -> Self {
        let abstract_excerpt = record
            .abstract_text
            .as_deref()
            .map(|a| truncate_chars(a, MAX_ABSTRACT_CHARS).to_string())
            .unwrap_or_default();
        PaperSummary {
            title: record.title.unwrap_or_default(),
            abstract_excerpt,
            authors: record.authors.into_iter().filter_map(|a| a.name).collect(),
            year: record.year,
            citation_count: record.citation_count.unwrap_or(0),
            url: record.url.filter(|u| !u.is_empty()),
        }
    }
}

impl SemanticScholarClient {
    /// Create a client from settings
    pub fn new(config: &SearchConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl LiteratureSearch for SemanticScholarClient {
    type Error = ToolError;

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<PaperSummary>, Self::Error> {
        let url = format!("{}/paper/search", self.endpoint);
        let limit = limit.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("query", query), ("limit", limit.as_str()), ("fields", FIELDS)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Status(status.as_u16()));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ToolError::InvalidResponse(e.to_string()))?;
        debug!("Semantic Scholar returned {} papers for '{}'", body.data.len(), query);
        Ok(body.data.into_iter().map(PaperSummary::from).collect())
    }
}

#[derive(Debug, Default)]
struct MockSearchState {
    results: Vec<(String, Vec<PaperSummary>)>,
    failures: Vec<String>,
    queries: Vec<String>,
}

/// Scripted search backend for tests and offline runs
///
/// Results are keyed by query substring; the first matching key wins and
/// unmatched queries return the default list. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockSearch {
    default_results: Vec<PaperSummary>,
    state: Arc<Mutex<MockSearchState>>,
}

impl MockSearch {
    /// Answer every query with `papers`
    pub fn new(papers: Vec<PaperSummary>) -> Self {
        Self {
            default_results: papers,
            state: Arc::default(),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockSearchState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Answer queries containing `key` with `papers`
    pub fn add_results(&self, key: impl Into<String>, papers: Vec<PaperSummary>) {
        self.state().results.push((key.into(), papers));
    }

    /// Fail queries containing `key`
    pub fn add_failure(&self, key: impl Into<String>) {
        self.state().failures.push(key.into());
    }

    /// Queries received so far
    pub fn queries(&self) -> Vec<String> {
        self.state().queries.clone()
    }
}

#[async_trait]
impl LiteratureSearch for MockSearch {
    type Error = ToolError;

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<PaperSummary>, Self::Error> {
        let mut state = self.state();
        state.queries.push(query.to_string());
        if state.failures.iter().any(|key| query.contains(key.as_str())) {
            return Err(ToolError::Search(format!("scripted failure for '{}'", query)));
        }
        let mut papers = state
            .results
            .iter()
            .find(|(key, _)| query.contains(key.as_str()))
            .map(|(_, papers)| papers.clone())
            .unwrap_or_else(|| self.default_results.clone());
        papers.truncate(limit);
        Ok(papers)
    }
}

/// A paper with just a title and citation count, for scripting searches
pub fn paper(title: &str, citation_count: u64) -> PaperSummary {
    PaperSummary {
        title: title.to_string(),
        abstract_excerpt: String::new(),
        authors: Vec::new(),
        year: None,
        citation_count,
        url: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_conversion_truncates_abstract() {
        let json = serde_json::json!({
            "data": [{
                "title": "Deep sleep",
                "abstract": "x".repeat(800),
                "authors": [{"name": "A. Author"}, {"authorId": "1"}],
                "year": 2021,
                "citationCount": 42,
                "url": ""
            }, {
                "title": null
            }]
        });
        let body: SearchResponse = serde_json::from_value(json).unwrap();
        let papers: Vec<PaperSummary> = body.data.into_iter().map(PaperSummary::from).collect();

        assert_eq!(papers[0].abstract_excerpt.chars().count(), MAX_ABSTRACT_CHARS);
        assert_eq!(papers[0].authors, vec!["A. Author"]);
        assert_eq!(papers[0].citation_count, 42);
        assert_eq!(papers[0].url, None);
        assert_eq!(papers[1].title, "");
        assert_eq!(papers[1].citation_count, 0);
    }

    #[tokio::test]
    async fn test_mock_search_scripting() {
        let search = MockSearch::new(vec![paper("Default", 1)]);
        search.add_results("sleep", vec![paper("Sleep A", 10), paper("Sleep B", 20)]);
        search.add_failure("broken");

        assert_eq!(search.search("deep sleep", 1).await.unwrap()[0].title, "Sleep A");
        assert_eq!(search.search("other", 5).await.unwrap()[0].title, "Default");
        assert!(search.search("broken query", 5).await.is_err());
        assert_eq!(search.queries().len(), 3);
    }
}
