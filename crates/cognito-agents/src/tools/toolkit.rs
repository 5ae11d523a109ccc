//! Tool dispatch with timeouts and an invocation log

use crate::error::ToolError;
use crate::tools::assess::{
    analyze_feasibility, score_testability, validate_statistical_claim, FeasibilityAssessment,
    NoveltyAssessment, StatisticalAssessment, TestabilityAssessment,
};
use cognito_domain::text::truncate_chars;
use cognito_domain::{AgentRole, LiteratureSearch, PaperSummary, ToolInvocation};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Characters of a hypothesis used as a novelty search query
const NOVELTY_QUERY_CHARS: usize = 200;

/// Papers compared when checking novelty
const NOVELTY_SEARCH_LIMIT: usize = 3;

/// The tools available to agent roles during one run
///
/// Every call is recorded with the calling role and its arguments.
pub struct ToolKit<S: LiteratureSearch> {
    search: Arc<S>,
    timeout: Duration,
    invocations: Vec<ToolInvocation>,
}

impl<S: LiteratureSearch> ToolKit<S> {
    /// Create a toolkit over a search backend
    pub fn new(search: Arc<S>, timeout: Duration) -> Self {
        Self {
            search,
            timeout,
            invocations: Vec::new(),
        }
    }

    fn record(&mut self, role: AgentRole, tool: &str, arguments: serde_json::Value) {
        debug!("{} -> {}", role, tool);
        self.invocations.push(ToolInvocation {
            role,
            tool: tool.to_string(),
            arguments,
        });
    }

    /// `search_literature`: query the search backend
    pub async fn search_literature(
        &mut self,
        role: AgentRole,
        query: &str,
        limit: usize,
    ) -> Result<Vec<PaperSummary>, ToolError> {
        self.record(role, "search_literature", json!({"query": query, "limit": limit}));
        self.bounded_search(query, limit).await
    }

    async fn bounded_search(&self, query: &str, limit: usize) -> Result<Vec<PaperSummary>, ToolError> {
        timeout(self.timeout, self.search.search(query, limit))
            .await
            .map_err(|_| ToolError::Timeout("search_literature"))?
            .map_err(|e| ToolError::Search(e.to_string()))
    }

    /// `check_hypothesis_novelty`: compare against the most similar papers
    ///
    /// Never fails; a search error yields the neutral 0.5 estimate.
    pub async fn check_novelty(&mut self, role: AgentRole, hypothesis: &str) -> NoveltyAssessment {
        let query = truncate_chars(hypothesis, NOVELTY_QUERY_CHARS);
        self.record(role, "check_hypothesis_novelty", json!({"hypothesis": query}));
        match self.bounded_search(query, NOVELTY_SEARCH_LIMIT).await {
            Ok(papers) => NoveltyAssessment::from_papers(&papers),
            Err(e) => {
                warn!("Novelty check failed: {}", e);
                NoveltyAssessment::unavailable(e.to_string())
            }
        }
    }

    /// `score_hypothesis_testability`
    pub fn score_testability(
        &mut self,
        role: AgentRole,
        hypothesis: &str,
        methodology: &[String],
    ) -> TestabilityAssessment {
        self.record(
            role,
            "score_hypothesis_testability",
            json!({"hypothesis": hypothesis, "methodology": methodology}),
        );
        score_testability(hypothesis, methodology)
    }

    /// `analyze_research_feasibility`
    pub fn analyze_feasibility(
        &mut self,
        role: AgentRole,
        hypothesis: &str,
        required_resources: &[String],
    ) -> FeasibilityAssessment {
        self.record(
            role,
            "analyze_research_feasibility",
            json!({"hypothesis": hypothesis, "required_resources": required_resources}),
        );
        analyze_feasibility(hypothesis, required_resources)
    }

    /// `validate_statistical_claim`
    pub fn validate_statistical_claim(
        &mut self,
        role: AgentRole,
        claim: &str,
        data_description: &str,
    ) -> StatisticalAssessment {
        self.record(
            role,
            "validate_statistical_claim",
            json!({"claim": claim, "data_description": data_description}),
        );
        validate_statistical_claim(claim, data_description)
    }

    /// Calls made so far
    pub fn invocations(&self) -> &[ToolInvocation] {
        &self.invocations
    }

    /// Consume into the invocation log
    pub fn into_invocations(self) -> Vec<ToolInvocation> {
        self.invocations
    }
}
