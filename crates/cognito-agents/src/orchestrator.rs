//! Agentic orchestrator: supervisor loop and the four roles

use crate::config::AgentsConfig;
use crate::error::AgentError;
use crate::parse::{parse_hypotheses, HypothesisParse, ParsedHypothesis};
use crate::prompt::{
    critic_prompt, generator_prompt, research_prompt, CRITIC_SYSTEM_PROMPT,
    GENERATOR_SYSTEM_PROMPT, RESEARCH_SYSTEM_PROMPT,
};
use crate::state::AgenticState;
use crate::supervisor::{route, AgentStep, Route};
use crate::tools::ToolKit;
use async_trait::async_trait;
use cognito_domain::confidence::DEFAULT_SCORE;
use cognito_domain::text::truncate_chars;
use cognito_domain::{
    AgentRole, Hypothesis, HypothesisScores, HypothesisStatus, LiteratureSearch, LlmProvider,
    LlmRequest, OrchestrationMode, PaperSummary, SynthesisOutput,
};
use cognito_extractor::{ConceptExtractor, ExtractorConfig};
use cognito_pipeline::{Orchestrator, PipelineError, ProgressSink, SynthesisRequest};
use serde_json::json;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Methods suggested for every generated hypothesis
const METHODOLOGY_HINTS: [&str; 2] = ["Experimental validation", "Statistical analysis"];

const RATIONALE_FALLBACK: &str = "Generated from concept analysis";

/// Progress recorded when each role completes
fn progress_after(step: AgentStep) -> f64 {
    match step {
        AgentStep::Start => 0.0,
        AgentStep::ResearchComplete => 0.3,
        AgentStep::AnalysisComplete => 0.5,
        AgentStep::HypothesesGenerated => 0.7,
        AgentStep::ValidationComplete => 0.9,
    }
}

/// Supervisor-routed synthesis with research, analyzer, generator and
/// critic roles
///
/// Each role appends exactly one transcript message, whether it succeeds
/// or fails. A failing role records an error that routes the supervisor to
/// END, and the run then returns [`PipelineError::Orchestration`].
pub struct AgenticOrchestrator<L: LlmProvider, S: LiteratureSearch> {
    llm: Arc<L>,
    search: Arc<S>,
    analyzer: ConceptExtractor<L>,
    config: AgentsConfig,
}

impl<L: LlmProvider, S: LiteratureSearch> AgenticOrchestrator<L, S> {
    /// Create an orchestrator
    ///
    /// The analyzer reuses the extractor with its temperature replaced by
    /// the analyzer role's.
    pub fn new(
        llm: Arc<L>,
        search: Arc<S>,
        config: AgentsConfig,
        extractor: ExtractorConfig,
    ) -> Result<Self, AgentError> {
        config.validate().map_err(AgentError::Config)?;
        extractor.validate().map_err(AgentError::Config)?;

        let analyzer = ConceptExtractor::new(
            Arc::clone(&llm),
            ExtractorConfig {
                temperature: config.analyzer_temperature,
                ..extractor
            },
        );

        Ok(Self {
            llm,
            search,
            analyzer,
            config,
        })
    }

    /// Run the supervisor loop and return the final state with its tool log
    pub async fn run_to_end(
        &self,
        request: &SynthesisRequest,
        progress: &dyn ProgressSink,
    ) -> (AgenticState, ToolKit<S>) {
        let mut state = AgenticState::new();
        let mut kit = ToolKit::new(Arc::clone(&self.search), self.config.tool_timeout());

        loop {
            let next = route(state.current_step(), state.error().is_some());
            let (role, outcome, step) = match next {
                Route::Research => (
                    AgentRole::Research,
                    self.research(&mut state, &mut kit, request).await,
                    AgentStep::ResearchComplete,
                ),
                Route::Analyze => (
                    AgentRole::Analyzer,
                    self.analyze(&mut state, request).await,
                    AgentStep::AnalysisComplete,
                ),
                Route::Generate => (
                    AgentRole::Generator,
                    self.generate(&mut state, &mut kit, request).await,
                    AgentStep::HypothesesGenerated,
                ),
                Route::Critique => (
                    AgentRole::Critic,
                    self.critique(&mut state, &mut kit).await,
                    AgentStep::ValidationComplete,
                ),
                Route::End => break,
            };

            match outcome {
                Ok(message) => {
                    info!("{}: {}", role, message);
                    state.complete(role, message.clone(), step, progress_after(step));
                    progress.report(step.as_str(), state.progress(), &message);
                }
                Err(e) => {
                    warn!("{} failed: {}", role, e);
                    state.fail(role, e.to_string());
                    progress.report(
                        state.current_step().as_str(),
                        state.progress(),
                        &format!("{} failed: {}", role, e),
                    );
                }
            }
        }

        if state.error().is_none() {
            state.advance(1.0);
            progress.report("end", state.progress(), "Agentic synthesis complete");
        }
        (state, kit)
    }

    async fn ask(
        &self,
        stage: &'static str,
        prompt: String,
        system_prompt: &str,
        temperature: f32,
    ) -> Result<String, AgentError> {
        let request = LlmRequest::new(prompt)
            .with_system(system_prompt)
            .with_max_tokens(self.config.role_max_tokens)
            .with_temperature(temperature);

        timeout(self.config.call_timeout(), self.llm.generate(&request))
            .await
            .map_err(|_| AgentError::Timeout(stage))?
            .map_err(|e| AgentError::Llm(e.to_string()))
    }

    /// Search around the focus area, estimate novelty and summarize
    async fn research(
        &self,
        state: &mut AgenticState,
        kit: &mut ToolKit<S>,
        request: &SynthesisRequest,
    ) -> Result<String, AgentError> {
        let titles: Vec<&str> = request
            .documents
            .iter()
            .map(|d| d.title.trim())
            .filter(|t| !t.is_empty())
            .collect();
        let focus = request.focus().unwrap_or("general research");

        let mut papers: Vec<PaperSummary> = Vec::new();
        for query in research_queries(request.focus(), &titles, self.config.research_queries) {
            match kit
                .search_literature(AgentRole::Research, &query, self.config.search_limit)
                .await
            {
                Ok(found) => papers.extend(found),
                Err(e) => {
                    warn!("Literature search '{}' failed: {}", query, e);
                    state
                        .degradations
                        .push(format!("literature search '{}' failed: {}", query, e));
                }
            }
        }

        let mut subject = vec![focus];
        subject.extend(titles.iter().copied());
        let novelty = kit
            .check_novelty(AgentRole::Research, &subject.join(" + "))
            .await;
        if let Some(error) = &novelty.error {
            state
                .degradations
                .push(format!("novelty check failed: {}", error));
        }
        state.novelty_hint = Some(novelty.novelty_score);

        let findings = self
            .ask(
                "research",
                research_prompt(focus, &titles, &papers),
                RESEARCH_SYSTEM_PROMPT,
                self.config.research_temperature,
            )
            .await?;

        state.tool_results.insert(
            "research".to_string(),
            json!({
                "completed": true,
                "tool_calls": kit.invocations().len(),
                "papers_found": papers.len(),
                "novelty_score": novelty.novelty_score,
                "findings": findings,
            }),
        );

        Ok(format!(
            "Research Agent completed. Found {} relevant sources.",
            papers.len()
        ))
    }

    /// Extract concepts and claims from the documents
    async fn analyze(
        &self,
        state: &mut AgenticState,
        request: &SynthesisRequest,
    ) -> Result<String, AgentError> {
        if !request.documents.iter().any(|d| d.is_usable()) {
            return Err(AgentError::Analysis("no papers to analyze".to_string()));
        }

        let report = self
            .analyzer
            .extract_all(&request.documents, request.focus())
            .await;
        state.degradations.extend(report.degradation_notes());

        if report.documents_succeeded == 0 {
            return Err(AgentError::Analysis(format!(
                "no document could be analyzed ({} failures)",
                report.failures.len()
            )));
        }

        state.concepts = report.concepts;
        state.claims = report.claims;
        Ok(format!(
            "Analyzer extracted {} concepts and {} claims.",
            state.concepts.len(),
            state.claims.len()
        ))
    }

    /// Combine concepts into hypotheses in one call, then parse the reply
    async fn generate(
        &self,
        state: &mut AgenticState,
        kit: &mut ToolKit<S>,
        request: &SynthesisRequest,
    ) -> Result<String, AgentError> {
        if state.concepts.len() < 2 {
            return Ok(format!(
                "Generator skipped: {} concept(s) is not enough to combine.",
                state.concepts.len()
            ));
        }

        let names: Vec<&str> = state
            .concepts
            .iter()
            .take(self.config.max_generator_concepts)
            .map(|c| c.name.as_str())
            .collect();
        let reply = self
            .ask(
                "generator",
                generator_prompt(&names, request.focus().unwrap_or("general research")),
                GENERATOR_SYSTEM_PROMPT,
                self.config.generator_temperature,
            )
            .await?;

        let parse = parse_hypotheses(&reply);
        debug!(
            "Generator reply parsed with {} ({} hypotheses)",
            parse.strategy_label(),
            parse.hypotheses().len()
        );

        let mut tool_result = json!({
            "parse_strategy": parse.strategy_label(),
            "parse_confidence": parse.confidence(),
            "hypotheses": parse.hypotheses().len(),
        });
        if let HypothesisParse::Unparsed { raw } = &parse {
            tool_result["raw_excerpt"] = json!(truncate_chars(raw, 500));
            state
                .degradations
                .push("generator reply could not be parsed into hypotheses".to_string());
        }
        state
            .tool_results
            .insert("generator".to_string(), tool_result);

        let novelty = state.novelty_hint.unwrap_or(DEFAULT_SCORE);
        let hypotheses: Vec<Hypothesis> = parse
            .hypotheses()
            .iter()
            .enumerate()
            .map(|(index, parsed)| {
                let sources = mentioned_concepts(&parsed.statement, &names);
                build_hypothesis(index + 1, parsed, sources, novelty, kit)
            })
            .collect();

        let message = format!(
            "Generated {} hypotheses ({} parse).",
            hypotheses.len(),
            parse.strategy_label()
        );
        state.hypotheses = hypotheses;
        Ok(message)
    }

    /// Review every hypothesis with the tools, then ask for a critique
    async fn critique(
        &self,
        state: &mut AgenticState,
        kit: &mut ToolKit<S>,
    ) -> Result<String, AgentError> {
        if state.hypotheses.is_empty() {
            return Ok("Critic had no hypotheses to review.".to_string());
        }

        let mut reviews = Vec::with_capacity(state.hypotheses.len());
        let mut summaries = Vec::with_capacity(state.hypotheses.len());
        for hypothesis in &state.hypotheses {
            let novelty = kit.check_novelty(AgentRole::Critic, &hypothesis.title).await;
            let testability = kit.score_testability(
                AgentRole::Critic,
                &hypothesis.description,
                &hypothesis.methodology_hints,
            );
            let feasibility = kit.analyze_feasibility(
                AgentRole::Critic,
                &hypothesis.description,
                &hypothesis.methodology_hints,
            );
            let statistics = kit.validate_statistical_claim(
                AgentRole::Critic,
                &hypothesis.description,
                &hypothesis.rationale,
            );

            summaries.push(format!(
                "{}; {}; {}; {}",
                novelty.assessment,
                testability.assessment,
                feasibility.estimated_difficulty,
                statistics.assessment
            ));
            reviews.push((novelty, testability, feasibility, statistics));
        }

        let critique = self
            .ask(
                "critic",
                critic_prompt(&state.hypotheses, &summaries),
                CRITIC_SYSTEM_PROMPT,
                self.config.critic_temperature,
            )
            .await?;

        let mut review_log = Vec::with_capacity(reviews.len());
        for (hypothesis, (novelty, testability, feasibility, statistics)) in
            state.hypotheses.iter_mut().zip(reviews)
        {
            hypothesis.set_scores(HypothesisScores::new(
                testability.testability_score,
                novelty.novelty_score,
                hypothesis.scores().significance(),
            ));
            hypothesis.validation_feedback = Some(format!(
                "{}. {}. {}.",
                novelty.assessment, testability.assessment, feasibility.estimated_difficulty
            ));
            hypothesis.status = HypothesisStatus::Validated;
            review_log.push(json!({
                "hypothesis_id": hypothesis.id,
                "novelty": novelty,
                "testability": testability,
                "feasibility": feasibility,
                "statistics": statistics,
            }));
        }

        state
            .hypotheses
            .sort_by(|a, b| b.confidence().total_cmp(&a.confidence()));
        state.tool_results.insert(
            "critic".to_string(),
            json!({"critique": critique, "reviews": review_log}),
        );

        Ok(format!(
            "Critic validated all {} hypotheses.",
            state.hypotheses.len()
        ))
    }
}

#[async_trait]
impl<L, S> Orchestrator for AgenticOrchestrator<L, S>
where
    L: LlmProvider + 'static,
    S: LiteratureSearch + 'static,
{
    fn mode(&self) -> OrchestrationMode {
        OrchestrationMode::Agentic
    }

    async fn run(
        &self,
        request: &SynthesisRequest,
        progress: &dyn ProgressSink,
    ) -> Result<SynthesisOutput, PipelineError> {
        request.validate()?;
        info!(
            "Starting agentic synthesis over {} documents",
            request.documents.len()
        );

        let (state, kit) = self.run_to_end(request, progress).await;
        if let Some(error) = state.error() {
            return Err(PipelineError::Orchestration(error.to_string()));
        }
        Ok(state.into_output(kit.into_invocations()))
    }
}

/// Queries for the research role: the focus area, then document titles
fn research_queries(focus: Option<&str>, titles: &[&str], limit: usize) -> Vec<String> {
    let mut queries: Vec<String> = Vec::new();
    for candidate in focus.into_iter().chain(titles.iter().copied()) {
        if queries.len() >= limit {
            break;
        }
        let candidate = truncate_chars(candidate, 200).to_string();
        if !queries.contains(&candidate) {
            queries.push(candidate);
        }
    }
    queries
}

/// Concept names mentioned in a statement (at most two), falling back to
/// the first two concepts
fn mentioned_concepts(statement: &str, names: &[&str]) -> Vec<String> {
    let lowered = statement.to_lowercase();
    let mentioned: Vec<String> = names
        .iter()
        .filter(|name| lowered.contains(&name.to_lowercase()))
        .take(2)
        .map(|name| name.to_string())
        .collect();
    if mentioned.is_empty() {
        names.iter().take(2).map(|name| name.to_string()).collect()
    } else {
        mentioned
    }
}

fn build_hypothesis<S: LiteratureSearch>(
    number: usize,
    parsed: &ParsedHypothesis,
    source_concepts: Vec<String>,
    novelty: f64,
    kit: &mut ToolKit<S>,
) -> Hypothesis {
    let methodology_hints: Vec<String> = METHODOLOGY_HINTS.iter().map(|m| m.to_string()).collect();
    let testability =
        kit.score_testability(AgentRole::Generator, &parsed.statement, &methodology_hints);

    let mut hypothesis = Hypothesis::new(
        format!("hyp_{}", number),
        truncate_chars(&parsed.statement, 200),
        HypothesisScores::new(testability.testability_score, novelty, DEFAULT_SCORE),
    );
    hypothesis.description = truncate_chars(&parsed.statement, 500).to_string();
    hypothesis.rationale = parsed
        .rationale
        .as_deref()
        .map(|r| truncate_chars(r, 500).to_string())
        .unwrap_or_else(|| RATIONALE_FALLBACK.to_string());
    hypothesis.expected_outcome = parsed
        .expected_outcome
        .as_deref()
        .map(|o| truncate_chars(o, 300).to_string());
    hypothesis.source_concepts = source_concepts;
    hypothesis.methodology_hints = methodology_hints;
    hypothesis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::search::{paper, MockSearch};
    use cognito_domain::Document;
    use cognito_llm::MockProvider;
    use cognito_pipeline::NoProgress;
    use std::sync::Mutex;

    const EXTRACTION: &str = r#"{
        "concepts": [
            {"name": "Sleep spindles", "type": "phenomenon", "description": "Bursts of oscillatory activity", "importance": 0.8},
            {"name": "Memory consolidation", "type": "theory", "description": "Stabilization of memories", "importance": 0.9},
            {"name": "Polysomnography", "type": "method", "description": "Overnight sleep recording"}
        ],
        "claims": [
            {"text": "Spindle density predicts recall", "type": "finding", "confidence": 0.8}
        ]
    }"#;

    const GENERATED: &str = "\
HYPOTHESIS 1: Higher sleep spindles rate will increase memory consolidation scores
RATIONALE: Spindles gate hippocampal replay
EXPECTED OUTCOME: Spindle density correlates with next-day performance

HYPOTHESIS 2: Polysomnography can measure learning effects
RATIONALE: Recording is cheap
EXPECTED OUTCOME: Detectable changes";

    fn documents() -> Vec<Document> {
        vec![Document::new(
            "p1",
            "Spindles and Memory",
            "Sleep spindles support memory consolidation during NREM sleep.",
        )]
    }

    /// Rules added by `overrides` take precedence over the defaults
    fn provider_with(overrides: impl FnOnce(&MockProvider)) -> MockProvider {
        let llm = MockProvider::new("Critique: both hypotheses are plausible.");
        overrides(&llm);
        llm.add_response("Analyze this academic paper", EXTRACTION);
        llm.add_response("Generate Research Hypotheses", GENERATED);
        llm.add_response("Research Task", "The combination is largely unexplored.");
        llm
    }

    fn provider() -> MockProvider {
        provider_with(|_| {})
    }

    fn orchestrator(
        llm: MockProvider,
        search: MockSearch,
    ) -> AgenticOrchestrator<MockProvider, MockSearch> {
        AgenticOrchestrator::new(
            Arc::new(llm),
            Arc::new(search),
            AgentsConfig::default(),
            ExtractorConfig::default(),
        )
        .unwrap()
    }

    fn request() -> SynthesisRequest {
        SynthesisRequest::new(documents(), Some("sleep and memory".to_string()))
    }

    #[tokio::test]
    async fn test_roles_run_in_order_with_one_message_each() {
        let search = MockSearch::new(vec![paper("Spindles review", 5)]);
        let agents = orchestrator(provider(), search);
        let reports = Mutex::new(Vec::new());
        let sink = |step: &str, progress: f64, _: &str| {
            reports.lock().unwrap().push((step.to_string(), progress));
        };

        let output = agents.run(&request(), &sink).await.unwrap();

        let roles: Vec<_> = output.agent_messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                AgentRole::Research,
                AgentRole::Analyzer,
                AgentRole::Generator,
                AgentRole::Critic
            ]
        );
        let reports = reports.into_inner().unwrap();
        let steps: Vec<_> = reports.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(
            steps,
            vec![
                "research_complete",
                "analysis_complete",
                "hypotheses_generated",
                "validation_complete",
                "end"
            ]
        );
        let values: Vec<_> = reports.iter().map(|(_, p)| *p).collect();
        assert_eq!(values, vec![0.3, 0.5, 0.7, 0.9, 1.0]);
    }

    #[tokio::test]
    async fn test_critic_validates_and_orders_hypotheses() {
        let search = MockSearch::new(vec![paper("Spindles review", 5)]);
        let agents = orchestrator(provider(), search);

        let output = agents.run(&request(), &NoProgress).await.unwrap();

        assert_eq!(output.concepts.len(), 3);
        assert_eq!(output.hypotheses.len(), 2);
        assert!(output.citations.is_empty());
        for window in output.hypotheses.windows(2) {
            assert!(window[0].confidence() >= window[1].confidence());
        }
        for h in &output.hypotheses {
            assert_eq!(h.status, HypothesisStatus::Validated);
            assert!(h.validation_feedback.is_some());
            assert_eq!(h.scores().confidence(), h.confidence());
        }
        let first = output
            .hypotheses
            .iter()
            .find(|h| h.id == "hyp_1")
            .unwrap();
        assert_eq!(
            first.source_concepts,
            vec!["Sleep spindles", "Memory consolidation"]
        );
        assert_eq!(
            first.expected_outcome.as_deref(),
            Some("Spindle density correlates with next-day performance")
        );
        assert!(output.tool_results.contains_key("research"));
        assert_eq!(output.tool_results["generator"]["parse_strategy"], "markers");
        assert!(output
            .tool_calls
            .iter()
            .any(|c| c.role == AgentRole::Critic && c.tool == "analyze_research_feasibility"));
    }

    #[tokio::test]
    async fn test_unparseable_generation_yields_no_hypotheses() {
        let llm = provider_with(|llm| llm.add_response("Generate Research Hypotheses", ""));
        let agents = orchestrator(llm.clone(), MockSearch::default());

        let output = agents.run(&request(), &NoProgress).await.unwrap();

        assert!(output.hypotheses.is_empty());
        assert_eq!(output.agent_messages.len(), 4);
        assert!(output
            .degradations
            .iter()
            .any(|d| d.contains("could not be parsed")));
        assert_eq!(output.tool_results["generator"]["parse_strategy"], "unparsed");
        // the critic does not call the model when there is nothing to review
        assert_eq!(llm.calls_containing("Evaluate these"), 0);
    }

    #[tokio::test]
    async fn test_research_failure_ends_the_run() {
        let llm = provider_with(|llm| llm.add_error("Research Task"));
        let agents = orchestrator(llm.clone(), MockSearch::default());

        let (state, _) = agents.run_to_end(&request(), &NoProgress).await;
        assert!(state.error().is_some());
        assert_eq!(state.current_step(), AgentStep::Start);
        assert_eq!(state.transcript().len(), 1);
        assert_eq!(llm.calls_containing("Analyze this academic paper"), 0);

        let result = agents.run(&request(), &NoProgress).await;
        assert!(matches!(result, Err(PipelineError::Orchestration(_))));
    }

    #[tokio::test]
    async fn test_search_failure_is_a_degradation() {
        let search = MockSearch::default();
        search.add_failure("sleep and memory");
        let agents = orchestrator(provider(), search);

        let output = agents.run(&request(), &NoProgress).await.unwrap();
        assert!(output
            .degradations
            .iter()
            .any(|d| d.starts_with("literature search 'sleep and memory' failed")));
        assert_eq!(output.hypotheses.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_extraction_fails_analyzer() {
        let llm = provider_with(|llm| llm.add_error("Analyze this academic paper"));
        let agents = orchestrator(llm, MockSearch::default());

        let (state, _) = agents.run_to_end(&request(), &NoProgress).await;
        assert_eq!(state.current_step(), AgentStep::ResearchComplete);
        assert!(state.error().unwrap().contains("no document could be analyzed"));
        assert_eq!(state.transcript().len(), 2);
        assert_eq!(state.progress(), 0.3);
    }

    #[test]
    fn test_research_queries_prefer_focus_then_titles() {
        let queries = research_queries(Some("sleep"), &["A", "sleep", "B", "C"], 3);
        assert_eq!(queries, vec!["sleep", "A", "B"]);
        assert!(research_queries(None, &[], 3).is_empty());
    }

    #[test]
    fn test_mentioned_concepts_fallback() {
        let names = ["Alpha", "Beta", "Gamma"];
        assert_eq!(mentioned_concepts("gamma rises", &names), vec!["Gamma"]);
        assert_eq!(mentioned_concepts("nothing", &names), vec!["Alpha", "Beta"]);
    }
}
