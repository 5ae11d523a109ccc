//! Prompts for gap identification and hypothesis generation

use crate::pairs::ConceptPair;
use cognito_domain::text::truncate_chars;
use cognito_domain::{Claim, Concept, ResearchGap};

pub(crate) const GAP_SYSTEM_PROMPT: &str =
    "You are a research strategist skilled at identifying gaps and opportunities in academic literature.";

pub(crate) const GENERATION_SYSTEM_PROMPT: &str =
    "You are a creative research hypothesis generator skilled at finding novel connections.";

fn focus_line(focus_area: Option<&str>) -> String {
    match focus_area.map(str::trim).filter(|f| !f.is_empty()) {
        Some(focus) => format!("Focus Area: {}\n\n", focus),
        None => String::new(),
    }
}

pub(crate) fn build_gap_prompt(
    concepts: &[Concept],
    claims: &[Claim],
    claim_chars: usize,
    focus_area: Option<&str>,
) -> String {
    let concepts_summary: Vec<String> = concepts
        .iter()
        .map(|c| format!("- {} ({}): {}", c.name, c.concept_type, c.description))
        .collect();
    let claims_summary: Vec<String> = claims
        .iter()
        .map(|c| format!("- {}", truncate_chars(&c.text, claim_chars)))
        .collect();

    format!(
        "Based on these concepts and claims from academic papers, identify research gaps.\n\n\
         CONCEPTS:\n{}\n\n\
         CLAIMS:\n{}\n\n\
         {}\
         Identify 3-5 research gaps: areas that need more investigation, unexplored connections, or contradictions.\n\n\
         {}",
        concepts_summary.join("\n"),
        claims_summary.join("\n"),
        focus_line(focus_area),
        GAP_OUTPUT_FORMAT
    )
}

const GAP_OUTPUT_FORMAT: &str = r#"Return a JSON array:
[
    {
        "id": "gap_1",
        "title": "Brief title for the gap",
        "description": "Detailed description of the research gap",
        "related_concepts": ["concept1", "concept2"],
        "importance_score": 0.0-1.0,
        "suggested_approaches": ["approach1", "approach2"]
    }
]

Return ONLY valid JSON array."#;

fn describe_concept(label: &str, concept: &Concept) -> String {
    let description = if concept.description.is_empty() {
        "N/A"
    } else {
        &concept.description
    };
    format!(
        "{}:\nName: {}\nType: {}\nDescription: {}\nFrom paper: {}\n",
        label, concept.name, concept.concept_type, description, concept.source_paper_title
    )
}

pub(crate) fn build_generation_prompt(
    pair: &ConceptPair<'_>,
    gaps: &[ResearchGap],
    focus_area: Option<&str>,
) -> String {
    let gaps_summary = if gaps.is_empty() {
        "(none identified)".to_string()
    } else {
        gaps.iter()
            .map(|g| format!("- {}: {}", g.title, g.description))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "Generate a novel, testable research hypothesis connecting these two concepts.\n\n\
         {}\n{}\n\
         IDENTIFIED RESEARCH GAPS:\n{}\n\n\
         {}\
         {}",
        describe_concept("CONCEPT 1", pair.first),
        describe_concept("CONCEPT 2", pair.second),
        gaps_summary,
        focus_line(focus_area),
        GENERATION_OUTPUT_FORMAT
    )
}

const GENERATION_OUTPUT_FORMAT: &str = r#"Generate a hypothesis that:
1. Connects these concepts in a novel way
2. Addresses one of the research gaps if possible
3. Is specific and testable
4. Would be meaningful if proven true

Return a JSON object:
{
    "title": "Clear, compelling hypothesis title (max 20 words)",
    "description": "Detailed hypothesis explanation (150-250 words)",
    "rationale": "Why this hypothesis is worth investigating",
    "methodology_hints": ["method1", "method2", "method3"],
    "expected_outcome": "What would be observed if it holds",
    "testability_score": 0.0-1.0,
    "novelty_score": 0.0-1.0,
    "significance_score": 0.0-1.0
}

Return ONLY valid JSON."#;
