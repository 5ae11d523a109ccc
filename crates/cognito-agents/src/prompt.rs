//! Role prompts

use cognito_domain::{Hypothesis, PaperSummary};

pub(crate) const RESEARCH_SYSTEM_PROMPT: &str =
    "You are a research scout who maps existing literature and spots unexplored directions.";

pub(crate) const GENERATOR_SYSTEM_PROMPT: &str =
    "You are a creative scientist who combines concepts in unexpected but testable ways.";

pub(crate) const CRITIC_SYSTEM_PROMPT: &str =
    "You are a demanding peer reviewer who evaluates research hypotheses.";

pub(crate) fn research_prompt(focus: &str, titles: &[&str], papers: &[PaperSummary]) -> String {
    let related = if papers.is_empty() {
        "(no related papers found)".to_string()
    } else {
        papers
            .iter()
            .map(|p| {
                let year = p.year.map(|y| y.to_string()).unwrap_or_else(|| "n.d.".to_string());
                format!("- {} ({}, {} citations)", p.title, year, p.citation_count)
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "Research Task:\nFocus Area: {}\nSource Papers: {}\n\n\
         Related literature:\n{}\n\n\
         1. Summarize what the related literature already covers\n\
         2. Judge whether combining the source papers' ideas is novel\n\
         3. Identify what has NOT been studied yet",
        focus,
        titles.join("; "),
        related
    )
}

pub(crate) fn generator_prompt(concepts: &[&str], focus: &str) -> String {
    format!(
        "Generate Research Hypotheses based on these concepts:\n\n\
         Concepts: {}\nFocus Area: {}\n\n\
         Generate 3-5 novel, testable research hypotheses. For each hypothesis, provide:\n\n\
         1. Hypothesis Statement: a clear, testable claim\n\
         2. Rationale: why this hypothesis is interesting and novel\n\
         3. Expected Outcome: what would validate this hypothesis\n\n\
         Format each hypothesis as:\n\
         HYPOTHESIS X: [Your hypothesis statement]\n\
         RATIONALE: [Why this is novel and interesting]\n\
         EXPECTED OUTCOME: [What would prove/disprove this]",
        concepts.join(", "),
        focus
    )
}

pub(crate) fn critic_prompt(hypotheses: &[Hypothesis], tool_summaries: &[String]) -> String {
    let listed = hypotheses
        .iter()
        .zip(tool_summaries)
        .map(|(h, tools)| format!("[{}] {}\n{}\nTool findings: {}", h.id, h.title, h.description, tools))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Evaluate these {} hypotheses:\n\n{}\n\n\
         For each: comment on novelty, testability and feasibility, and give \
         a final verdict with brief feedback.",
        hypotheses.len(),
        listed
    )
}
