//! Keyword heuristics behind the critic's tools
//!
//! These are cheap, deterministic stand-ins for expert judgement. Each
//! returns a serializable assessment that is stored verbatim in the run's
//! tool results.

use cognito_domain::PaperSummary;
use serde::{Deserialize, Serialize};

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Literature-based novelty estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoveltyAssessment {
    /// Estimated novelty in [0, 1]
    pub novelty_score: f64,
    /// Number of similar papers found
    pub similar_papers_count: usize,
    /// Titles of the similar papers
    pub similar_titles: Vec<String>,
    /// Summary sentence
    pub assessment: String,
    /// Set when the search itself failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NoveltyAssessment {
    /// Score from the total citations of similar work
    ///
    /// More than 100 citations means well studied (0.3), more than 20 means
    /// some related work (0.6), anything else is relatively novel (0.9). No
    /// similar work at all scores 0.8.
    pub fn from_papers(papers: &[PaperSummary]) -> Self {
        if papers.is_empty() {
            return Self {
                novelty_score: 0.8,
                similar_papers_count: 0,
                similar_titles: Vec::new(),
                assessment: "No similar work found, potentially highly novel".to_string(),
                error: None,
            };
        }

        let total_citations: u64 = papers.iter().map(|p| p.citation_count).sum();
        let novelty_score = if total_citations > 100 {
            0.3
        } else if total_citations > 20 {
            0.6
        } else {
            0.9
        };
        let assessment = if novelty_score > 0.7 {
            "High novelty, limited existing work"
        } else if novelty_score > 0.4 {
            "Moderate novelty, some related research"
        } else {
            "Low novelty, well-studied area"
        };

        Self {
            novelty_score,
            similar_papers_count: papers.len(),
            similar_titles: papers.iter().map(|p| p.title.clone()).collect(),
            assessment: assessment.to_string(),
            error: None,
        }
    }

    /// Neutral estimate used when the search failed
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            novelty_score: 0.5,
            similar_papers_count: 0,
            similar_titles: Vec::new(),
            assessment: "Novelty could not be checked".to_string(),
            error: Some(error.into()),
        }
    }
}

/// How testable a hypothesis statement reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestabilityAssessment {
    /// Score in [0, 1]
    pub testability_score: f64,
    /// One line per criterion
    pub feedback: Vec<String>,
    /// Score above 0.6
    pub is_testable: bool,
    /// Summary sentence
    pub assessment: String,
}

const MEASURABLE_TERMS: &[&str] = &[
    "measure", "quantify", "count", "rate", "level", "amount", "frequency", "correlation",
];
const PREDICTION_TERMS: &[&str] = &[
    "increase", "decrease", "higher", "lower", "more", "less", "affect", "influence",
];
const ABSOLUTE_TERMS: &[&str] = &["always", "never", "all", "none", "every"];

/// Score testability from measurable terms, predictions, absolutes and methods
pub fn score_testability(hypothesis: &str, methodology: &[String]) -> TestabilityAssessment {
    let text = hypothesis.to_lowercase();
    let mut score: f64 = 0.5;
    let mut feedback = Vec::new();

    if contains_any(&text, MEASURABLE_TERMS) {
        score += 0.2;
        feedback.push("Contains measurable variables".to_string());
    } else {
        feedback.push("Lacks clearly measurable variables".to_string());
    }

    if contains_any(&text, PREDICTION_TERMS) {
        score += 0.15;
        feedback.push("Makes specific predictions".to_string());
    } else {
        feedback.push("Predictions are vague".to_string());
    }

    if contains_any(&text, ABSOLUTE_TERMS) {
        score -= 0.1;
        feedback.push("Overly absolute, may not be falsifiable".to_string());
    } else {
        score += 0.1;
        feedback.push("Allows for falsification".to_string());
    }

    if !methodology.is_empty() {
        score += 0.15;
        feedback.push(format!("{} methodologies suggested", methodology.len()));
    }

    let score = score.clamp(0.0, 1.0);
    let assessment = if score > 0.75 {
        "Highly testable hypothesis"
    } else if score > 0.5 {
        "Moderately testable"
    } else {
        "Difficult to test, needs refinement"
    };

    TestabilityAssessment {
        testability_score: score,
        feedback,
        is_testable: score > 0.6,
        assessment: assessment.to_string(),
    }
}

/// Practical feasibility of studying a hypothesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityAssessment {
    /// Score in [0.1, 1]
    pub feasibility_score: f64,
    /// Identified obstacles
    pub challenges: Vec<String>,
    /// Score above 0.5
    pub is_feasible: bool,
    /// Difficulty label
    pub estimated_difficulty: String,
}

/// Estimate feasibility from equipment, duration, resources and ethics cues
pub fn analyze_feasibility(hypothesis: &str, required_resources: &[String]) -> FeasibilityAssessment {
    let text = hypothesis.to_lowercase();
    let mut feasibility: f64 = 0.7;
    let mut challenges = Vec::new();

    if contains_any(&text, &["neural", "brain", "quantum", "molecular"]) {
        feasibility -= 0.2;
        challenges.push("Requires specialized equipment or expertise".to_string());
    }
    if contains_any(&text, &["longitudinal", "long-term", "decades"]) {
        feasibility -= 0.15;
        challenges.push("Long-term study may be challenging".to_string());
    }
    if required_resources.len() > 5 {
        feasibility -= 0.1;
        challenges.push("Multiple resources required".to_string());
    } else if !required_resources.is_empty() && required_resources.len() <= 2 {
        feasibility += 0.1;
    }
    if contains_any(&text, &["human", "patient", "participant", "clinical"]) {
        feasibility -= 0.05;
        challenges.push("Requires ethical review and oversight".to_string());
    }

    let feasibility = feasibility.clamp(0.1, 1.0);
    if challenges.is_empty() {
        challenges.push("No major challenges identified".to_string());
    }
    let estimated_difficulty = if feasibility > 0.75 {
        "Low difficulty"
    } else if feasibility > 0.5 {
        "Moderate difficulty"
    } else {
        "High difficulty"
    };

    FeasibilityAssessment {
        feasibility_score: feasibility,
        challenges,
        is_feasible: feasibility > 0.5,
        estimated_difficulty: estimated_difficulty.to_string(),
    }
}

/// Sanity check of a statistical or empirical assertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalAssessment {
    /// Confidence in [0.1, 1]
    pub confidence: f64,
    /// Confidence above 0.5
    pub valid: bool,
    /// Detected issues
    pub warnings: Vec<String>,
    /// Summary sentence
    pub assessment: String,
}

/// Flag common statistical reasoning problems in a claim
pub fn validate_statistical_claim(claim: &str, data_description: &str) -> StatisticalAssessment {
    let text = claim.to_lowercase();
    let data = data_description.to_lowercase();
    let mut confidence: f64 = 0.5;
    let mut warnings = Vec::new();

    if text.contains("correlation") && text.contains("causation") {
        warnings.push("Correlation does not imply causation".to_string());
        confidence -= 0.2;
    }
    if text.contains("significant") && !contains_any(&text, &["p<", "p =", "p-value"]) {
        warnings.push("Significance claim without p-value".to_string());
        confidence -= 0.1;
    }
    if contains_any(&text, &["proves", "confirms", "definitely"]) {
        warnings.push("Overly strong language".to_string());
        confidence -= 0.15;
    }
    if data.contains("sample size") {
        confidence += 0.2;
    }
    if contains_any(&data, &["randomized", "controlled", "blind"]) {
        confidence += 0.2;
    }

    let confidence = confidence.clamp(0.1, 1.0);
    let assessment = if confidence > 0.6 {
        "Valid claim with minor concerns"
    } else if confidence > 0.3 {
        "Questionable claim, needs clarification"
    } else {
        "Invalid or unsupported claim"
    };

    StatisticalAssessment {
        confidence,
        valid: confidence > 0.5,
        warnings,
        assessment: assessment.to_string(),
    }
}
