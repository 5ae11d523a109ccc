//! Research tools available to agent roles
//!
//! - `search_literature`: external paper search
//! - `check_hypothesis_novelty`: citation-count heuristic over similar work
//! - `score_hypothesis_testability`, `analyze_research_feasibility` and
//!   `validate_statistical_claim`: keyword heuristics
//!
//! There is no code-execution tool.

pub mod assess;
pub mod search;
mod toolkit;

pub use assess::{
    FeasibilityAssessment, NoveltyAssessment, StatisticalAssessment, TestabilityAssessment,
};
pub use search::{MockSearch, SemanticScholarClient};
pub use toolkit::ToolKit;
