//! Hypothesis scoring and the confidence weighting

use serde::{Deserialize, Serialize};

/// Weight of testability in the confidence
pub const TESTABILITY_WEIGHT: f64 = 0.35;

/// Weight of novelty in the confidence
pub const NOVELTY_WEIGHT: f64 = 0.35;

/// Weight of significance in the confidence
pub const SIGNIFICANCE_WEIGHT: f64 = 0.30;

/// Score used when a model omits a value
pub const DEFAULT_SCORE: f64 = 0.5;

/// Clamp a model-provided score into [0, 1]; NaN becomes the default score
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        DEFAULT_SCORE
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// The three scores of a hypothesis, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HypothesisScores {
    testability: f64,
    novelty: f64,
    significance: f64,
}

impl HypothesisScores {
    /// Create scores, clamping each into [0, 1]
    pub fn new(testability: f64, novelty: f64, significance: f64) -> Self {
        Self {
            testability: clamp_unit(testability),
            novelty: clamp_unit(novelty),
            significance: clamp_unit(significance),
        }
    }

    /// Testability score
    pub fn testability(&self) -> f64 {
        self.testability
    }

    /// Novelty score
    pub fn novelty(&self) -> f64 {
        self.novelty
    }

    /// Significance score
    pub fn significance(&self) -> f64 {
        self.significance
    }

    /// Weighted confidence: `0.35*testability + 0.35*novelty + 0.30*significance`
    ///
    /// # Examples
    ///
    /// ```
    /// use cognito_domain::HypothesisScores;
    ///
    /// let scores = HypothesisScores::new(1.0, 0.0, 0.0);
    /// assert!((scores.confidence() - 0.35).abs() < 1e-12);
    /// ```
    pub fn confidence(&self) -> f64 {
        TESTABILITY_WEIGHT * self.testability
            + NOVELTY_WEIGHT * self.novelty
            + SIGNIFICANCE_WEIGHT * self.significance
    }

    /// Apply a partial adjustment, keeping the current value for omitted fields
    pub fn adjusted(&self, adjustment: &ScoreAdjustment) -> Self {
        Self::new(
            adjustment.testability.unwrap_or(self.testability),
            adjustment.novelty.unwrap_or(self.novelty),
            adjustment.significance.unwrap_or(self.significance),
        )
    }
}

impl Default for HypothesisScores {
    fn default() -> Self {
        Self::new(DEFAULT_SCORE, DEFAULT_SCORE, DEFAULT_SCORE)
    }
}

/// Partial score update proposed by a validator or critic
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreAdjustment {
    /// New testability, if provided
    pub testability: Option<f64>,
    /// New novelty, if provided
    pub novelty: Option<f64>,
    /// New significance, if provided
    pub significance: Option<f64>,
}

impl ScoreAdjustment {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.testability.is_none() && self.novelty.is_none() && self.significance.is_none()
    }
}
