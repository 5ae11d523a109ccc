//! Concept pair selection
//!
//! All unordered pairs `(i, j)` with `i < j` are enumerated. A pair is kept
//! when its concepts come from different documents or different domains
//! (domains compared trimmed and case-insensitively). Score is the mean
//! importance, with a missing importance counting as 0.5. Kept pairs are
//! stable-sorted by score, highest first, so ties keep enumeration order.

use cognito_domain::Concept;

/// Two concepts considered for recombination
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConceptPair<'a> {
    /// Concept at the lower index
    pub first: &'a Concept,
    /// Concept at the higher index
    pub second: &'a Concept,
    /// Index of `first` in the input slice
    pub first_index: usize,
    /// Index of `second` in the input slice
    pub second_index: usize,
    /// Mean importance
    pub score: f64,
}

impl ConceptPair<'_> {
    /// Names of both concepts, in pair order
    pub fn names(&self) -> [String; 2] {
        [self.first.name.clone(), self.second.name.clone()]
    }
}

fn is_interesting(a: &Concept, b: &Concept) -> bool {
    a.source_paper_id != b.source_paper_id || a.normalized_domain() != b.normalized_domain()
}

/// Every retained pair, sorted by score descending
pub fn candidate_pairs(concepts: &[Concept]) -> Vec<ConceptPair<'_>> {
    if concepts.len() < 2 {
        return Vec::new();
    }

    let mut pairs = Vec::new();
    for (i, first) in concepts.iter().enumerate() {
        for (offset, second) in concepts[i + 1..].iter().enumerate() {
            if !is_interesting(first, second) {
                continue;
            }
            pairs.push(ConceptPair {
                first,
                second,
                first_index: i,
                second_index: i + 1 + offset,
                score: (first.importance_or_default() + second.importance_or_default()) / 2.0,
            });
        }
    }

    pairs.sort_by(|a, b| b.score.total_cmp(&a.score));
    pairs
}

/// The top `k` retained pairs
pub fn generate_pairs(concepts: &[Concept], k: usize) -> Vec<ConceptPair<'_>> {
    let mut pairs = candidate_pairs(concepts);
    pairs.truncate(k);
    pairs
}
