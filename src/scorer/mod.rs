//! Heuristic review scorer - rule trait, rules, policy and engine

pub mod engine;
pub mod policy;
pub mod rules;

pub use engine::ReviewScorer;
pub use policy::ScoringPolicy;

use crate::{Rating, ScoringResult};

/// Score a review with the default policy and the built-in lexicon sentiment analyzer.
///
/// Builds a fresh scorer on every call; hold a [`ReviewScorer`] when scoring many reviews.
pub fn score_review(text: &str, rating: Option<Rating>) -> ScoringResult {
    ReviewScorer::new().score(text, rating)
}
