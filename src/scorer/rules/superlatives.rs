//! Superlatives: exaggerated praise or criticism.

use super::{ReviewContext, ReviewRule};
use crate::scorer::ScoringPolicy;
use crate::RuleId;

/// Superlative terms, in reporting order
pub const SUPERLATIVES: [&str; 7] = [
    "amazing",
    "incredible",
    "unbelievable",
    "best",
    "worst",
    "always",
    "never",
];

/// Rule for detecting reviews that stack superlatives.
///
/// Matching is by substring, so "best" also matches "bestseller".
#[derive(Debug, Default, Clone, Copy)]
pub struct SuperlativesRule;

impl SuperlativesRule {
    pub fn matches(lowered: &str) -> Vec<&'static str> {
        SUPERLATIVES
            .iter()
            .copied()
            .filter(|term| lowered.contains(term))
            .collect()
    }
}

impl ReviewRule for SuperlativesRule {
    fn id(&self) -> RuleId {
        RuleId::Superlatives
    }

    fn check(&self, review: &ReviewContext<'_>, policy: &ScoringPolicy) -> Option<String> {
        let used = Self::matches(&review.lowered);
        if used.len() >= policy.min_superlatives {
            Some(format!("Superlatives: {}", used.join(", ")))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(text: &str) -> Option<String> {
        SuperlativesRule.check(&ReviewContext::new(text, None, None), &ScoringPolicy::default())
    }

    #[test]
    fn one_superlative_is_fine() {
        assert_eq!(check("An amazing blender for the price"), None);
        assert_eq!(check("The best blender for the price"), None);
    }

    #[test]
    fn two_superlatives_trigger_in_set_order() {
        assert_eq!(
            check("The best blender, simply amazing").as_deref(),
            Some("Superlatives: amazing, best")
        );
    }

    #[test]
    fn case_insensitive() {
        assert!(check("INCREDIBLE, I will ALWAYS buy this").is_some());
    }

    #[test]
    fn substring_matches_count() {
        // "bestial" contains "best", "nevertheless" contains "never"
        assert_eq!(
            check("A bestial motor, nevertheless quiet").as_deref(),
            Some("Superlatives: best, never")
        );
    }

    #[test]
    fn repeated_term_counts_once() {
        assert_eq!(check("best best best purchase ever"), None);
    }
}
