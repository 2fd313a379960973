//! Repetition: the same word used over and over.

use super::{ReviewContext, ReviewRule};
use crate::scorer::ScoringPolicy;
use crate::RuleId;
use std::collections::HashMap;

/// Rule for detecting words repeated more than `max_word_repeats` times
#[derive(Debug, Default, Clone, Copy)]
pub struct RepetitionRule;

impl RepetitionRule {
    /// Words (lower-cased, whitespace separated) with more than `max` occurrences,
    /// in order of first appearance
    pub fn repeated_words(lowered: &str, max: usize) -> Vec<&str> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order = Vec::new();
        for word in lowered.split_whitespace() {
            let count = counts.entry(word).or_insert(0);
            if *count == 0 {
                order.push(word);
            }
            *count += 1;
        }
        order.into_iter().filter(|w| counts[w] > max).collect()
    }
}

impl ReviewRule for RepetitionRule {
    fn id(&self) -> RuleId {
        RuleId::Repetition
    }

    fn check(&self, review: &ReviewContext<'_>, policy: &ScoringPolicy) -> Option<String> {
        let repeated = Self::repeated_words(&review.lowered, policy.max_word_repeats);
        if repeated.is_empty() {
            return None;
        }
        Some(format!("Repeated words: {}", repeated.join(", ")))
    }
}
