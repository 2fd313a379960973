//! Scoring policy: every threshold the rules and the score formula use

use crate::Label;

/// Thresholds for the heuristic rules, the score formula and the label bands.
///
/// Config files override individual fields through
/// [`ScoringOverrides`](crate::config::ScoringOverrides); everything else
/// keeps the defaults below.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringPolicy {
    /// A word repeated more than this many times is flagged
    pub max_word_repeats: usize,
    /// Reviews shorter than this (in characters) are flagged
    pub min_length: usize,
    /// Reviews longer than this (in characters) are flagged
    pub max_length: usize,
    /// Minimum number of distinct superlatives to flag
    pub min_superlatives: usize,
    /// More spam emoji than this are flagged
    pub max_emoji: usize,
    /// Ratings at or below this count as low
    pub low_rating_max: u8,
    /// Ratings at or above this count as high
    pub high_rating_min: u8,
    /// Polarity above this is positive tone
    pub positive_polarity: f64,
    /// Polarity below this is negative tone
    pub negative_polarity: f64,
    /// Points deducted per triggered rule
    pub penalty_per_flag: u32,
    /// Flag count labelled Suspicious
    pub suspicious_flags: usize,
    /// Flag count at or above which a review is labelled Fake
    pub fake_flags: usize,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            max_word_repeats: 3,
            min_length: 20,
            max_length: 300,
            min_superlatives: 2,
            max_emoji: 3,
            low_rating_max: 2,
            high_rating_min: 4,
            positive_polarity: 0.5,
            negative_polarity: -0.3,
            penalty_per_flag: 20,
            suspicious_flags: 2,
            fake_flags: 3,
        }
    }
}

impl ScoringPolicy {
    /// Points deducted for `flag_count` flags, before clamping
    pub fn penalty_for(&self, flag_count: usize) -> u32 {
        (flag_count as u32).saturating_mul(self.penalty_per_flag)
    }

    /// Genuineness score: 100 minus the penalty, floored at 0
    pub fn score_for(&self, flag_count: usize) -> u8 {
        100u32.saturating_sub(self.penalty_for(flag_count)) as u8
    }

    /// Label for a flag count
    pub fn label_for(&self, flag_count: usize) -> Label {
        if flag_count >= self.fake_flags {
            Label::Fake
        } else if flag_count >= self.suspicious_flags {
            Label::Suspicious
        } else {
            Label::Genuine
        }
    }
}
