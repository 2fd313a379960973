//! Heuristic rules for review scoring

pub mod length;
pub mod repetition;
pub mod sentiment_mismatch;
pub mod shouting;
pub mod superlatives;

pub use length::LengthRule;
pub use repetition::RepetitionRule;
pub use sentiment_mismatch::{NegativeToneHighRatingRule, PositiveToneLowRatingRule};
pub use shouting::{ShoutingRule, SPAM_EMOJI};
pub use superlatives::{SuperlativesRule, SUPERLATIVES};

use super::ScoringPolicy;
use crate::{Rating, RuleId};

/// What a rule gets to look at for one review
#[derive(Debug, Clone)]
pub struct ReviewContext<'a> {
    /// Review text as given (not trimmed)
    pub text: &'a str,
    /// Lower-cased text for word and phrase matching
    pub lowered: String,
    pub rating: Option<Rating>,
    /// Sentiment polarity in [-1, 1]; only computed when a rating is present
    pub polarity: Option<f64>,
}

impl<'a> ReviewContext<'a> {
    pub fn new(text: &'a str, rating: Option<Rating>, polarity: Option<f64>) -> Self {
        Self {
            text,
            lowered: text.to_lowercase(),
            rating,
            polarity,
        }
    }
}

/// Trait for review rules
pub trait ReviewRule: Send + Sync {
    /// Rule identifier
    fn id(&self) -> RuleId;

    /// Check one review. Returns the reason when the rule triggers.
    fn check(&self, review: &ReviewContext<'_>, policy: &ScoringPolicy) -> Option<String>;
}

/// All rules in evaluation order
pub fn default_rules() -> Vec<Box<dyn ReviewRule>> {
    vec![
        Box::new(RepetitionRule),
        Box::new(LengthRule),
        Box::new(SuperlativesRule),
        Box::new(ShoutingRule),
        Box::new(PositiveToneLowRatingRule),
        Box::new(NegativeToneHighRatingRule),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_follow_rule_id_order() {
        let ids: Vec<RuleId> = default_rules().iter().map(|r| r.id()).collect();
        assert_eq!(ids, RuleId::ALL.to_vec());
    }
}
