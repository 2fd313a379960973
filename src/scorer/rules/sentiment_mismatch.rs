//! Sentiment/rating mismatch: wording and stars disagree.
//!
//! Two entries so each direction can be switched off on its own.

use super::{ReviewContext, ReviewRule};
use crate::scorer::ScoringPolicy;
use crate::RuleId;

/// Positive tone but a low star rating
#[derive(Debug, Default, Clone, Copy)]
pub struct PositiveToneLowRatingRule;

impl ReviewRule for PositiveToneLowRatingRule {
    fn id(&self) -> RuleId {
        RuleId::PositiveToneLowRating
    }

    fn check(&self, review: &ReviewContext<'_>, policy: &ScoringPolicy) -> Option<String> {
        let (rating, polarity) = (review.rating?, review.polarity?);
        if rating.value() <= policy.low_rating_max && polarity > policy.positive_polarity {
            Some("Positive tone but low rating".to_string())
        } else {
            None
        }
    }
}

/// Negative tone but a high star rating
#[derive(Debug, Default, Clone, Copy)]
pub struct NegativeToneHighRatingRule;

impl ReviewRule for NegativeToneHighRatingRule {
    fn id(&self) -> RuleId {
        RuleId::NegativeToneHighRating
    }

    fn check(&self, review: &ReviewContext<'_>, policy: &ScoringPolicy) -> Option<String> {
        let (rating, polarity) = (review.rating?, review.polarity?);
        if rating.value() >= policy.high_rating_min && polarity < policy.negative_polarity {
            Some("Negative tone but high rating".to_string())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rating;

    fn ctx(rating: Option<u8>, polarity: Option<f64>) -> ReviewContext<'static> {
        ReviewContext::new(
            "some review text here",
            rating.map(|r| Rating::new(r).unwrap()),
            polarity,
        )
    }

    #[test]
    fn positive_tone_low_rating() {
        let policy = ScoringPolicy::default();
        let rule = PositiveToneLowRatingRule;
        assert_eq!(
            rule.check(&ctx(Some(1), Some(0.8)), &policy).as_deref(),
            Some("Positive tone but low rating")
        );
        assert!(rule.check(&ctx(Some(2), Some(0.51)), &policy).is_some());
        assert!(rule.check(&ctx(Some(1), Some(0.2)), &policy).is_none());
        assert!(rule.check(&ctx(Some(1), Some(0.5)), &policy).is_none());
        assert!(rule.check(&ctx(Some(3), Some(0.9)), &policy).is_none());
    }

    #[test]
    fn negative_tone_high_rating() {
        let policy = ScoringPolicy::default();
        let rule = NegativeToneHighRatingRule;
        assert_eq!(
            rule.check(&ctx(Some(5), Some(-0.6)), &policy).as_deref(),
            Some("Negative tone but high rating")
        );
        assert!(rule.check(&ctx(Some(4), Some(-0.31)), &policy).is_some());
        assert!(rule.check(&ctx(Some(4), Some(-0.3)), &policy).is_none());
        assert!(rule.check(&ctx(Some(3), Some(-0.9)), &policy).is_none());
    }

    #[test]
    fn no_rating_never_triggers() {
        let policy = ScoringPolicy::default();
        assert!(PositiveToneLowRatingRule
            .check(&ctx(None, Some(1.0)), &policy)
            .is_none());
        assert!(NegativeToneHighRatingRule
            .check(&ctx(None, Some(-1.0)), &policy)
            .is_none());
    }
}
