//! Revcheck: heuristic fake review detector
//!
//! This library scores product reviews with a fixed set of heuristic rules
//! (repetition, length, superlatives, shouting, sentiment/rating mismatch)
//! and derives a Genuine / Suspicious / Fake label from the number of flags.
//! Transcription, translation and ML prediction are optional collaborators
//! that feed text into the same scorer.

pub mod bulk;
pub mod classifier;
pub mod config;
pub mod logging;
pub mod reporter;
pub mod scorer;
pub mod sentiment;
pub mod transcribe;
pub mod translate;

pub use scorer::{score_review, ReviewScorer, ScoringPolicy};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Star rating attached to a review (1-5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, RatingError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingError::OutOfRange(value as i64))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl FromStr for Rating {
    type Err = RatingError;

    /// Accepts integers and integral floats ("4", " 4 ", "4.0"), which is how
    /// spreadsheet exports usually write star ratings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return u8::try_from(n)
                .map_err(|_| RatingError::OutOfRange(n))
                .and_then(Rating::new);
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.fract() == 0.0 && f.is_finite() => {
                let n = f as i64;
                u8::try_from(n)
                    .map_err(|_| RatingError::OutOfRange(n))
                    .and_then(Rating::new)
            }
            _ => Err(RatingError::Invalid(trimmed.to_string())),
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error for ratings outside 1-5 or not numeric
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatingError {
    #[error("rating must be between 1 and 5, got {0}")]
    OutOfRange(i64),
    #[error("invalid rating: {0:?}")]
    Invalid(String),
}

/// A review to be scored: body text plus optional star rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl Review {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rating: None,
        }
    }

    pub fn with_rating(mut self, rating: Rating) -> Self {
        self.rating = Some(rating);
        self
    }
}

/// Heuristic rules, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    /// A word occurs more often than allowed
    Repetition,
    /// Review is too short or too long
    Length,
    /// Two or more superlatives
    Superlatives,
    /// All caps or too many spam emoji
    Shouting,
    /// Positive wording with a low star rating
    PositiveToneLowRating,
    /// Negative wording with a high star rating
    NegativeToneHighRating,
}

impl RuleId {
    pub const ALL: [RuleId; 6] = [
        RuleId::Repetition,
        RuleId::Length,
        RuleId::Superlatives,
        RuleId::Shouting,
        RuleId::PositiveToneLowRating,
        RuleId::NegativeToneHighRating,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::Repetition => "repetition",
            RuleId::Length => "length",
            RuleId::Superlatives => "superlatives",
            RuleId::Shouting => "shouting",
            RuleId::PositiveToneLowRating => "positive-tone-low-rating",
            RuleId::NegativeToneHighRating => "negative-tone-high-rating",
        }
    }

    /// Whether the rule needs a star rating to be evaluated
    pub fn needs_rating(&self) -> bool {
        matches!(
            self,
            RuleId::PositiveToneLowRating | RuleId::NegativeToneHighRating
        )
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleId::ALL
            .iter()
            .find(|r| r.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown rule: {}", s))
    }
}

/// Classification derived from the flag count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    Genuine,
    Suspicious,
    Fake,
}

impl Label {
    /// Label with the default thresholds (3+ flags fake, 2 suspicious)
    pub fn from_flag_count(flag_count: usize) -> Self {
        ScoringPolicy::default().label_for(flag_count)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Genuine => write!(f, "Genuine"),
            Label::Suspicious => write!(f, "Suspicious"),
            Label::Fake => write!(f, "Fake"),
        }
    }
}

/// Outcome of scoring one review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResult {
    /// Genuineness score (0-100)
    pub score: u8,
    /// Number of triggered rules
    pub flag_count: usize,
    /// One reason per triggered rule, in evaluation order
    pub reasons: Vec<String>,
    /// Triggered rule ids, parallel to `reasons`
    pub flags: Vec<RuleId>,
    /// Derived classification
    pub label: Label,
    /// Points deducted before clamping at zero
    pub penalty: u32,
}

impl ScoringResult {
    pub fn breakdown(&self) -> CategoryBreakdown {
        CategoryBreakdown::from_reasons(&self.reasons)
    }
}

/// Four-category 0/1 breakdown of the reasons (Repetition, Length, Superlatives, Spam)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub repetition: bool,
    pub length: bool,
    pub superlatives: bool,
    pub spam: bool,
}

impl CategoryBreakdown {
    /// Match reason texts against the category keywords
    pub fn from_reasons(reasons: &[String]) -> Self {
        let any = |pred: &dyn Fn(&str) -> bool| reasons.iter().any(|r| pred(r));
        Self {
            repetition: any(&|r| r.contains("Repeated")),
            length: any(&|r| r.contains("length")),
            superlatives: any(&|r| r.contains("Superlatives")),
            spam: any(&|r| r.contains("caps") || r.contains("emoji")),
        }
    }

    pub fn entries(&self) -> [(&'static str, bool); 4] {
        [
            ("Repetition", self.repetition),
            ("Length", self.length),
            ("Superlatives", self.superlatives),
            ("Spam", self.spam),
        ]
    }

    pub fn any(&self) -> bool {
        self.entries().iter().any(|(_, hit)| *hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        assert!(Rating::new(0).is_err());
        assert_eq!(Rating::new(1).unwrap().value(), 1);
        assert_eq!(Rating::new(5).unwrap().value(), 5);
        assert_eq!(Rating::new(6), Err(RatingError::OutOfRange(6)));
    }

    #[test]
    fn rating_from_str_accepts_spreadsheet_values() {
        assert_eq!("4".parse::<Rating>().unwrap().value(), 4);
        assert_eq!(" 2 ".parse::<Rating>().unwrap().value(), 2);
        assert_eq!("5.0".parse::<Rating>().unwrap().value(), 5);
        assert!("4.5".parse::<Rating>().is_err());
        assert!("-1".parse::<Rating>().is_err());
        assert!("".parse::<Rating>().is_err());
        assert!("five".parse::<Rating>().is_err());
    }

    #[test]
    fn rating_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Rating>("3").is_ok());
        assert!(serde_json::from_str::<Rating>("9").is_err());
    }

    #[test]
    fn label_thresholds() {
        assert_eq!(Label::from_flag_count(0), Label::Genuine);
        assert_eq!(Label::from_flag_count(1), Label::Genuine);
        assert_eq!(Label::from_flag_count(2), Label::Suspicious);
        assert_eq!(Label::from_flag_count(3), Label::Fake);
        assert_eq!(Label::from_flag_count(7), Label::Fake);
    }

    #[test]
    fn rule_id_round_trips_through_str() {
        for rule in RuleId::ALL {
            assert_eq!(rule.as_str().parse::<RuleId>().unwrap(), rule);
        }
        assert!("shouty".parse::<RuleId>().is_err());
    }

    #[test]
    fn breakdown_matches_reason_keywords() {
        let reasons = vec![
            "Repeated words: good".to_string(),
            "All caps or emoji overload".to_string(),
        ];
        let b = CategoryBreakdown::from_reasons(&reasons);
        assert!(b.repetition);
        assert!(!b.length);
        assert!(!b.superlatives);
        assert!(b.spam);
        assert!(b.any());
        assert!(!CategoryBreakdown::from_reasons(&[]).any());
    }
}
