//! Review scorer - runs every enabled rule over one review

use crate::config::Config;
use crate::sentiment::{LexiconAnalyzer, SentimentAnalyzer};
use crate::{Rating, Review, RuleId, ScoringResult};
use std::collections::HashSet;
use std::sync::Arc;

use super::rules::{default_rules, ReviewContext, ReviewRule};
use super::ScoringPolicy;

/// Scores reviews against the heuristic rules.
///
/// Holds no per-review state: `score` is a pure function of its inputs and
/// the scorer can be shared across threads.
pub struct ReviewScorer {
    policy: ScoringPolicy,
    rules: Vec<Box<dyn ReviewRule>>,
    disabled: HashSet<RuleId>,
    sentiment: Arc<dyn SentimentAnalyzer>,
}

impl ReviewScorer {
    /// Create a scorer with the default policy, all rules enabled and the lexicon analyzer
    pub fn new() -> Self {
        Self {
            policy: ScoringPolicy::default(),
            rules: default_rules(),
            disabled: HashSet::new(),
            sentiment: Arc::new(LexiconAnalyzer::new()),
        }
    }

    /// Build a scorer from config: scoring policy plus rule toggles
    pub fn from_config(config: &Config) -> Self {
        let mut scorer = Self::new().with_policy(config.policy());
        for rule in config.disabled_rules() {
            scorer = scorer.disable(rule);
        }
        scorer
    }

    pub fn with_policy(mut self, policy: ScoringPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the sentiment analyzer (e.g. with a test double)
    pub fn with_sentiment(mut self, analyzer: Arc<dyn SentimentAnalyzer>) -> Self {
        self.sentiment = analyzer;
        self
    }

    /// Switch a rule off
    pub fn disable(mut self, rule: RuleId) -> Self {
        self.disabled.insert(rule);
        self
    }

    pub fn is_enabled(&self, rule: RuleId) -> bool {
        !self.disabled.contains(&rule)
    }

    /// Score a review text with an optional star rating
    pub fn score(&self, text: &str, rating: Option<Rating>) -> ScoringResult {
        // Polarity is only needed by the rating rules
        let needs_polarity = rating.is_some()
            && RuleId::ALL
                .iter()
                .any(|r| r.needs_rating() && self.is_enabled(*r));
        let polarity = needs_polarity.then(|| self.sentiment.polarity(text).clamp(-1.0, 1.0));

        let review = ReviewContext::new(text, rating, polarity);

        let mut reasons = Vec::new();
        let mut flags = Vec::new();
        for rule in &self.rules {
            let id = rule.id();
            if !self.is_enabled(id) {
                continue;
            }
            if let Some(reason) = rule.check(&review, &self.policy) {
                tracing::debug!(rule = %id, %reason, "rule triggered");
                flags.push(id);
                reasons.push(reason);
            }
        }

        let flag_count = flags.len();
        ScoringResult {
            score: self.policy.score_for(flag_count),
            flag_count,
            reasons,
            flags,
            label: self.policy.label_for(flag_count),
            penalty: self.policy.penalty_for(flag_count),
        }
    }

    pub fn score_review(&self, review: &Review) -> ScoringResult {
        self.score(&review.text, review.rating)
    }
}

impl Default for ReviewScorer {
    fn default() -> Self {
        Self::new()
    }
}
