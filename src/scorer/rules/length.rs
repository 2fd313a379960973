//! Length: reviews that are suspiciously short or long.

use super::{ReviewContext, ReviewRule};
use crate::scorer::ScoringPolicy;
use crate::RuleId;

/// Rule for detecting reviews outside `min_length..=max_length` characters
#[derive(Debug, Default, Clone, Copy)]
pub struct LengthRule;

impl ReviewRule for LengthRule {
    fn id(&self) -> RuleId {
        RuleId::Length
    }

    fn check(&self, review: &ReviewContext<'_>, policy: &ScoringPolicy) -> Option<String> {
        // Characters, not bytes: emoji and accents count once
        let len = review.text.chars().count();
        if len < policy.min_length || len > policy.max_length {
            Some(format!("Suspicious length: {} characters", len))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(text: &str) -> Option<String> {
        LengthRule.check(&ReviewContext::new(text, None, None), &ScoringPolicy::default())
    }

    #[test]
    fn boundaries() {
        assert!(check(&"a".repeat(19)).is_some());
        assert!(check(&"a".repeat(20)).is_none());
        assert!(check(&"a".repeat(300)).is_none());
        assert!(check(&"a".repeat(301)).is_some());
    }

    #[test]
    fn reason_has_character_count() {
        assert_eq!(
            check("too short").as_deref(),
            Some("Suspicious length: 9 characters")
        );
        assert_eq!(
            check("").as_deref(),
            Some("Suspicious length: 0 characters")
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 20 characters, 80 bytes
        let text = "🔥".repeat(20);
        assert!(check(&text).is_none());
    }

    #[test]
    fn whitespace_is_not_trimmed() {
        let padded = format!("{:<25}", "short");
        assert!(check(&padded).is_none());
    }
}
