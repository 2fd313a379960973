//! Shouting: all-caps text or an emoji overload.

use super::{ReviewContext, ReviewRule};
use crate::scorer::ScoringPolicy;
use crate::RuleId;

/// Emoji counted towards the overload check (😂 🔥 💯)
pub const SPAM_EMOJI: [char; 3] = ['\u{1F602}', '\u{1F525}', '\u{1F4AF}'];

const REASON: &str = "All caps or emoji overload";

/// Rule for detecting all-caps reviews and emoji spam
#[derive(Debug, Default, Clone, Copy)]
pub struct ShoutingRule;

impl ShoutingRule {
    /// Text has cased letters and none of them are lowercase
    pub fn is_all_caps(text: &str) -> bool {
        text.to_uppercase() == text && text.to_lowercase() != text
    }

    /// Number of spam emoji code points in the text
    pub fn emoji_count(text: &str) -> usize {
        text.chars().filter(|c| SPAM_EMOJI.contains(c)).count()
    }
}

impl ReviewRule for ShoutingRule {
    fn id(&self) -> RuleId {
        RuleId::Shouting
    }

    fn check(&self, review: &ReviewContext<'_>, policy: &ScoringPolicy) -> Option<String> {
        if Self::is_all_caps(review.text) || Self::emoji_count(review.text) > policy.max_emoji {
            Some(REASON.to_string())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(text: &str) -> Option<String> {
        ShoutingRule.check(&ReviewContext::new(text, None, None), &ScoringPolicy::default())
    }

    #[test]
    fn all_caps_triggers() {
        assert_eq!(check("THIS IS GREAT").as_deref(), Some(REASON));
        assert!(check("BEST BUY EVER!!! 5/5").is_some());
    }

    #[test]
    fn mixed_case_does_not_trigger() {
        assert!(check("This Is Great").is_none());
    }

    #[test]
    fn no_letters_is_not_all_caps() {
        assert!(check("12345 !!!").is_none());
        assert!(check("").is_none());
    }

    #[test]
    fn emoji_overload_triggers() {
        assert!(check("so good 🔥🔥🔥🔥🔥").is_some());
        assert!(check("lol 😂🔥💯😂").is_some());
    }

    #[test]
    fn three_emoji_are_fine() {
        assert!(check("so good 🔥🔥🔥").is_none());
        // other emoji don't count
        assert!(check("so good 😀😀😀😀😀").is_none());
    }

    #[test]
    fn emoji_counted_per_code_point() {
        assert_eq!(ShoutingRule::emoji_count("🔥💯"), 2);
        assert_eq!(ShoutingRule::emoji_count("fire"), 0);
    }
}
