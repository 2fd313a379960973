//! Lexicon-based polarity analyzer.
//!
//! Each known word carries a polarity. Intensifiers scale the next sentiment
//! word, negators flip and halve it, exclamation marks add emphasis. The text
//! polarity is the mean over sentiment words, clamped to [-1, 1].

use super::SentimentAnalyzer;
use regex::Regex;
use std::collections::HashMap;

/// Tokens after a negator that it still applies to
const NEGATION_SCOPE: usize = 3;
/// Multiplier applied to a negated word
const NEGATION_FACTOR: f64 = -0.5;
/// Extra emphasis per exclamation mark (at most 3 counted)
const EXCLAMATION_BOOST: f64 = 0.1;

const LEXICON: &[(&str, f64)] = &[
    // positive
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("brilliant", 0.9),
    ("comfortable", 0.4),
    ("delighted", 0.7),
    ("durable", 0.4),
    ("easy", 0.43),
    ("excellent", 1.0),
    ("fantastic", 0.4),
    ("fast", 0.2),
    ("fine", 0.42),
    ("flawless", 0.9),
    ("fun", 0.3),
    ("glad", 0.5),
    ("good", 0.7),
    ("great", 0.8),
    ("happy", 0.8),
    ("helpful", 0.5),
    ("impressive", 1.0),
    ("incredible", 0.9),
    ("love", 0.6),
    ("loved", 0.7),
    ("lovely", 0.5),
    ("nice", 0.6),
    ("outstanding", 0.5),
    ("perfect", 1.0),
    ("pleased", 0.5),
    ("recommend", 0.3),
    ("recommended", 0.3),
    ("reliable", 0.5),
    ("satisfied", 0.5),
    ("solid", 0.3),
    ("sturdy", 0.3),
    ("superb", 1.0),
    ("wonderful", 1.0),
    ("worth", 0.3),
    // negative
    ("annoying", -0.8),
    ("awful", -1.0),
    ("bad", -0.7),
    ("boring", -1.0),
    ("broke", -0.4),
    ("broken", -0.4),
    ("cheap", -0.2),
    ("defective", -0.6),
    ("difficult", -0.5),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("dreadful", -1.0),
    ("flimsy", -0.5),
    ("garbage", -0.8),
    ("hate", -0.8),
    ("hated", -0.9),
    ("horrible", -1.0),
    ("junk", -0.7),
    ("mediocre", -0.3),
    ("poor", -0.4),
    ("refund", -0.3),
    ("ridiculous", -0.33),
    ("sad", -0.5),
    ("slow", -0.3),
    ("terrible", -1.0),
    ("ugly", -0.7),
    ("unhappy", -0.6),
    ("unreliable", -0.5),
    ("useless", -0.5),
    ("waste", -0.6),
    ("worse", -0.4),
    ("worst", -1.0),
    ("wrong", -0.5),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("absolutely", 1.4),
    ("barely", 0.5),
    ("extremely", 1.5),
    ("highly", 1.3),
    ("incredibly", 1.4),
    ("pretty", 1.1),
    ("quite", 1.1),
    ("really", 1.3),
    ("slightly", 0.6),
    ("so", 1.2),
    ("somewhat", 0.7),
    ("super", 1.3),
    ("too", 1.2),
    ("totally", 1.3),
    ("very", 1.3),
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "hardly", "without", "cannot",
];

/// Built-in lexicon sentiment analyzer
pub struct LexiconAnalyzer {
    lexicon: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
    token_re: Regex,
}

impl LexiconAnalyzer {
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
            token_re: Regex::new(r"[a-z]+(?:'[a-z]+)?|!").expect("valid token regex"),
        }
    }

    fn is_negator(token: &str) -> bool {
        NEGATORS.contains(&token) || token.ends_with("n't")
    }
}

impl Default for LexiconAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentAnalyzer for LexiconAnalyzer {
    fn polarity(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase().replace('\u{2019}', "'");

        let mut scores: Vec<f64> = Vec::new();
        let mut intensity = 1.0;
        let mut negation = 0usize;
        let mut exclamations = 0usize;

        for m in self.token_re.find_iter(&lowered) {
            let token = m.as_str();
            if token == "!" {
                exclamations += 1;
                continue;
            }
            if Self::is_negator(token) {
                negation = NEGATION_SCOPE;
                continue;
            }
            if let Some(factor) = self.intensifiers.get(token) {
                intensity *= factor;
                continue;
            }
            if let Some(&polarity) = self.lexicon.get(token) {
                let mut score = polarity * intensity;
                if negation > 0 {
                    score *= NEGATION_FACTOR;
                }
                scores.push(score.clamp(-1.0, 1.0));
                intensity = 1.0;
                negation = 0;
                continue;
            }
            intensity = 1.0;
            negation = negation.saturating_sub(1);
        }

        if scores.is_empty() {
            return 0.0;
        }
        let mut mean = scores.iter().sum::<f64>() / scores.len() as f64;
        if exclamations > 0 {
            mean *= 1.0 + EXCLAMATION_BOOST * exclamations.min(3) as f64;
        }
        mean.clamp(-1.0, 1.0)
    }
}
