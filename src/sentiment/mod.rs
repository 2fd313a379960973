//! Sentiment polarity for the rating mismatch rules

pub mod lexicon;

pub use lexicon::LexiconAnalyzer;

/// Computes a polarity score in [-1.0, 1.0] for a text (positive = favorable)
pub trait SentimentAnalyzer: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

impl<F> SentimentAnalyzer for F
where
    F: Fn(&str) -> f64 + Send + Sync,
{
    fn polarity(&self, text: &str) -> f64 {
        self(text)
    }
}
