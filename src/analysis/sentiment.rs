//! Keyword-based sentiment classification.
//!
//! A review is classified by scanning its lower-cased text for fixed keyword
//! substrings. The positive list is checked before the negative list, so text
//! containing both classifies Positive. No tokenization or negation handling.

use serde::Serialize;

/// Sentiment bucket derived from review text. Never persisted; recomputed on
/// every view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Display order used by every chart: Positive, Neutral, Negative.
    pub const ORDER: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed pair of keyword lists. The two dashboard views ship slightly
/// different word sets; both are kept as named constants rather than unified,
/// so each view keeps classifying exactly as it always has.
#[derive(Debug, Clone, Copy)]
pub struct Lexicon {
    positive: &'static [&'static str],
    negative: &'static [&'static str],
}

/// Lexicon used by the balloon view.
pub const BALLOON: Lexicon = Lexicon {
    positive: &[
        "good", "great", "excellent", "love", "happy", "nice", "perfect", "clear", "easy",
    ],
    negative: &["bad", "terrible", "hate", "issue", "problem", "poor", "worst"],
};

/// Lexicon used by the detail view and the traceability export.
pub const DETAIL: Lexicon = Lexicon {
    positive: &["good", "great", "excellent", "love", "happy", "nice"],
    negative: &["bad", "terrible", "hate", "issue", "problem", "poor"],
};

impl Lexicon {
    /// Classify review text. Positive keywords win over negative ones.
    pub fn classify(&self, text: &str) -> Sentiment {
        let text = text.to_lowercase();
        if self.positive.iter().any(|word| text.contains(word)) {
            Sentiment::Positive
        } else if self.negative.iter().any(|word| text.contains(word)) {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}
