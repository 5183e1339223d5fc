//! Local sentiment scoring for headlines and news snippets.
//!
//! VADER's compound score is nudged by a small market lexicon, since its
//! general-purpose dictionary misses most price-action vocabulary.
//!
//! # Example
//! ```rust,ignore
//! use tradesignal::infrastructure::news::SentimentAnalyzer;
//!
//! let analyzer = SentimentAnalyzer::new();
//! let reading = analyzer.reading("Shares rally after record quarterly earnings");
//! assert_eq!(reading.label.to_string(), "Positive");
//! ```

use crate::domain::sentiment::SentimentReading;
use tracing::debug;
use vader_sentiment::SentimentIntensityAnalyzer;

/// Weight of the keyword boost relative to the VADER compound score.
const BOOST_WEIGHT: f64 = 0.5;

const BULLISH_KEYWORDS: &[(&str, f64)] = &[
    ("surge", 0.4),
    ("soar", 0.5),
    ("rally", 0.4),
    ("rallies", 0.4),
    ("bullish", 0.5),
    ("beats estimates", 0.4),
    ("beat estimates", 0.4),
    ("record high", 0.4),
    ("all-time high", 0.5),
    ("upgrade", 0.3),
    ("outperform", 0.3),
    ("buyback", 0.2),
    ("dividend increase", 0.3),
    ("raises guidance", 0.4),
    ("breakout", 0.3),
    ("partnership", 0.2),
];

const BEARISH_KEYWORDS: &[(&str, f64)] = &[
    ("crash", -0.5),
    ("plunge", -0.5),
    ("tumble", -0.4),
    ("slump", -0.4),
    ("bearish", -0.5),
    ("misses estimates", -0.4),
    ("missed estimates", -0.4),
    ("downgrade", -0.3),
    ("underperform", -0.3),
    ("cuts guidance", -0.4),
    ("lawsuit", -0.4),
    ("investigation", -0.3),
    ("fraud", -0.5),
    ("bankruptcy", -0.6),
    ("recall", -0.3),
    ("layoffs", -0.3),
    ("sell-off", -0.4),
    ("selloff", -0.4),
];

pub struct SentimentAnalyzer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }

    /// Sum of lexicon weights for every keyword contained in `text`.
    fn market_boost(&self, text: &str) -> f64 {
        let text_lower = text.to_lowercase();

        BULLISH_KEYWORDS
            .iter()
            .chain(BEARISH_KEYWORDS)
            .filter(|(keyword, _)| text_lower.contains(keyword))
            .map(|(_, weight)| weight)
            .sum()
    }

    /// Score in [-1, 1]; blank text scores 0.
    pub fn analyze(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }

        let scores = self.analyzer.polarity_scores(text);
        let compound = scores["compound"];
        let boost = self.market_boost(text);
        debug!("Sentiment compound={:.3} boost={:.3}", compound, boost);

        (compound + boost * BOOST_WEIGHT).clamp(-1.0, 1.0)
    }

    /// Label by sign alone, for standalone text classification.
    pub fn reading(&self, text: &str) -> SentimentReading {
        SentimentReading::from_polarity(self.analyze(text))
    }

    /// Label with the ±0.1 dead zone used when sentiment feeds a trade signal.
    pub fn signal_reading(&self, text: &str) -> SentimentReading {
        SentimentReading::from_score(self.analyze(text))
    }
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
