use serde::{Deserialize, Serialize};
use std::fmt;

/// Score magnitude above which news counts as positive or negative when it
/// feeds a trading signal.
pub const SENTIMENT_LABEL_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "Positive"),
            Self::Negative => write!(f, "Negative"),
            Self::Neutral => write!(f, "Neutral"),
        }
    }
}

impl SentimentLabel {
    fn with_threshold(score: f64, threshold: f64) -> Self {
        if score > threshold {
            Self::Positive
        } else if score < -threshold {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    /// Signal-grade label: only scores beyond ±[`SENTIMENT_LABEL_THRESHOLD`] count.
    pub fn from_score(score: f64) -> Self {
        Self::with_threshold(score, SENTIMENT_LABEL_THRESHOLD)
    }

    /// Plain polarity: any positive score is Positive, any negative one Negative.
    pub fn from_polarity(score: f64) -> Self {
        Self::with_threshold(score, 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentReading {
    pub label: SentimentLabel,
    pub score: f64,
}

impl SentimentReading {
    pub fn from_score(score: f64) -> Self {
        Self {
            label: SentimentLabel::from_score(score),
            score,
        }
    }

    pub fn from_polarity(score: f64) -> Self {
        Self {
            label: SentimentLabel::from_polarity(score),
            score,
        }
    }
}
