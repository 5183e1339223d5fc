use super::technical_analyzer::{TechnicalSignal, analyze_technical};
use crate::domain::history::HistoryRecord;
use crate::domain::sentiment::{SentimentLabel, SentimentReading};
use crate::infrastructure::news::SentimentAnalyzer;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinalSignal {
    Buy,
    Sell,
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalConfidence {
    High,
    Medium,
    Low,
}

impl fmt::Display for FinalSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "Buy"),
            Self::Sell => write!(f, "Sell"),
            Self::Hold => write!(f, "Hold"),
        }
    }
}

impl fmt::Display for SignalConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridReport {
    pub ema_20: Option<f64>,
    pub rsi_14: Option<f64>,
    pub technical_signal: TechnicalSignal,
    pub sentiment_label: SentimentLabel,
    pub sentiment_score: f64,
    pub final_signal: FinalSignal,
    pub confidence: SignalConfidence,
    pub explanation: String,
}

/// Buy/Sell only when indicators and news agree.
pub fn hybrid_decision(
    technical: TechnicalSignal,
    sentiment: SentimentLabel,
) -> (FinalSignal, SignalConfidence) {
    match (technical, sentiment) {
        (TechnicalSignal::Bullish, SentimentLabel::Positive) => {
            (FinalSignal::Buy, SignalConfidence::High)
        }
        (TechnicalSignal::Bearish, SentimentLabel::Negative) => {
            (FinalSignal::Sell, SignalConfidence::High)
        }
        (TechnicalSignal::Neutral, _) => (FinalSignal::Hold, SignalConfidence::Low),
        _ => (FinalSignal::Hold, SignalConfidence::Medium),
    }
}

/// Combines technical indicators and news sentiment into one signal.
pub struct HybridAnalyzer {
    sentiment: SentimentAnalyzer,
}

impl HybridAnalyzer {
    pub fn new(sentiment: SentimentAnalyzer) -> Self {
        Self { sentiment }
    }

    pub fn analyze(&self, history: &[HistoryRecord], news_text: &str) -> HybridReport {
        let technical = analyze_technical(history);
        let reading = self.sentiment.signal_reading(news_text);
        build_report(technical.ema, technical.rsi, technical.technical_signal, reading)
    }
}

impl Default for HybridAnalyzer {
    fn default() -> Self {
        Self::new(SentimentAnalyzer::new())
    }
}

fn build_report(
    ema: Option<f64>,
    rsi: Option<f64>,
    technical: TechnicalSignal,
    reading: SentimentReading,
) -> HybridReport {
    let (final_signal, confidence) = hybrid_decision(technical, reading.label);

    let explanation = format!(
        "Tech={} (EMA20={:.2}, RSI14={:.2}); Sentiment={} ({:.2}). Signal={} (conf={}).",
        technical,
        ema.unwrap_or(0.0),
        rsi.unwrap_or(0.0),
        reading.label,
        reading.score,
        final_signal,
        confidence
    );

    HybridReport {
        ema_20: ema,
        rsi_14: rsi,
        technical_signal: technical,
        sentiment_label: reading.label,
        sentiment_score: reading.score,
        final_signal,
        confidence,
        explanation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_matrix() {
        use SentimentLabel::*;
        use TechnicalSignal::*;

        assert_eq!(
            hybrid_decision(Bullish, Positive),
            (FinalSignal::Buy, SignalConfidence::High)
        );
        assert_eq!(
            hybrid_decision(Bearish, Negative),
            (FinalSignal::Sell, SignalConfidence::High)
        );
        assert_eq!(
            hybrid_decision(TechnicalSignal::Neutral, Positive),
            (FinalSignal::Hold, SignalConfidence::Low)
        );
        assert_eq!(
            hybrid_decision(Bullish, Negative),
            (FinalSignal::Hold, SignalConfidence::Medium)
        );
        assert_eq!(
            hybrid_decision(InsufficientData, Positive),
            (FinalSignal::Hold, SignalConfidence::Medium)
        );
    }

    #[test]
    fn test_explanation_without_indicators() {
        let report = build_report(
            None,
            None,
            TechnicalSignal::InsufficientData,
            SentimentReading::from_score(0.0),
        );

        assert_eq!(
            report.explanation,
            "Tech=Insufficient data (EMA20=0.00, RSI14=0.00); Sentiment=Neutral (0.00). Signal=Hold (conf=Medium)."
        );
    }
}
