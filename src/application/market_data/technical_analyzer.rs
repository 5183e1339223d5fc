use crate::domain::history::{HistoryRecord, sorted_price_series};
use serde::{Deserialize, Serialize};
use std::fmt;
use ta::Next;
use ta::indicators::ExponentialMovingAverage;
use tracing::warn;

pub const EMA_PERIOD: usize = 20;
pub const RSI_PERIOD: usize = 14;
/// Points needed before the EMA/RSI pair is trusted.
pub const MIN_TECHNICAL_POINTS: usize = 20;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TechnicalSignal {
    Bullish,
    Bearish,
    Neutral,
    #[serde(rename = "Invalid input")]
    InvalidInput,
    #[serde(rename = "Insufficient data")]
    InsufficientData,
}

impl fmt::Display for TechnicalSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bullish => write!(f, "Bullish"),
            Self::Bearish => write!(f, "Bearish"),
            Self::Neutral => write!(f, "Neutral"),
            Self::InvalidInput => write!(f, "Invalid input"),
            Self::InsufficientData => write!(f, "Insufficient data"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TechnicalAnalysis {
    pub ema: Option<f64>,
    pub rsi: Option<f64>,
    pub technical_signal: TechnicalSignal,
}

impl TechnicalAnalysis {
    fn without_indicators(signal: TechnicalSignal) -> Self {
        Self {
            ema: None,
            rsi: None,
            technical_signal: signal,
        }
    }
}

/// Price above EMA with RSI not overbought is Bullish; price below EMA with
/// RSI not oversold is Bearish.
pub fn classify(price: f64, ema: f64, rsi: f64) -> TechnicalSignal {
    if price > ema && rsi < RSI_OVERBOUGHT {
        TechnicalSignal::Bullish
    } else if price < ema && rsi > RSI_OVERSOLD {
        TechnicalSignal::Bearish
    } else {
        TechnicalSignal::Neutral
    }
}

fn latest_ema(prices: &[f64]) -> Option<f64> {
    let mut ema = ExponentialMovingAverage::new(EMA_PERIOD).ok()?;
    prices.iter().map(|p| ema.next(*p)).last()
}

/// RSI with Wilder smoothing (alpha = 1/period) over price differences.
///
/// An EMA of period `2n - 1` has alpha `1/n`, so `ta`'s EMA does the smoothing.
/// No losses at all reads as 100.
pub fn wilder_rsi(prices: &[f64], period: usize) -> Option<f64> {
    let smoothing = period.checked_mul(2)?.checked_sub(1)?;
    let mut gains = ExponentialMovingAverage::new(smoothing).ok()?;
    let mut losses = ExponentialMovingAverage::new(smoothing).ok()?;

    let mut last = None;
    for pair in prices.windows(2) {
        let diff = pair[1] - pair[0];
        last = Some((gains.next(diff.max(0.0)), losses.next((-diff).max(0.0))));
    }

    let (avg_gain, avg_loss) = last?;
    if avg_loss == 0.0 {
        return Some(100.0);
    }
    Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
}

/// EMA20/RSI14 reading of the latest point, after sorting by timestamp.
pub fn analyze_technical(history: &[HistoryRecord]) -> TechnicalAnalysis {
    let series = match sorted_price_series(history) {
        Ok(series) => series,
        Err(e) => {
            warn!("Technical analysis rejected input: {}", e);
            return TechnicalAnalysis::without_indicators(TechnicalSignal::InvalidInput);
        }
    };

    if series.len() < MIN_TECHNICAL_POINTS {
        return TechnicalAnalysis::without_indicators(TechnicalSignal::InsufficientData);
    }

    let prices: Vec<f64> = series.iter().map(|p| p.price).collect();
    let (Some(ema_value), Some(rsi_value), Some(&price)) =
        (latest_ema(&prices), wilder_rsi(&prices, RSI_PERIOD), prices.last())
    else {
        return TechnicalAnalysis::without_indicators(TechnicalSignal::InvalidInput);
    };

    TechnicalAnalysis {
        ema: Some(ema_value),
        rsi: Some(rsi_value),
        technical_signal: classify(price, ema_value, rsi_value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn series(prices: impl IntoIterator<Item = f64>) -> Vec<HistoryRecord> {
        prices
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                HistoryRecord::from(json!({
                    "timestamp": format!("2025-03-01T{:02}:{:02}:00Z", i / 60, i % 60),
                    "price": p
                }))
            })
            .collect()
    }

    #[test]
    fn test_classification_rules() {
        assert_eq!(classify(105.0, 100.0, 60.0), TechnicalSignal::Bullish);
        assert_eq!(classify(105.0, 100.0, 75.0), TechnicalSignal::Neutral);
        assert_eq!(classify(95.0, 100.0, 40.0), TechnicalSignal::Bearish);
        assert_eq!(classify(95.0, 100.0, 25.0), TechnicalSignal::Neutral);
        assert_eq!(classify(100.0, 100.0, 50.0), TechnicalSignal::Neutral);
    }

    #[test]
    fn test_insufficient_data() {
        let analysis = analyze_technical(&series((0..10).map(|i| 100.0 + i as f64)));
        assert_eq!(analysis.technical_signal, TechnicalSignal::InsufficientData);
        assert!(analysis.ema.is_none());
    }

    #[test]
    fn test_missing_price_is_invalid_input() {
        let history = vec![HistoryRecord::from(json!({"timestamp": "2025-01-01"}))];
        let analysis = analyze_technical(&history);
        assert_eq!(analysis.technical_signal, TechnicalSignal::InvalidInput);
    }

    fn zigzag(drift: f64, count: usize) -> Vec<f64> {
        (0..count)
            .map(|i| {
                let swing = if i % 2 == 0 { 3.0 } else { -3.0 };
                100.0 + drift * i as f64 + swing
            })
            .collect()
    }

    #[test]
    fn test_choppy_downtrend_is_bearish() {
        // Ends on a down-swing below the lagging EMA, RSI stays mid-range
        let analysis = analyze_technical(&series(zigzag(-0.2, 40)));

        assert_eq!(analysis.technical_signal, TechnicalSignal::Bearish);
        assert!(analysis.ema.unwrap() > 89.2);
    }

    #[test]
    fn test_choppy_uptrend_is_bullish() {
        let analysis = analyze_technical(&series(zigzag(0.2, 41)));

        assert_eq!(analysis.technical_signal, TechnicalSignal::Bullish);
        let rsi = analysis.rsi.unwrap();
        assert!(rsi > RSI_OVERSOLD && rsi < RSI_OVERBOUGHT);
    }

    #[test]
    fn test_unsorted_input_is_sorted_first() {
        let mut history = series((0..30).map(|i| 100.0 + i as f64));
        history.reverse();

        let analysis = analyze_technical(&history);
        let ema = analysis.ema.unwrap();
        // Rising series: the EMA lags below the latest (highest) price
        assert!(ema < 129.0);
    }

    #[test]
    fn test_rsi_uses_wilder_smoothing() {
        let prices = [
            100.0, 101.5, 100.8, 102.2, 103.0, 102.4, 103.9, 104.5, 103.7, 105.1, 104.2, 105.8,
            106.3, 105.5, 104.9, 106.7, 107.2, 106.4, 107.9, 108.3, 107.6, 108.8,
        ];
        let analysis = analyze_technical(&series(prices));

        assert!((analysis.rsi.unwrap() - 79.337238).abs() < 1e-4);
        assert!((analysis.ema.unwrap() - 105.511996).abs() < 1e-4);
        // Above the EMA but overbought
        assert_eq!(analysis.technical_signal, TechnicalSignal::Neutral);
    }

    #[test]
    fn test_rsi_without_losses_is_100() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        assert_eq!(wilder_rsi(&prices, RSI_PERIOD), Some(100.0));
        assert_eq!(wilder_rsi(&[100.0], RSI_PERIOD), None);
    }

    #[test]
    fn test_signal_labels_serialize() {
        assert_eq!(
            serde_json::to_value(TechnicalSignal::InsufficientData).unwrap(),
            json!("Insufficient data")
        );
    }
}
