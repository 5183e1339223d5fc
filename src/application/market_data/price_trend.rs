use crate::domain::errors::HistoryError;
use crate::domain::history::{HistoryRecord, sorted_price_series};
use serde::{Deserialize, Serialize};
use ta::Next;
use ta::indicators::SimpleMovingAverage;

pub const SHORT_SMA_PERIOD: usize = 10;
pub const LONG_SMA_PERIOD: usize = 50;
/// Points needed before the long-term trend is read from the SMA50 slope.
pub const LONG_TERM_MIN_POINTS: usize = 100;
/// How far back (in points) the SMA50 is compared against.
const LONG_TERM_LOOKBACK: usize = 49;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendLabel {
    Bullish,
    Bearish,
    Neutral,
    #[serde(rename = "Insufficient data")]
    InsufficientData,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceTrendReport {
    pub short_term_trend: TrendLabel,
    pub long_term_trend: TrendLabel,
    pub ma_short: Option<f64>,
    pub ma_long: Option<f64>,
}

fn compare(a: f64, b: f64) -> TrendLabel {
    if a > b {
        TrendLabel::Bullish
    } else if a < b {
        TrendLabel::Bearish
    } else {
        TrendLabel::Neutral
    }
}

fn sma_series(prices: &[f64], period: usize) -> Vec<f64> {
    let Ok(mut sma) = SimpleMovingAverage::new(period) else {
        return Vec::new();
    };
    prices.iter().map(|p| sma.next(*p)).collect()
}

/// SMA10 vs SMA50 for the short-term call; SMA50 against itself
/// 49 points earlier for the long-term call once 100+ points exist.
pub fn analyze_price_history(history: &[HistoryRecord]) -> Result<PriceTrendReport, HistoryError> {
    let series = sorted_price_series(history)?;

    if series.len() < LONG_SMA_PERIOD {
        return Ok(PriceTrendReport {
            short_term_trend: TrendLabel::InsufficientData,
            long_term_trend: TrendLabel::InsufficientData,
            ma_short: None,
            ma_long: None,
        });
    }

    let prices: Vec<f64> = series.iter().map(|p| p.price).collect();
    let short = sma_series(&prices, SHORT_SMA_PERIOD);
    let long = sma_series(&prices, LONG_SMA_PERIOD);

    let (Some(&ma_short), Some(&ma_long)) = (short.last(), long.last()) else {
        return Ok(PriceTrendReport {
            short_term_trend: TrendLabel::InsufficientData,
            long_term_trend: TrendLabel::InsufficientData,
            ma_short: None,
            ma_long: None,
        });
    };

    let long_term_trend = if prices.len() > LONG_TERM_MIN_POINTS {
        compare(ma_long, long[long.len() - 1 - LONG_TERM_LOOKBACK])
    } else {
        TrendLabel::Neutral
    };

    Ok(PriceTrendReport {
        short_term_trend: compare(ma_short, ma_long),
        long_term_trend,
        ma_short: Some(ma_short),
        ma_long: Some(ma_long),
    })
}
