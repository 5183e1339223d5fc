use crate::domain::prediction::Trend;

/// Floor applied to model-derived confidence.
pub const MIN_CONFIDENCE: f64 = 0.3;
/// Confidence reported when no error metric or price is available.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;
/// Percentage move that separates a directional call from Neutral.
pub const TREND_THRESHOLD_PCT: f64 = 2.0;

/// Heuristic confidence and direction for one forecast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastAssessment {
    pub confidence: f64,
    pub trend: Trend,
    pub change: f64,
    pub change_pct: f64,
}

/// `1 - rmse/current`, with the relative error capped at 1 and the result
/// floored at [`MIN_CONFIDENCE`]. Falls back to [`DEFAULT_CONFIDENCE`].
pub fn confidence(current: f64, rmse: Option<f64>) -> f64 {
    match rmse {
        Some(rmse) if current > 0.0 => {
            let relative_error = (rmse / current).clamp(0.0, 1.0);
            (1.0 - relative_error).max(MIN_CONFIDENCE)
        }
        _ => DEFAULT_CONFIDENCE,
    }
}

/// Strict thresholds: exactly ±2% stays Neutral.
pub fn classify_trend(change_pct: f64) -> Trend {
    if change_pct > TREND_THRESHOLD_PCT {
        Trend::Bullish
    } else if change_pct < -TREND_THRESHOLD_PCT {
        Trend::Bearish
    } else {
        Trend::Neutral
    }
}

pub fn estimate(predicted: f64, current: f64, rmse: Option<f64>) -> ForecastAssessment {
    let (change, change_pct) = if current > 0.0 {
        let change = predicted - current;
        (change, change / current * 100.0)
    } else {
        (0.0, 0.0)
    };

    ForecastAssessment {
        confidence: confidence(current, rmse),
        trend: classify_trend(change_pct),
        change,
        change_pct,
    }
}
