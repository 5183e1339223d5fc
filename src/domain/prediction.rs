use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Method tag attached to every model-backed forecast.
pub const ML_METHOD: &str = "ML_RandomForest";

/// Direction implied by a forecast relative to the current price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bullish => write!(f, "Bullish"),
            Self::Bearish => write!(f, "Bearish"),
            Self::Neutral => write!(f, "Neutral"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_price: f64,
    pub current_price: f64,
    pub predicted_change: f64,
    pub predicted_change_pct: f64,
    pub trend: Trend,
    pub confidence: f64,
    pub model_type: Option<String>,
    pub model_version: String,
    pub model_metrics: BTreeMap<String, serde_json::Value>,
    pub available: bool,
    pub method: String,
}

/// Structured failure. `available` tells the caller whether a model exists
/// for the symbol at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionFailure {
    pub error: String,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_lags: Option<usize>,
}

impl PredictionFailure {
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            available: false,
            model_type: None,
            required_lags: None,
        }
    }

    pub fn with_model(error: impl Into<String>, model_type: Option<String>) -> Self {
        Self {
            error: error.into(),
            available: true,
            model_type,
            required_lags: None,
        }
    }

    pub fn with_required_lags(mut self, lags: usize) -> Self {
        self.required_lags = Some(lags);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionOutcome {
    Success(PredictionResult),
    Failure(PredictionFailure),
}

impl PredictionOutcome {
    pub fn is_available(&self) -> bool {
        match self {
            Self::Success(result) => result.available,
            Self::Failure(failure) => failure.available,
        }
    }

    pub fn as_success(&self) -> Option<&PredictionResult> {
        match self {
            Self::Success(result) => Some(result),
            Self::Failure(_) => None,
        }
    }

    pub fn as_failure(&self) -> Option<&PredictionFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}
