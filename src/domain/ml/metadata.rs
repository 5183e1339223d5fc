use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Metric key holding the model's root-mean-squared error on its test split.
pub const RMSE_METRIC: &str = "RMSE";

/// Contract of a trained model, stored next to the artifact as
/// `{SYMBOL}_metadata.json`.
///
/// `features` fixes both the width and the column order of the input row the
/// model was fit on. It never changes after training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default = "unknown_version")]
    pub version: String,
    pub features: Vec<String>,
    #[serde(default)]
    pub lags: usize,
    /// Whatever the training run recorded; passed back to callers untouched.
    #[serde(default)]
    pub metrics: BTreeMap<String, Value>,
}

fn unknown_version() -> String {
    "unknown".to_string()
}

impl ModelMetadata {
    /// Trailing records needed on top of the latest one.
    pub fn required_records(&self) -> usize {
        self.lags.saturating_add(1)
    }

    /// `None` when absent or not a number.
    pub fn rmse(&self) -> Option<f64> {
        self.metrics.get(RMSE_METRIC).and_then(Value::as_f64)
    }

    /// Rejects descriptors that cannot describe any model input.
    pub fn validate(&self) -> Result<(), String> {
        if self.features.is_empty() {
            return Err("feature list is empty".to_string());
        }
        if self.features.iter().any(|f| f.trim().is_empty()) {
            return Err("feature list contains a blank name".to_string());
        }
        Ok(())
    }
}
