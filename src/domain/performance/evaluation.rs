//! Accuracy metrics for comparing realised prices with model forecasts.

use crate::domain::errors::EvaluationError;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStatistics {
    pub actual_mean: f64,
    pub predicted_mean: f64,
    pub actual_std: f64,
    pub predicted_std: f64,
    pub data_points: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    #[serde(rename = "MAE")]
    pub mae: f64,
    #[serde(rename = "RMSE")]
    pub rmse: f64,
    /// `None` when every actual value is zero.
    #[serde(rename = "MAPE")]
    pub mape: Option<f64>,
    /// Share (in %) of steps where forecast and actual moved the same way.
    pub direction_accuracy: Option<f64>,
    pub statistics: SeriesStatistics,
}

pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .mean()
}

pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .mean()
        .sqrt()
}

/// Skips points whose actual value is zero.
pub fn mean_absolute_percentage_error(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    let errors: Vec<f64> = actual
        .iter()
        .zip(predicted)
        .filter(|(a, _)| **a != 0.0)
        .map(|(a, p)| ((a - p) / a).abs() * 100.0)
        .collect();

    if errors.is_empty() {
        None
    } else {
        Some(errors.mean())
    }
}

/// Percentage of consecutive steps where `diff > 0` agrees between both series.
pub fn direction_accuracy(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    if actual.len() < 2 {
        return None;
    }

    let steps = actual.len() - 1;
    let agreeing = actual
        .windows(2)
        .zip(predicted.windows(2))
        .filter(|(a, p)| (a[1] - a[0] > 0.0) == (p[1] - p[0] > 0.0))
        .count();

    Some(agreeing as f64 / steps as f64 * 100.0)
}

pub fn calculate_all_metrics(
    actual: &[f64],
    predicted: &[f64],
) -> Result<EvaluationReport, EvaluationError> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(EvaluationError::Empty);
    }
    if actual.len() != predicted.len() {
        return Err(EvaluationError::LengthMismatch {
            actual: actual.len(),
            predicted: predicted.len(),
        });
    }

    Ok(EvaluationReport {
        mae: mean_absolute_error(actual, predicted),
        rmse: root_mean_squared_error(actual, predicted),
        mape: mean_absolute_percentage_error(actual, predicted),
        direction_accuracy: direction_accuracy(actual, predicted),
        statistics: SeriesStatistics {
            actual_mean: actual.iter().mean(),
            predicted_mean: predicted.iter().mean(),
            actual_std: actual.iter().population_std_dev(),
            predicted_std: predicted.iter().population_std_dev(),
            data_points: actual.len(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_basic_errors() {
        let actual = [100.0, 102.0, 101.0, 105.0];
        let predicted = [101.0, 101.0, 103.0, 104.0];

        let report = calculate_all_metrics(&actual, &predicted).unwrap();

        assert!(approx(report.mae, 1.25));
        assert!(approx(report.rmse, (7.0f64 / 4.0).sqrt()));
        assert_eq!(report.statistics.data_points, 4);
        assert!(approx(report.statistics.actual_mean, 102.0));
    }

    #[test]
    fn test_direction_accuracy() {
        // actual: up, down, up ; predicted: flat(=not up), up, up
        let actual = [100.0, 102.0, 101.0, 105.0];
        let predicted = [101.0, 101.0, 103.0, 104.0];

        let accuracy = direction_accuracy(&actual, &predicted).unwrap();
        assert!(approx(accuracy, 100.0 / 3.0));
        assert!(direction_accuracy(&[1.0], &[1.0]).is_none());
    }

    #[test]
    fn test_mape_skips_zero_actuals() {
        let mape = mean_absolute_percentage_error(&[0.0, 50.0], &[10.0, 55.0]).unwrap();
        assert!(approx(mape, 10.0));
        assert!(mean_absolute_percentage_error(&[0.0, 0.0], &[1.0, 2.0]).is_none());
    }

    #[test]
    fn test_population_std() {
        let report = calculate_all_metrics(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], &[0.0; 8])
            .unwrap();
        assert!(approx(report.statistics.actual_std, 2.0));
        assert!(approx(report.statistics.predicted_std, 0.0));
    }

    #[test]
    fn test_input_validation() {
        assert_eq!(
            calculate_all_metrics(&[], &[]).unwrap_err(),
            EvaluationError::Empty
        );
        assert_eq!(
            calculate_all_metrics(&[1.0, 2.0], &[1.0]).unwrap_err(),
            EvaluationError::LengthMismatch {
                actual: 2,
                predicted: 1
            }
        );
    }

    #[test]
    fn test_report_uses_uppercase_metric_keys() {
        let report = calculate_all_metrics(&[1.0, 2.0], &[1.0, 2.0]).unwrap();
        let value = serde_json::to_value(&report).unwrap();

        assert!(value.get("MAE").is_some());
        assert!(value.get("RMSE").is_some());
        assert!(value.get("MAPE").is_some());
        assert_eq!(value["statistics"]["data_points"], 2);
    }
}
