//! Builds the model input row from a loosely-shaped price history.
//!
//! For every name in the descriptor's `features` (in order) the resolver
//! decides between a lagged and a current-value lookup, finds the backing
//! column (exact match, then alias table) and reads the cell. Names that
//! resolve to no column are zero-filled and logged, since that silently
//! degrades the forecast.

use crate::domain::errors::PredictionError;
use crate::domain::history::{HistoryRecord, PriceFrame, value_as_f64};
use crate::domain::ml::feature_registry::{FeatureSpec, parse_feature_name, resolve_column};
use crate::domain::ml::{FeatureVector, ModelMetadata};
use tracing::{debug, warn};

/// Resolves `history` against `metadata.features`.
///
/// Fails with `InsufficientData` when fewer than `lags + 1` records are
/// available, and with `ResolutionFailure` when a resolved cell is not numeric.
pub fn resolve(
    history: &[HistoryRecord],
    metadata: &ModelMetadata,
) -> Result<FeatureVector, PredictionError> {
    if history.len() < metadata.required_records() {
        return Err(PredictionError::InsufficientData {
            required_lags: metadata.lags,
            available: history.len(),
        });
    }

    let frame = PriceFrame::from_records(history);
    resolve_frame(&frame, metadata)
}

/// Callers guarantee `frame.len() >= metadata.required_records()`.
fn resolve_frame(
    frame: &PriceFrame,
    metadata: &ModelMetadata,
) -> Result<FeatureVector, PredictionError> {
    let latest = frame.len() - 1;
    let mut values = Vec::with_capacity(metadata.features.len());

    for feature in &metadata.features {
        let spec = parse_feature_name(feature);

        let Some(column) = resolve_column(frame.columns(), spec.column()) else {
            warn!(
                "Feature '{}' matches no history column, filling with 0.0",
                feature.trim()
            );
            values.push(0.0);
            continue;
        };

        let row = match spec {
            FeatureSpec::Lagged { lag, .. } if frame.len() > lag => latest - lag,
            FeatureSpec::Lagged { lag, .. } => {
                debug!(
                    "Feature '{}' needs lag {} but only {} records, using latest",
                    feature.trim(),
                    lag,
                    frame.len()
                );
                latest
            }
            FeatureSpec::Current { .. } => latest,
        };

        let value = frame
            .cell(column, row)
            .and_then(value_as_f64)
            .ok_or_else(|| PredictionError::ResolutionFailure {
                feature: feature.trim().to_string(),
                column: column.to_string(),
            })?;
        values.push(value);
    }

    Ok(FeatureVector::from(values))
}
