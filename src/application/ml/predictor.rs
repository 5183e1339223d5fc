use crate::domain::errors::{ModelStoreError, PredictionError};
use crate::domain::ml::{FeatureVector, ModelMetadata};
use std::sync::Arc;

/// Interface for trained price regressors
pub trait PricePredictor: Send + Sync {
    /// Predict the next price from one feature row.
    /// The row width must match what the model was fit on.
    fn predict(&self, features: &[f64]) -> Result<f64, PredictionError>;

    /// Get model name/type
    fn name(&self) -> &str;
}

/// A trained regressor together with the contract it was trained under.
pub struct LoadedModel {
    pub predictor: Box<dyn PricePredictor>,
    pub metadata: ModelMetadata,
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("predictor", &self.predictor.name())
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// Source of trained models keyed by symbol
pub trait ModelStore: Send + Sync {
    fn load(&self, symbol: &str) -> Result<Arc<LoadedModel>, ModelStoreError>;
}

/// Runs one row through `model`, rejecting rows whose width differs from
/// the width the descriptor declares.
pub fn run_inference(
    vector: &FeatureVector,
    model: &LoadedModel,
) -> Result<f64, PredictionError> {
    let expected = model.metadata.features.len();
    if vector.len() != expected {
        return Err(PredictionError::ModelInference {
            reason: format!(
                "feature vector has {} columns, model expects {}",
                vector.len(),
                expected
            ),
        });
    }

    let prediction = model.predictor.predict(vector.as_slice())?;
    if !prediction.is_finite() {
        return Err(PredictionError::ModelInference {
            reason: format!("model returned a non-finite value ({})", prediction),
        });
    }
    Ok(prediction)
}
