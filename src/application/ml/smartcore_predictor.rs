use super::predictor::PricePredictor;
use crate::domain::errors::{ModelStoreError, PredictionError};
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fs::File;
use std::io::BufReader;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, info};

pub type ForestModel = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Random forest regressor persisted as smartcore's serde JSON.
pub struct SmartCorePredictor {
    model: ForestModel,
}

impl SmartCorePredictor {
    pub fn new(model: ForestModel) -> Self {
        Self { model }
    }

    pub fn from_file(model_path: &Path) -> Result<Self, ModelStoreError> {
        let file = File::open(model_path).map_err(|source| ModelStoreError::Io {
            path: model_path.display().to_string(),
            source,
        })?;

        let model: ForestModel = serde_json::from_reader(BufReader::new(file)).map_err(
            |source| ModelStoreError::Parse {
                path: model_path.display().to_string(),
                source,
            },
        )?;

        info!("Successfully loaded ML model from {:?}", model_path);
        Ok(Self { model })
    }
}

impl PricePredictor for SmartCorePredictor {
    fn predict(&self, features: &[f64]) -> Result<f64, PredictionError> {
        let input_matrix = DenseMatrix::from_2d_vec(&vec![features.to_vec()]).map_err(|e| {
            PredictionError::ModelInference {
                reason: format!("Matrix creation failed: {}", e),
            }
        })?;

        // smartcore panics on an out-of-range column when the forest was fit
        // on more columns than the row carries.
        let predictions = panic::catch_unwind(AssertUnwindSafe(|| {
            self.model.predict(&input_matrix)
        }))
        .map_err(|_| PredictionError::ModelInference {
            reason: format!(
                "model rejected a row of {} features (shape mismatch)",
                features.len()
            ),
        })?
        .map_err(|e| PredictionError::ModelInference {
            reason: e.to_string(),
        })?;

        let prediction = predictions
            .first()
            .copied()
            .ok_or_else(|| PredictionError::ModelInference {
                reason: "No prediction returned".to_string(),
            })?;

        debug!("Random forest prediction: {:.4}", prediction);
        Ok(prediction)
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest"
    }
}
