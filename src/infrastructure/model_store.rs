//! Trained models on local disk.
//!
//! Layout per symbol inside the models directory:
//! - `{SYMBOL}_model.json`: smartcore random forest, serde JSON
//! - `{SYMBOL}_metadata.json`: [`ModelMetadata`]

use crate::application::ml::predictor::{LoadedModel, ModelStore};
use crate::application::ml::smartcore_predictor::SmartCorePredictor;
use crate::domain::errors::ModelStoreError;
use crate::domain::ml::ModelMetadata;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, warn};

#[derive(Debug, Clone)]
pub struct FileModelStore {
    models_dir: PathBuf,
}

impl FileModelStore {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
        }
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn model_path(&self, symbol: &str) -> PathBuf {
        self.models_dir.join(format!("{}_model.json", symbol))
    }

    pub fn metadata_path(&self, symbol: &str) -> PathBuf {
        self.models_dir.join(format!("{}_metadata.json", symbol))
    }

    fn read_metadata(&self, symbol: &str, path: &Path) -> Result<ModelMetadata, ModelStoreError> {
        let raw = fs::read_to_string(path).map_err(|source| ModelStoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let metadata: ModelMetadata =
            serde_json::from_str(&raw).map_err(|source| ModelStoreError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        metadata
            .validate()
            .map_err(|reason| ModelStoreError::InvalidMetadata {
                symbol: symbol.to_string(),
                reason,
            })?;
        Ok(metadata)
    }
}

/// Symbols become file names, so anything that could leave the directory is refused.
fn is_safe_symbol(symbol: &str) -> bool {
    !symbol.is_empty()
        && symbol != "."
        && symbol != ".."
        && !symbol.contains(['/', '\\'])
        && !symbol.contains("..")
}

impl ModelStore for FileModelStore {
    fn load(&self, symbol: &str) -> Result<Arc<LoadedModel>, ModelStoreError> {
        if !is_safe_symbol(symbol) {
            warn!("Refusing to look up model for symbol {:?}", symbol);
            return Err(ModelStoreError::NotFound {
                symbol: symbol.to_string(),
            });
        }

        let model_path = self.model_path(symbol);
        let metadata_path = self.metadata_path(symbol);

        if !model_path.exists() {
            debug!("No model artifact at {:?}", model_path);
            return Err(ModelStoreError::NotFound {
                symbol: symbol.to_string(),
            });
        }

        if !metadata_path.exists() {
            warn!("Model exists but metadata not found for {}", symbol);
            return Err(ModelStoreError::MetadataMissing {
                symbol: symbol.to_string(),
            });
        }

        let loaded = self
            .read_metadata(symbol, &metadata_path)
            .and_then(|metadata| {
                let predictor = SmartCorePredictor::from_file(&model_path)?;
                Ok(LoadedModel {
                    predictor: Box::new(predictor),
                    metadata,
                })
            })
            .inspect_err(|e| error!("Error loading model for {}: {}", symbol, e))?;

        Ok(Arc::new(loaded))
    }
}
