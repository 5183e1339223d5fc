use super::predictor::{LoadedModel, ModelStore};
use crate::domain::errors::ModelStoreError;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, error};

/// Loaded models per symbol. Entries are written once and only read
/// afterwards; failed loads are not remembered.
pub struct ModelCache {
    models: RwLock<HashMap<String, Arc<LoadedModel>>>,
}

impl std::fmt::Debug for ModelCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelCache")
            .field("models", &"<RwLock>")
            .finish()
    }
}

impl ModelCache {
    pub fn new() -> Self {
        Self {
            models: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, symbol: &str) -> Option<Arc<LoadedModel>> {
        match self.models.read() {
            Ok(guard) => guard.get(symbol).cloned(),
            Err(poisoned) => poisoned.into_inner().get(symbol).cloned(),
        }
    }

    /// Returns the cached model or loads it from `store`.
    ///
    /// Two callers racing on the same symbol may both load; the first insert wins.
    pub fn get_or_load(
        &self,
        symbol: &str,
        store: &dyn ModelStore,
    ) -> Result<Arc<LoadedModel>, ModelStoreError> {
        if let Some(model) = self.get(symbol) {
            debug!("ModelCache: hit for {}", symbol);
            return Ok(model);
        }

        let loaded = store.load(symbol)?;

        let mut guard = match self.models.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("ModelCache: Lock poisoned during write, recovering");
                poisoned.into_inner()
            }
        };
        Ok(guard.entry(symbol.to_string()).or_insert(loaded).clone())
    }

    pub fn len(&self) -> usize {
        match self.models.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new()
    }
}
