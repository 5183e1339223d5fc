//! Configuration module.
//!
//! Settings come from environment variables (a `.env` file is honoured by the
//! binaries through `dotenvy`). Per-invocation inputs stay on the command line.

mod model_env_config;

pub use model_env_config::{DEFAULT_MODELS_DIR, ModelEnvConfig};

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub models_dir: PathBuf,
    pub cache_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        let models = ModelEnvConfig::default();
        Self {
            models_dir: models.models_dir,
            cache_enabled: models.cache_enabled,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let models = ModelEnvConfig::from_env().context("Failed to load model store config")?;

        Ok(Self {
            models_dir: models.models_dir,
            cache_enabled: models.cache_enabled,
        })
    }

    /// Command-line override for the models directory.
    pub fn with_models_dir(mut self, models_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = models_dir {
            self.models_dir = dir;
        }
        self
    }
}
