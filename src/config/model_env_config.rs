//! Model store configuration parsing from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_MODELS_DIR: &str = "ai_models";

/// Where trained models live and whether loaded ones are kept in memory
#[derive(Debug, Clone)]
pub struct ModelEnvConfig {
    pub models_dir: PathBuf,
    pub cache_enabled: bool,
}

impl Default for ModelEnvConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from(DEFAULT_MODELS_DIR),
            cache_enabled: true,
        }
    }
}

impl ModelEnvConfig {
    pub fn from_env() -> Result<Self> {
        let models_dir = env::var("AI_MODELS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODELS_DIR));

        let cache_enabled = env::var("PREDICTION_CACHE_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .trim()
            .to_lowercase()
            .parse::<bool>()
            .context("Failed to parse PREDICTION_CACHE_ENABLED, must be 'true' or 'false'")?;

        Ok(Self {
            models_dir,
            cache_enabled,
        })
    }
}
