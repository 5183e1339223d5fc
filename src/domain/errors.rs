use thiserror::Error;

/// Errors raised while turning a price history into a model prediction
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("No trained model found for symbol {symbol}")]
    UnavailableModel { symbol: String },

    #[error(
        "Insufficient historical data to prepare features: need {} records ({required_lags} lags), got {available}",
        .required_lags + 1
    )]
    InsufficientData {
        required_lags: usize,
        available: usize,
    },

    #[error("Feature '{feature}' could not be read as a number from column '{column}'")]
    ResolutionFailure { feature: String, column: String },

    #[error("Prediction failed: {reason}")]
    ModelInference { reason: String },
}

/// Errors related to loading a trained model and its metadata from storage
#[derive(Debug, Error)]
pub enum ModelStoreError {
    #[error("No model artifact for {symbol}")]
    NotFound { symbol: String },

    #[error("Model exists but metadata not found for {symbol}")]
    MetadataMissing { symbol: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid metadata for {symbol}: {reason}")]
    InvalidMetadata { symbol: String, reason: String },
}

/// Errors related to malformed history records
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Record {index} is missing field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("Record {index} has an unparseable timestamp: {value}")]
    InvalidTimestamp { index: usize, value: String },

    #[error("Record {index} has a non-numeric price")]
    InvalidPrice { index: usize },
}

/// Errors related to comparing actual and predicted series
#[derive(Debug, Error, PartialEq)]
pub enum EvaluationError {
    #[error("Empty arrays provided")]
    Empty,

    #[error("Array length mismatch: actual={actual}, predicted={predicted}")]
    LengthMismatch { actual: usize, predicted: usize },
}
