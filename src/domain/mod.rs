// Domain-specific error types
pub mod errors;

// Raw price history records and derived OHLCV frames
pub mod history;

// Model metadata and feature naming
pub mod ml;

// Forecast evaluation metrics
pub mod performance;

// Prediction results returned to callers
pub mod prediction;

pub mod sentiment;
