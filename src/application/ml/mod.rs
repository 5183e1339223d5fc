pub mod confidence;
pub mod feature_resolver;
pub mod model_cache;
pub mod pipeline;
pub mod predictor;
pub mod smartcore_predictor;

pub use model_cache::ModelCache;
pub use pipeline::PricePredictionService;
pub use predictor::{LoadedModel, ModelStore, PricePredictor};
