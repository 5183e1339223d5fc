use super::confidence::estimate;
use super::feature_resolver::resolve;
use super::model_cache::ModelCache;
use super::predictor::{LoadedModel, ModelStore, run_inference};
use crate::domain::errors::{ModelStoreError, PredictionError};
use crate::domain::history::HistoryRecord;
use crate::domain::prediction::{
    ML_METHOD, PredictionFailure, PredictionOutcome, PredictionResult,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Forecasts the next price for a symbol from its recent history.
///
/// Every failure is folded into a [`PredictionFailure`]; nothing is retried.
pub struct PricePredictionService {
    store: Arc<dyn ModelStore>,
    cache: Option<ModelCache>,
}

impl PricePredictionService {
    pub fn new(store: Arc<dyn ModelStore>) -> Self {
        Self { store, cache: None }
    }

    /// Keeps loaded models for the lifetime of the service.
    pub fn with_cache(store: Arc<dyn ModelStore>, cache: ModelCache) -> Self {
        Self {
            store,
            cache: Some(cache),
        }
    }

    pub fn cache(&self) -> Option<&ModelCache> {
        self.cache.as_ref()
    }

    fn load(&self, symbol: &str) -> Result<Arc<LoadedModel>, ModelStoreError> {
        match &self.cache {
            Some(cache) => cache.get_or_load(symbol, self.store.as_ref()),
            None => self.store.load(symbol),
        }
    }

    pub fn predict_price(&self, symbol: &str, history: &[HistoryRecord]) -> PredictionOutcome {
        let model = match self.load(symbol) {
            Ok(model) => model,
            Err(e) => {
                warn!("Model unavailable for {}: {}", symbol, e);
                let error = PredictionError::UnavailableModel {
                    symbol: symbol.to_string(),
                };
                return PredictionOutcome::Failure(PredictionFailure::unavailable(
                    error.to_string(),
                ));
            }
        };

        let metadata = &model.metadata;

        let features = match resolve(history, metadata) {
            Ok(features) => features,
            Err(e) => {
                warn!("Feature preparation failed for {}: {}", symbol, e);
                return PredictionOutcome::Failure(
                    PredictionFailure::with_model(e.to_string(), metadata.model_type.clone())
                        .with_required_lags(metadata.lags),
                );
            }
        };

        let prediction = run_inference(&features, &model)
            .and_then(|predicted| Ok((predicted, latest_price(history)?)));
        let (predicted_price, current_price) = match prediction {
            Ok(values) => values,
            Err(e) => {
                warn!("Inference failed for {}: {}", symbol, e);
                return PredictionOutcome::Failure(PredictionFailure::with_model(
                    e.to_string(),
                    metadata.model_type.clone(),
                ));
            }
        };

        let assessment = estimate(predicted_price, current_price, metadata.rmse());

        info!(
            "{} forecast {:.4} vs {:.4} ({:+.2}%, {}, confidence {:.2})",
            symbol,
            predicted_price,
            current_price,
            assessment.change_pct,
            assessment.trend,
            assessment.confidence
        );

        PredictionOutcome::Success(PredictionResult {
            predicted_price,
            current_price,
            predicted_change: assessment.change,
            predicted_change_pct: assessment.change_pct,
            trend: assessment.trend,
            confidence: assessment.confidence,
            model_type: metadata.model_type.clone(),
            model_version: metadata.version.clone(),
            model_metrics: metadata.metrics.clone(),
            available: true,
            method: ML_METHOD.to_string(),
        })
    }
}

/// Latest record's `price`, else its `Close`, else 0.
fn latest_price(history: &[HistoryRecord]) -> Result<f64, PredictionError> {
    let Some(latest) = history.last() else {
        return Ok(0.0);
    };

    for key in ["price", "Close"] {
        match latest.numeric(key) {
            Some(Some(value)) => return Ok(value),
            Some(None) => {
                return Err(PredictionError::ModelInference {
                    reason: format!("current {} is not numeric", key),
                });
            }
            None => continue,
        }
    }
    Ok(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::predictor::PricePredictor;
    use crate::domain::ml::ModelMetadata;
    use crate::domain::prediction::Trend;
    use serde_json::json;
    use std::collections::{BTreeMap, HashMap};

    struct FixedPredictor(f64);

    impl PricePredictor for FixedPredictor {
        fn predict(&self, _features: &[f64]) -> Result<f64, PredictionError> {
            Ok(self.0)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingPredictor;

    impl PricePredictor for FailingPredictor {
        fn predict(&self, _features: &[f64]) -> Result<f64, PredictionError> {
            Err(PredictionError::ModelInference {
                reason: "shape mismatch".to_string(),
            })
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct StaticStore {
        models: HashMap<String, Arc<LoadedModel>>,
    }

    impl ModelStore for StaticStore {
        fn load(&self, symbol: &str) -> Result<Arc<LoadedModel>, ModelStoreError> {
            self.models
                .get(symbol)
                .cloned()
                .ok_or_else(|| ModelStoreError::NotFound {
                    symbol: symbol.to_string(),
                })
        }
    }

    fn metadata(lags: usize, rmse: Option<f64>) -> ModelMetadata {
        let mut metrics = BTreeMap::new();
        if let Some(rmse) = rmse {
            metrics.insert("RMSE".to_string(), json!(rmse));
        }
        ModelMetadata {
            model_type: Some("RandomForestRegressor".to_string()),
            version: "2025-12-06".to_string(),
            features: vec!["Close_lag1".to_string(), "Open".to_string()],
            lags,
            metrics,
        }
    }

    fn service(
        symbol: &str,
        predictor: Box<dyn PricePredictor>,
        meta: ModelMetadata,
    ) -> PricePredictionService {
        let mut models = HashMap::new();
        models.insert(
            symbol.to_string(),
            Arc::new(LoadedModel {
                predictor,
                metadata: meta,
            }),
        );
        PricePredictionService::new(Arc::new(StaticStore { models }))
    }

    fn price_history(prices: &[f64]) -> Vec<HistoryRecord> {
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| {
                HistoryRecord::from(json!({"timestamp": format!("2025-01-{:02}", i + 1), "price": p}))
            })
            .collect()
    }

    #[test]
    fn test_missing_model_is_unavailable() {
        let svc = service("AAPL", Box::new(FixedPredictor(1.0)), metadata(1, None));
        let outcome = svc.predict_price("TSLA", &price_history(&[1.0, 2.0]));

        let failure = outcome.as_failure().unwrap();
        assert!(!failure.available);
        assert!(failure.error.contains("TSLA"));
        assert!(failure.required_lags.is_none());
    }

    #[test]
    fn test_short_history_reports_required_lags() {
        let svc = service("AAPL", Box::new(FixedPredictor(1.0)), metadata(5, Some(2.0)));
        let outcome = svc.predict_price("AAPL", &price_history(&[1.0, 2.0, 3.0]));

        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["available"], json!(true));
        assert_eq!(value["required_lags"], json!(5));
        assert_eq!(value["model_type"], json!("RandomForestRegressor"));
    }

    #[test]
    fn test_successful_forecast() {
        let svc = service("AAPL", Box::new(FixedPredictor(103.0)), metadata(1, Some(2.0)));
        let outcome = svc.predict_price("AAPL", &price_history(&[99.0, 100.0]));

        let result = outcome.as_success().unwrap();
        assert_eq!(result.current_price, 100.0);
        assert_eq!(result.predicted_price, 103.0);
        assert!((result.confidence - 0.98).abs() < 1e-12);
        assert_eq!(result.trend, Trend::Bullish);
        assert_eq!(result.method, "ML_RandomForest");
        assert_eq!(result.model_version, "2025-12-06");
        assert_eq!(result.model_metrics.get("RMSE"), Some(&json!(2.0)));
    }

    #[test]
    fn test_close_used_when_price_missing() {
        let svc = service("AAPL", Box::new(FixedPredictor(49.5)), metadata(1, None));
        let history = vec![
            HistoryRecord::from(json!({"timestamp": "2025-01-01", "Close": 51.0, "Open": 50.0})),
            HistoryRecord::from(json!({"timestamp": "2025-01-02", "Close": 50.0, "Open": 51.0})),
        ];
        let result = svc.predict_price("AAPL", &history);
        let result = result.as_success().unwrap();

        assert_eq!(result.current_price, 50.0);
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.trend, Trend::Neutral);
    }

    #[test]
    fn test_model_error_keeps_model_type() {
        let svc = service("AAPL", Box::new(FailingPredictor), metadata(1, Some(2.0)));
        let outcome = svc.predict_price("AAPL", &price_history(&[1.0, 2.0]));

        let failure = outcome.as_failure().unwrap();
        assert!(failure.available);
        assert!(failure.error.starts_with("Prediction failed"));
        assert_eq!(failure.model_type.as_deref(), Some("RandomForestRegressor"));
        assert!(failure.required_lags.is_none());
    }

    #[test]
    fn test_non_numeric_feature_reported_with_lags() {
        let svc = service("AAPL", Box::new(FixedPredictor(1.0)), metadata(1, None));
        let history = vec![
            HistoryRecord::from(json!({"timestamp": "2025-01-01", "price": 1.0})),
            HistoryRecord::from(json!({"timestamp": "2025-01-02", "price": 2.0, "Open": "n/a"})),
        ];
        let failure = svc.predict_price("AAPL", &history);
        let failure = failure.as_failure().unwrap();

        assert!(failure.available);
        assert_eq!(failure.required_lags, Some(1));
        assert!(failure.error.contains("Open"));
    }

    #[test]
    fn test_cached_service_reuses_model() {
        let mut models = HashMap::new();
        models.insert(
            "AAPL".to_string(),
            Arc::new(LoadedModel {
                predictor: Box::new(FixedPredictor(100.0)),
                metadata: metadata(1, Some(2.0)),
            }),
        );
        let svc = PricePredictionService::with_cache(
            Arc::new(StaticStore { models }),
            ModelCache::new(),
        );

        assert!(svc.predict_price("AAPL", &price_history(&[1.0, 2.0])).is_available());
        assert!(svc.predict_price("AAPL", &price_history(&[1.0, 2.0])).is_available());
        assert_eq!(svc.cache().map(ModelCache::len), Some(1));
    }
}
