//! Forecasts the next price of a symbol with its trained random forest.
//!
//! # Usage
//! ```sh
//! predict_price AAPL '[{"timestamp": "2025-12-01", "price": 191.2}, ...]'
//! ```
//!
//! # Environment Variables
//! - `AI_MODELS_DIR` - Directory holding `{SYMBOL}_model.json` / `{SYMBOL}_metadata.json` (default: ai_models)
//! - `PREDICTION_CACHE_ENABLED` - Keep loaded models in memory (default: true)
//! - `RUST_LOG` - Log filter, logs are written to stderr

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tradesignal::application::ml::{ModelCache, PricePredictionService};
use tradesignal::config::Config;
use tradesignal::domain::history::HistoryRecord;
use tradesignal::infrastructure::model_store::FileModelStore;
use tradesignal::interfaces::cli;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ticker symbol, case-insensitive
    symbol: String,

    /// JSON array of history records, oldest first
    history_json: String,

    /// Overrides AI_MODELS_DIR
    #[arg(long)]
    models_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    cli::init_logging();

    let args = match cli::parse_args::<Args>("Usage: predict_price <symbol> <history_json>") {
        Ok(args) => args,
        Err(code) => return code,
    };

    let config = match Config::from_env() {
        Ok(config) => config.with_models_dir(args.models_dir),
        Err(e) => return cli::fail(format!("Unexpected error: {:#}", e)),
    };

    let history: Vec<HistoryRecord> = match cli::parse_json_arg(&args.history_json) {
        Ok(history) => history,
        Err(e) => return cli::fail(e),
    };

    let symbol = args.symbol.trim().to_uppercase();
    info!(
        "Predicting {} from {} records using models in {:?}",
        symbol,
        history.len(),
        config.models_dir
    );

    let store = Arc::new(FileModelStore::new(config.models_dir));
    let service = if config.cache_enabled {
        PricePredictionService::with_cache(store, ModelCache::new())
    } else {
        PricePredictionService::new(store)
    };
    cli::emit(&service.predict_price(&symbol, &history))
}
