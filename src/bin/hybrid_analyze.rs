//! Buy/Hold/Sell from EMA20/RSI14 combined with news sentiment.
//!
//! # Usage
//! ```sh
//! hybrid_analyze '[{"timestamp": "2025-10-01", "price": 181.4}, ...]' "Apple beats estimates"
//! ```

use clap::Parser;
use std::process::ExitCode;
use tradesignal::application::market_data::HybridAnalyzer;
use tradesignal::domain::history::HistoryRecord;
use tradesignal::interfaces::cli;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON array of {timestamp, price} records
    history_json: String,

    /// News headline or article text
    news_text: String,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    cli::init_logging();

    let args = match cli::parse_args::<Args>("Please provide price history JSON and news text") {
        Ok(args) => args,
        Err(code) => return code,
    };

    let history: Vec<HistoryRecord> = match cli::parse_json_arg(&args.history_json) {
        Ok(history) => history,
        Err(e) => return cli::fail(e),
    };

    let analyzer = HybridAnalyzer::default();
    cli::emit(&analyzer.analyze(&history, &args.news_text))
}
