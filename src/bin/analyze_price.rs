//! Short- and long-term trend from SMA10/SMA50 over a price history.
//!
//! # Usage
//! ```sh
//! analyze_price '[{"timestamp": "2025-10-01", "price": 181.4}, ...]'
//! ```

use clap::Parser;
use std::process::ExitCode;
use tradesignal::application::market_data::analyze_price_history;
use tradesignal::domain::history::HistoryRecord;
use tradesignal::interfaces::cli;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON array of {timestamp, price} records
    history_json: String,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    cli::init_logging();

    let args = match cli::parse_args::<Args>("Please provide history data as a JSON argument.") {
        Ok(args) => args,
        Err(code) => return code,
    };

    let history: Vec<HistoryRecord> = match cli::parse_json_arg(&args.history_json) {
        Ok(history) => history,
        Err(e) => return cli::fail(e),
    };

    match analyze_price_history(&history) {
        Ok(report) => cli::emit(&report),
        Err(e) => cli::fail(e),
    }
}
