//! Compares realised prices with forecasts (MAE, RMSE, MAPE, direction accuracy).
//!
//! # Usage
//! ```sh
//! evaluate '[101.2, 102.5, 99.8]' '[100.9, 103.0, 100.4]'
//! ```

use clap::Parser;
use serde_json::json;
use std::process::ExitCode;
use tradesignal::domain::performance::evaluation::calculate_all_metrics;
use tradesignal::interfaces::cli;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON array of actual values
    actual_json: String,

    /// JSON array of predicted values
    predicted_json: String,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    cli::init_logging();

    let args = match cli::parse_args::<Args>(
        "Please provide actual and predicted arrays as JSON arguments.",
    ) {
        Ok(args) => args,
        Err(code) => return code,
    };

    let actual: Vec<f64> = match cli::parse_json_arg(&args.actual_json) {
        Ok(values) => values,
        Err(e) => return cli::fail(e),
    };
    let predicted: Vec<f64> = match cli::parse_json_arg(&args.predicted_json) {
        Ok(values) => values,
        Err(e) => return cli::fail(e),
    };

    match calculate_all_metrics(&actual, &predicted) {
        Ok(report) => cli::emit(&report),
        Err(e) => cli::emit(&json!({ "error": e.to_string() })),
    }
}
