//! Labels a piece of text as Positive, Negative or Neutral.
//!
//! # Usage
//! ```sh
//! analyze_sentiment "Shares rally after record quarterly earnings"
//! ```

use clap::Parser;
use std::process::ExitCode;
use tradesignal::infrastructure::news::SentimentAnalyzer;
use tradesignal::interfaces::cli;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Headline or article text
    text: String,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    cli::init_logging();

    let args = match cli::parse_args::<Args>("Please provide text as an argument.") {
        Ok(args) => args,
        Err(code) => return code,
    };

    let analyzer = SentimentAnalyzer::new();
    cli::emit(&analyzer.reading(&args.text))
}
