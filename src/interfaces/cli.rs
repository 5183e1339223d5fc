//! Shared plumbing for the one-shot command-line tools.
//!
//! Every tool prints exactly one JSON document on stdout. Logs go to stderr
//! so callers can parse stdout untouched.

use clap::Parser;
use clap::error::ErrorKind;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::fmt::Display;
use std::process::ExitCode;
use tracing::{Level, error};
use tracing_subscriber::prelude::*;

/// Installs a stderr subscriber; `RUST_LOG` refines the WARN default.
pub fn init_logging() {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false);

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with(stderr_layer)
        .try_init();
}

/// Parses positional arguments, turning usage errors into a JSON error.
pub fn parse_args<A: Parser>(usage: &str) -> Result<A, ExitCode> {
    match A::try_parse() {
        Ok(args) => Ok(args),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            Err(ExitCode::SUCCESS)
        }
        Err(_) => Err(fail(usage)),
    }
}

pub fn parse_json_arg<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_str(raw).map_err(|e| format!("Invalid JSON: {}", e))
}

/// Prints `value` as compact JSON.
pub fn emit<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string(value) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize output: {}", e);
            fail(format!("Unexpected error: {}", e))
        }
    }
}

/// Prints `{"error": message}` and signals failure to the shell.
pub fn fail(message: impl Display) -> ExitCode {
    println!("{}", json!({ "error": message.to_string() }));
    ExitCode::FAILURE
}
