//! `bigboat` command-line entry point.
//!
//! Composition root: parses arguments, installs the `tracing` subscriber,
//! builds a [`dashboard::Client`] through the `client` crate and runs one
//! subcommand.
//!
//! Exit codes: `0` on success, `2` when the selected API generation does not
//! offer the operation, `1` for every other failure.

use std::process::ExitCode;

use clap::Parser;
use dashboard::DashboardError;
use tracing_subscriber::EnvFilter;

mod cli;
mod output;

use cli::Cli;

/// Selects JSON log lines instead of the human-readable format.
const ENV_LOG_FORMAT: &str = "BIGBOAT_LOG_FORMAT";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            exit_code(&err)
        }
    }
}

/// Logs go to stderr so that stdout stays parseable with `--json`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let json = std::env::var(ENV_LOG_FORMAT).is_ok_and(|format| format.eq_ignore_ascii_case("json"));
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    let unsupported = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<DashboardError>())
        .any(DashboardError::is_unsupported);
    if unsupported {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}
