//! Trade Calculator - command-line wrapper around the analysis engine
//!
//! Reads a market snapshot JSON file, runs the calculator and writes the
//! analysis (or the engine's error object) to stdout or a file. Logs go to
//! stderr so stdout stays pure JSON.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use trade_calculator::cli::{self, Cli, EXIT_IO_FAILED};
use trade_calculator::CliConfig;

fn main() -> ExitCode {
    let args = Cli::parse();

    let config = match CliConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: invalid configuration: {e}");
            return ExitCode::from(EXIT_IO_FAILED);
        }
    };

    init_tracing(&config);

    match cli::run(&args, &config, &mut std::io::stdout()) {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_IO_FAILED)
        }
    }
}

fn init_tracing(config: &CliConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}
