//! Command-line surface: argument parsing and file I/O around the calculator

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::info;

use crate::calculator::{AnalysisOutcome, TradingCalculator};
use crate::config::CliConfig;

/// Input could not be read or output could not be written
pub const EXIT_IO_FAILED: u8 = 1;
/// Engine returned an error object
pub const EXIT_ANALYSIS_FAILED: u8 = 2;

/// Rule-based trading analysis for one market snapshot
#[derive(Debug, Parser)]
#[command(name = "trade-calculator", version)]
pub struct Cli {
    /// Input JSON file with market data
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Write the analysis to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pub pretty: bool,
}

/// How a run ended when no I/O error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    /// The error object was still emitted
    AnalysisFailed,
}

impl RunStatus {
    pub fn exit_code(&self) -> u8 {
        match self {
            RunStatus::Completed => 0,
            RunStatus::AnalysisFailed => EXIT_ANALYSIS_FAILED,
        }
    }
}

/// Load the input, analyze it and emit the JSON to `out` or `--output`
pub fn run(args: &Cli, config: &CliConfig, out: &mut impl Write) -> Result<RunStatus> {
    info!("Loading market data from {}", args.input.display());
    let raw = load_input(&args.input)?;

    let outcome = TradingCalculator::new().analyze(&raw);
    let json = render(&outcome, args.pretty || config.pretty)?;

    match &args.output {
        Some(path) => {
            write_output(path, &json)?;
            writeln!(out, "Analysis saved to {}", path.display())?;
        }
        None => writeln!(out, "{}", json)?,
    }

    Ok(if outcome.is_complete() {
        RunStatus::Completed
    } else {
        RunStatus::AnalysisFailed
    })
}

/// Read and parse the snapshot file
pub fn load_input(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Input file {} is not valid JSON", path.display()))
}

pub fn render(outcome: &AnalysisOutcome, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(outcome)?
    } else {
        serde_json::to_string(outcome)?
    };
    Ok(json)
}

pub fn write_output(path: &Path, json: &str) -> Result<()> {
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::ErrorReport;
    use serde_json::json;

    fn args(input: PathBuf, output: Option<PathBuf>) -> Cli {
        Cli {
            input,
            output,
            pretty: false,
        }
    }

    fn write_snapshot(dir: &Path, value: &Value) -> PathBuf {
        let path = dir.join("snapshot.json");
        fs::write(&path, value.to_string()).unwrap();
        path
    }

    fn valid_snapshot() -> Value {
        json!({
            "symbol": "NVDA",
            "previous_day": {"high": 165.2, "low": 161.8, "close": 163.87, "change": -0.42},
            "current_day": {"high": 172.81, "low": 169.91, "current_price": 171.89, "change": 8.02}
        })
    }

    #[test]
    fn test_parses_short_flags() {
        let cli = Cli::try_parse_from(["trade-calculator", "-i", "in.json", "-o", "out.json", "-p"])
            .unwrap();
        assert_eq!(cli.input, PathBuf::from("in.json"));
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));
        assert!(cli.pretty);
    }

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["trade-calculator", "--pretty"]).is_err());
    }

    #[test]
    fn test_load_input_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(load_input(&missing).is_err());

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{\"symbol\": ").unwrap();
        let err = load_input(&broken).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_render_and_write() {
        let outcome = AnalysisOutcome::Failed(ErrorReport {
            error: true,
            error_message: "Missing required field: symbol".to_string(),
            analysis_timestamp: "2025-07-14T13:30:00.000000Z".to_string(),
            symbol: "UNKNOWN".to_string(),
        });

        let compact = render(&outcome, false).unwrap();
        assert!(!compact.contains('\n'));
        assert!(render(&outcome, true).unwrap().contains("\n  \"error\": true"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.json");
        write_output(&path, &compact).unwrap();
        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["symbol"], "UNKNOWN");
    }

    #[test]
    fn test_run_completed_prints_json() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_snapshot(dir.path(), &valid_snapshot());
        let mut out = Vec::new();

        let status = run(&args(input, None), &CliConfig::default(), &mut out).unwrap();
        assert_eq!(status, RunStatus::Completed);
        assert_eq!(status.exit_code(), 0);

        let printed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed["symbol"], "NVDA");
        assert!(printed.get("trading_signals").is_some());
    }

    #[test]
    fn test_run_missing_symbol_emits_error_object() {
        let dir = tempfile::tempdir().unwrap();
        let mut snapshot = valid_snapshot();
        snapshot.as_object_mut().unwrap().remove("symbol");
        let input = write_snapshot(dir.path(), &snapshot);
        let output = dir.path().join("analysis.json");
        let mut out = Vec::new();

        let status = run(&args(input, Some(output.clone())), &CliConfig::default(), &mut out)
            .unwrap();
        assert_eq!(status, RunStatus::AnalysisFailed);
        assert_eq!(status.exit_code(), EXIT_ANALYSIS_FAILED);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("Analysis saved to {}\n", output.display())
        );

        let written = load_input(&output).unwrap();
        assert_eq!(written["error"], true);
        assert_eq!(written["symbol"], "UNKNOWN");
        assert_eq!(written["error_message"], "Missing required field: symbol");
    }

    #[test]
    fn test_run_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();

        let result = run(
            &args(dir.path().join("nope.json"), None),
            &CliConfig::default(),
            &mut out,
        );
        assert!(result.is_err());
        assert!(out.is_empty());
    }
}
