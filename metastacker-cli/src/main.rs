//! MetaStacker CLI — run the signal batch job once.
//!
//! Reads a CSV of OHLCV rows and a YAML config, writes the metrics JSON and
//! the run log, prints the metrics to stdout on success, and exits non-zero
//! on failure.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use metastacker_runner::{run_job, JobPaths};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "metastacker",
    about = "MetaStackerBandit — crypto signal generation batch job"
)]
struct Cli {
    /// Path to the input CSV data file.
    #[arg(long)]
    input: PathBuf,

    /// Path to the YAML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Path to the output metrics JSON file.
    #[arg(long)]
    output: PathBuf,

    /// Path to the log output file.
    #[arg(long)]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let outcome = run_job(&JobPaths {
        input: cli.input,
        config: cli.config,
        output: cli.output,
        log_file: cli.log_file,
    })?;

    if outcome.is_success() {
        println!("{}", outcome.record.to_json_pretty()?);
    } else {
        std::process::exit(outcome.exit_code);
    }

    Ok(())
}

/// Console logging on stderr; `RUST_LOG` overrides the default `info` filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
