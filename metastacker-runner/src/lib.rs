//! MetaStacker Runner — file plumbing around the core pipeline.
//!
//! This crate builds on `metastacker-core` to provide:
//! - YAML config reading
//! - CSV input reading
//! - Metrics JSON and log file writing
//! - `run_job()`, the single entry point used by the CLI

pub mod config_loader;
pub mod data_loader;
pub mod export;
pub mod runner;

pub use config_loader::{parse_config, read_config};
pub use data_loader::{parse_csv, read_csv};
pub use export::{write_log, write_metrics};
pub use runner::{run_job, FileSource, JobOutcome, JobPaths};
