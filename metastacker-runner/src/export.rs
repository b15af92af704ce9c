//! Artifact writing — the metrics JSON and the rendered log file.

use std::path::Path;

use anyhow::{Context, Result};
use metastacker_core::{EventLog, MetricsRecord};
use tracing::Level;

/// Write the metrics record as pretty JSON, replacing any existing file.
pub fn write_metrics(record: &MetricsRecord, path: &Path) -> Result<()> {
    let json = record
        .to_json_pretty()
        .context("failed to serialize metrics record to JSON")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write metrics to {}", path.display()))
}

/// Write every event at INFO or more severe, replacing any existing file.
pub fn write_log(log: &EventLog, path: &Path) -> Result<()> {
    std::fs::write(path, log.render(Level::INFO))
        .with_context(|| format!("failed to write log file {}", path.display()))
}
