//! Job runner — wires file inputs, the core pipeline, and artifact output.
//!
//! `run_job()` always tries to leave exactly one metrics record at the output
//! path, success or error, and then flushes the event log to the log file.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use metastacker_core::{
    run_pipeline, ConfigError, DataError, EventLog, MetricsRecord, PipelineSource, RawTable,
};
use serde_json::Value;

use crate::config_loader::read_config;
use crate::data_loader::read_csv;
use crate::export::{write_log, write_metrics};

/// Pipeline source backed by a YAML config file and a CSV input file.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub config_path: PathBuf,
    pub input_path: PathBuf,
}

impl FileSource {
    pub fn new(config_path: impl Into<PathBuf>, input_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            input_path: input_path.into(),
        }
    }
}

impl PipelineSource for FileSource {
    fn load_config(&self) -> Result<Value, ConfigError> {
        read_config(&self.config_path)
    }

    fn load_rows(&self) -> Result<RawTable, DataError> {
        read_csv(&self.input_path)
    }
}

/// The four paths a job touches.
#[derive(Debug, Clone)]
pub struct JobPaths {
    pub input: PathBuf,
    pub config: PathBuf,
    pub output: PathBuf,
    pub log_file: PathBuf,
}

/// What a finished job produced.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    /// The record written to the output path.
    pub record: MetricsRecord,
    /// 0 on success, 1 on error.
    pub exit_code: i32,
    pub log: EventLog,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run one job end to end.
///
/// Only a failure to write the log file is returned as `Err`; every pipeline
/// or output failure is reported through the record and exit code.
pub fn run_job(paths: &JobPaths) -> Result<JobOutcome> {
    let started = Instant::now();
    let mut log = EventLog::new();
    let source = FileSource::new(&paths.config, &paths.input);

    let run = run_pipeline(&source, &mut log);
    let record = if run.is_success() {
        finish_success(run.record, &paths.output, &mut log, started)
    } else {
        write_error_record(run.record, &paths.output, &mut log)
    };
    if !record.is_success() {
        log.error(format!("Job failed in {}ms", started.elapsed().as_millis()));
    }

    write_log(&log, &paths.log_file)?;

    let exit_code = if record.is_success() { 0 } else { 1 };
    Ok(JobOutcome {
        record,
        exit_code,
        log,
    })
}

fn finish_success(
    record: MetricsRecord,
    output: &Path,
    log: &mut EventLog,
    started: Instant,
) -> MetricsRecord {
    match write_metrics(&record, output) {
        Ok(()) => {
            log.info(format!("Metrics written to {}", output.display()));
            log.info(format!(
                "Job completed successfully in {}ms",
                started.elapsed().as_millis()
            ));
            record
        }
        Err(err) => {
            let message = format!("{err:#}");
            log.error(format!("Unexpected error: {message}"));
            let error_record = MetricsRecord::error(record.version(), message);
            write_error_record(error_record, output, log)
        }
    }
}

fn write_error_record(record: MetricsRecord, output: &Path, log: &mut EventLog) -> MetricsRecord {
    if let Err(err) = write_metrics(&record, output) {
        log.error(format!("Failed to write error record: {err:#}"));
    }
    record
}
