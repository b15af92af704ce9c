//! Pipeline orchestrator — config → data → rolling mean → signals → metrics.
//!
//! Stages run strictly in sequence:
//!
//! ```text
//! Start → ConfigLoaded → DataLoaded → RollingComputed → SignalsGenerated
//!       → MetricsAggregated → Done
//! ```
//!
//! Any failure jumps straight to `Error` and later stages never run. The
//! orchestrator is the single error boundary: every outcome, including a
//! panic inside a computation stage, ends as exactly one `MetricsRecord`.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use serde_json::Value;
use thiserror::Error;

use crate::config::{Config, ConfigError, DEFAULT_VERSION};
use crate::data::{DataError, Dataset, RawTable};
use crate::events::EventLog;
use crate::indicators::{Indicator, Sma};
use crate::metrics::{aggregate, MetricsRecord};
use crate::signals;

/// Supplies raw inputs to the pipeline.
///
/// Implementations own the I/O (files, fixtures). Reading happens inside the
/// corresponding stage so read failures surface as that stage's error.
pub trait PipelineSource {
    fn load_config(&self) -> Result<Value, ConfigError>;
    fn load_rows(&self) -> Result<RawTable, DataError>;
}

/// Inputs already held in memory.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    pub config: Value,
    pub rows: RawTable,
}

impl InMemorySource {
    pub fn new(config: Value, rows: RawTable) -> Self {
        Self { config, rows }
    }
}

impl PipelineSource for InMemorySource {
    fn load_config(&self) -> Result<Value, ConfigError> {
        Ok(self.config.clone())
    }

    fn load_rows(&self) -> Result<RawTable, DataError> {
        Ok(self.rows.clone())
    }
}

/// Orchestrator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Start,
    ConfigLoaded,
    DataLoaded,
    RollingComputed,
    SignalsGenerated,
    MetricsAggregated,
    Done,
    Error,
}

/// Every successful run passes through these states in order.
pub const SUCCESS_PATH: [Stage; 7] = [
    Stage::Start,
    Stage::ConfigLoaded,
    Stage::DataLoaded,
    Stage::RollingComputed,
    Stage::SignalsGenerated,
    Stage::MetricsAggregated,
    Stage::Done,
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("{0}")]
    Internal(String),
}

impl PipelineError {
    /// Prefix used for the error log event.
    pub fn category(&self) -> &'static str {
        match self {
            PipelineError::Config(_) => "Config error",
            PipelineError::Data(_) => "Data error",
            PipelineError::Internal(_) => "Unexpected error",
        }
    }
}

/// Outcome of one pipeline execution.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub record: MetricsRecord,
    /// States visited, ending in `Done` or `Error`.
    pub stages: Vec<Stage>,
    pub error: Option<PipelineError>,
    pub config: Option<Config>,
    pub elapsed: Duration,
}

impl PipelineRun {
    pub fn is_success(&self) -> bool {
        self.record.is_success()
    }

    /// Process completion code: 0 on success, 1 on error.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    pub fn final_stage(&self) -> Stage {
        self.stages.last().copied().unwrap_or(Stage::Start)
    }

    /// The last state reached before failing, if the run failed.
    pub fn failed_after(&self) -> Option<Stage> {
        if self.error.is_none() {
            return None;
        }
        self.stages.iter().rev().nth(1).copied()
    }
}

/// Run the whole pipeline once against `source`, logging into `log`.
pub fn run_pipeline(source: &dyn PipelineSource, log: &mut EventLog) -> PipelineRun {
    let started = Instant::now();
    log.info("Job started");

    let mut stages = vec![Stage::Start];
    let mut config = None;

    match execute(source, log, &mut stages, &mut config, started) {
        Ok(record) => {
            stages.push(Stage::Done);
            PipelineRun {
                record,
                stages,
                error: None,
                config,
                elapsed: started.elapsed(),
            }
        }
        Err(err) => {
            stages.push(Stage::Error);
            log.error(format!("{}: {}", err.category(), err));
            let version = config
                .as_ref()
                .map(|c: &Config| c.version.clone())
                .unwrap_or_else(|| DEFAULT_VERSION.to_string());
            PipelineRun {
                record: MetricsRecord::error(version, err.to_string()),
                stages,
                error: Some(err),
                config,
                elapsed: started.elapsed(),
            }
        }
    }
}

fn execute(
    source: &dyn PipelineSource,
    log: &mut EventLog,
    stages: &mut Vec<Stage>,
    config_slot: &mut Option<Config>,
    started: Instant,
) -> Result<MetricsRecord, PipelineError> {
    let raw_config = source.load_config()?;
    let config = config_slot.insert(Config::load(&raw_config, log)?);
    stages.push(Stage::ConfigLoaded);

    let raw_rows = source.load_rows()?;
    let dataset = Dataset::load(raw_rows, log)?;
    stages.push(Stage::DataLoaded);

    let closes = dataset.closes();
    let sma = Sma::new(config.window);
    let rolling = guarded("rolling mean", || sma.compute(&closes))?;
    ensure_aligned("rolling mean", rolling.len(), closes.len())?;
    log.info(format!("Rolling mean calculated with window={}", sma.window()));
    if sma.lookback() >= closes.len() {
        log.warn(format!(
            "Window {} exceeds {} rows; every signal is hold",
            sma.window(),
            closes.len()
        ));
    }
    stages.push(Stage::RollingComputed);

    let signals = guarded("signal generation", || signals::generate(&closes, &rolling))?;
    ensure_aligned("signals", signals.len(), dataset.len())?;
    log.info("Signals generated");
    stages.push(Stage::SignalsGenerated);

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let record = aggregate(&signals, dataset.len(), config, latency_ms);
    if let MetricsRecord::Success(r) = &record {
        log.info(format!(
            "Metrics: signal_rate={:.4}, rows_processed={}",
            r.value, r.rows_processed
        ));
    }
    stages.push(Stage::MetricsAggregated);

    Ok(record)
}

/// Run a computation stage, converting a panic into an internal error.
fn guarded<T>(stage: &str, f: impl FnOnce() -> T) -> Result<T, PipelineError> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        PipelineError::Internal(format!("{stage} failed: {}", panic_message(&*payload)))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn ensure_aligned(what: &str, actual: usize, expected: usize) -> Result<(), PipelineError> {
    if actual == expected {
        Ok(())
    } else {
        Err(PipelineError::Internal(format!(
            "{what} length {actual} does not match {expected} rows"
        )))
    }
}
