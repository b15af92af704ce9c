//! MetaStacker Core — the signal batch pipeline.
//!
//! This crate contains everything with real logic:
//! - Config and dataset validation gates
//! - Simple moving average over the close series
//! - Close-versus-mean signal generation
//! - Metrics aggregation into the single output record
//! - The pipeline orchestrator and its explicit event log
//!
//! File I/O lives in `metastacker-runner`; the core only sees already-read
//! inputs through `pipeline::PipelineSource`.

pub mod config;
pub mod data;
pub mod domain;
pub mod events;
pub mod indicators;
pub mod metrics;
pub mod pipeline;
pub mod signals;

pub use config::{Config, ConfigError, DEFAULT_VERSION};
pub use data::{DataError, Dataset, RawTable};
pub use domain::{Row, Signal};
pub use events::{EventLog, LogEvent};
pub use indicators::{Indicator, RollingSeries, Sma};
pub use metrics::{aggregate, MetricsRecord, RunStatus, SignalSummary};
pub use pipeline::{run_pipeline, InMemorySource, PipelineError, PipelineRun, PipelineSource, Stage};
pub use signals::{generate, SignalSeries};
