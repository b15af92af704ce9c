//! Metrics record — the single artifact of a run.
//!
//! A run ends in exactly one `MetricsRecord`: a success record carrying the
//! signal rate, or an error record carrying the failure message. Field order
//! in the serialized JSON follows the struct declarations.

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::config::Config;
use crate::signals::SignalSeries;

/// Name of the only metric this job reports.
pub const SIGNAL_RATE_METRIC: &str = "signal_rate";

/// Decimal places used when reporting `value`.
pub const REPORT_DECIMALS: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessRecord {
    pub version: String,
    pub rows_processed: usize,
    pub metric: String,
    pub value: f64,
    pub latency_ms: u64,
    pub seed: Number,
    pub status: RunStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub version: String,
    pub status: RunStatus,
    pub error_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricsRecord {
    Success(SuccessRecord),
    Error(ErrorRecord),
}

impl MetricsRecord {
    pub fn error(version: impl Into<String>, message: impl Into<String>) -> Self {
        MetricsRecord::Error(ErrorRecord {
            version: version.into(),
            status: RunStatus::Error,
            error_message: message.into(),
        })
    }

    pub fn status(&self) -> RunStatus {
        match self {
            MetricsRecord::Success(r) => r.status,
            MetricsRecord::Error(r) => r.status,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MetricsRecord::Success(_))
    }

    pub fn version(&self) -> &str {
        match self {
            MetricsRecord::Success(r) => &r.version,
            MetricsRecord::Error(r) => &r.version,
        }
    }

    /// Pretty JSON with two-space indentation.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Unrounded signal statistics for a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalSummary {
    pub buy_count: usize,
    pub rows: usize,
    /// `buy_count / rows` at full double precision.
    pub rate: f64,
}

impl SignalSummary {
    pub fn from_signals(signals: &SignalSeries, rows_processed: usize) -> Self {
        let buy_count = signals.buy_count();
        let rate = if rows_processed == 0 {
            0.0
        } else {
            buy_count as f64 / rows_processed as f64
        };
        Self {
            buy_count,
            rows: rows_processed,
            rate,
        }
    }
}

/// Reduce a signal series and run metadata into the success record.
///
/// `value` is the signal rate rounded to `REPORT_DECIMALS` places; use
/// `SignalSummary` when the unrounded rate is needed.
pub fn aggregate(
    signals: &SignalSeries,
    rows_processed: usize,
    config: &Config,
    latency_ms: u64,
) -> MetricsRecord {
    let summary = SignalSummary::from_signals(signals, rows_processed);
    MetricsRecord::Success(SuccessRecord {
        version: config.version.clone(),
        rows_processed,
        metric: SIGNAL_RATE_METRIC.to_string(),
        value: round_to(summary.rate, REPORT_DECIMALS),
        latency_ms,
        seed: config.seed.clone(),
        status: RunStatus::Success,
    })
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
