//! Per-row trading signal.

use serde::{Deserialize, Serialize};

/// Categorical signal for one row.
///
/// `Hold` is the conservative default: rows without a rolling mean never
/// produce `Buy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Hold,
}

impl Signal {
    /// `Buy` iff a rolling mean exists and the close is strictly above it.
    pub fn from_comparison(close: f64, rolling_mean: Option<f64>) -> Self {
        match rolling_mean {
            Some(mean) if close > mean => Signal::Buy,
            _ => Signal::Hold,
        }
    }

    pub fn is_buy(self) -> bool {
        self == Signal::Buy
    }
}
