//! Rolling statistics over the close series.
//!
//! An indicator is a pure function: close series in, a series of the same
//! length out. Positions inside the warm-up window have no value and are
//! `None`, never a numeric sentinel, so "no data" stays distinct from
//! "data, but not greater" downstream.

pub mod sma;

pub use sma::Sma;

/// Per-row rolling value, `None` during warm-up.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RollingSeries {
    values: Vec<Option<f64>>,
}

impl RollingSeries {
    pub fn new(values: Vec<Option<f64>>) -> Self {
        Self { values }
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of positions with a value.
    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn as_slice(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.values.iter().copied()
    }
}

/// A rolling statistic over a close series.
///
/// # Look-ahead guard
/// The value at index `t` may only depend on `closes[..=t]`.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20").
    fn name(&self) -> &str;

    /// Number of leading positions without a value.
    fn lookback(&self) -> usize;

    /// Compute the indicator over the whole series.
    fn compute(&self, closes: &[f64]) -> RollingSeries;
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
