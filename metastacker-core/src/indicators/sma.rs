//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a trailing window.
//! Lookback: window - 1 (first value at index window-1).

use std::num::NonZeroUsize;

use super::{Indicator, RollingSeries};

#[derive(Debug, Clone)]
pub struct Sma {
    window: NonZeroUsize,
    name: String,
}

impl Sma {
    pub fn new(window: NonZeroUsize) -> Self {
        Self {
            window,
            name: format!("sma_{window}"),
        }
    }

    pub fn window(&self) -> usize {
        self.window.get()
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window.get() - 1
    }

    /// Each window is summed afresh, with no running add/subtract between
    /// positions: value `i` is `mean(closes[i-window+1..=i])`.
    /// A window of identical closes yields that close exactly.
    fn compute(&self, closes: &[f64]) -> RollingSeries {
        let window = self.window.get();
        let mut values = vec![None; closes.len()];

        if closes.len() < window {
            return RollingSeries::new(values);
        }

        for (offset, slice) in closes.windows(window).enumerate() {
            values[offset + window - 1] = Some(window_mean(slice));
        }

        RollingSeries::new(values)
    }
}

fn window_mean(slice: &[f64]) -> f64 {
    match slice.split_first() {
        Some((&first, rest)) if rest.iter().all(|&v| v == first) => first,
        _ => compensated_sum(slice) / slice.len() as f64,
    }
}

/// Neumaier summation: carries the low-order bits lost by each addition.
fn compensated_sum(values: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut compensation = 0.0_f64;
    for &v in values {
        let t = sum + v;
        if sum.abs() >= v.abs() {
            compensation += (sum - t) + v;
        } else {
            compensation += (v - t) + sum;
        }
        sum = t;
    }
    sum + compensation
}
