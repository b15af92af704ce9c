//! Signal generation — close versus rolling mean.
//!
//! Signals depend only on the close series and its rolling mean. They are
//! deterministic: the configured seed plays no part here.

use crate::domain::Signal;
use crate::indicators::RollingSeries;

/// Per-row signals, aligned with the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignalSeries {
    signals: Vec<Signal>,
}

impl SignalSeries {
    pub fn new(signals: Vec<Signal>) -> Self {
        Self { signals }
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn buy_count(&self) -> usize {
        self.signals.iter().filter(|s| s.is_buy()).count()
    }

    pub fn as_slice(&self) -> &[Signal] {
        &self.signals
    }

    pub fn iter(&self) -> impl Iterator<Item = Signal> + '_ {
        self.signals.iter().copied()
    }
}

/// Emit `Buy` where the close is strictly above a defined rolling mean,
/// `Hold` everywhere else (ties and warm-up included).
///
/// The output has one entry per close. A rolling series shorter than the
/// closes is treated as warm-up for the missing tail; the orchestrator checks
/// alignment before calling, so that case never arises in a run.
pub fn generate(closes: &[f64], rolling: &RollingSeries) -> SignalSeries {
    let signals = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Signal::from_comparison(close, rolling.get(i)))
        .collect();
    SignalSeries::new(signals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{Indicator, Sma};
    use std::num::NonZeroUsize;

    fn sma(window: usize) -> Sma {
        Sma::new(NonZeroUsize::new(window).unwrap())
    }

    #[test]
    fn rising_series_buys_after_warmup() {
        let closes: Vec<f64> = (1..=10).map(f64::from).collect();
        let rolling = sma(5).compute(&closes);
        let signals = generate(&closes, &rolling);

        assert_eq!(signals.len(), 10);
        assert!(signals.as_slice()[..4].iter().all(|s| *s == Signal::Hold));
        assert!(signals.as_slice()[4..].iter().all(|s| *s == Signal::Buy));
        assert_eq!(signals.buy_count(), 6);
    }

    #[test]
    fn window_one_never_buys() {
        let closes = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let signals = generate(&closes, &sma(1).compute(&closes));
        assert_eq!(signals.buy_count(), 0);
    }

    #[test]
    fn falling_series_holds() {
        let closes = [10.0, 9.0, 8.0, 7.0, 6.0];
        let signals = generate(&closes, &sma(2).compute(&closes));
        assert_eq!(signals.buy_count(), 0);
    }

    #[test]
    fn ties_resolve_to_hold() {
        let closes = [2.0, 4.0, 3.0];
        let rolling = RollingSeries::new(vec![None, Some(4.0), Some(3.0)]);
        let signals = generate(&closes, &rolling);
        assert_eq!(signals.as_slice(), &[Signal::Hold, Signal::Hold, Signal::Hold]);
    }

    #[test]
    fn all_warmup_holds() {
        let closes = [1.0, 100.0, 1_000.0];
        let signals = generate(&closes, &sma(10).compute(&closes));
        assert_eq!(signals.len(), 3);
        assert_eq!(signals.buy_count(), 0);
    }

    #[test]
    fn short_rolling_series_holds_the_tail() {
        let closes = [1.0, 5.0, 9.0];
        let rolling = RollingSeries::new(vec![Some(0.0)]);
        let signals = generate(&closes, &rolling);
        assert_eq!(signals.as_slice(), &[Signal::Buy, Signal::Hold, Signal::Hold]);
    }
}
