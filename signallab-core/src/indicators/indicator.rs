//! Indicator trait and the shared failure policy.
//!
//! Indicators are pure functions: bar history in, numeric series out. The
//! series form keeps `NaN` during warmup; the `latest` form is what the
//! engine consumes and refuses to fabricate a value when history is short.

use crate::domain::PriceBar;
use crate::error::SignalError;

/// Trait for single-series indicators.
///
/// # Look-ahead contamination guard
/// No value at bar t may depend on bars after t. Computing over a truncated
/// window must reproduce the prefix of the full-window series.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "rsi_14", "atr_14").
    fn name(&self) -> &str;

    /// Index of the first bar that can carry a valid value.
    fn lookback(&self) -> usize;

    /// Minimum window length for a valid latest value.
    fn min_bars(&self) -> usize {
        self.lookback() + 1
    }

    /// Compute the indicator for the entire bar series.
    ///
    /// Returns a `Vec<f64>` of the same length as `bars`; warmup values are
    /// `f64::NAN`.
    fn compute(&self, bars: &[PriceBar]) -> Vec<f64>;

    /// Value at the final bar.
    fn latest(&self, bars: &[PriceBar]) -> Result<f64, SignalError> {
        require_bars(self.name(), self.min_bars(), bars.len())?;
        finite_last(self.name(), &self.compute(bars))
    }
}

/// Fail with `InsufficientData` unless `available >= required`.
pub fn require_bars(name: &str, required: usize, available: usize) -> Result<(), SignalError> {
    if available < required {
        Err(SignalError::insufficient(name, required, available))
    } else {
        Ok(())
    }
}

/// Last element of a series, rejecting NaN and infinities.
pub(crate) fn finite_last(name: &str, series: &[f64]) -> Result<f64, SignalError> {
    match series.last() {
        Some(v) if v.is_finite() => Ok(*v),
        Some(_) => Err(SignalError::degenerate(format!(
            "{name} is not finite at the last bar"
        ))),
        None => Err(SignalError::insufficient(name, 1, 0)),
    }
}
