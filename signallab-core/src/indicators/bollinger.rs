//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! - Middle: SMA(close, period)
//! - Upper: middle + k * stddev(close, period)
//! - Lower: middle - k * stddev(close, period)
//! - Width: (upper - lower) / middle
//! - %B: 100 * (close - lower) / (upper - lower)
//!
//! Uses population stddev (divide by N).
//! Lookback: period - 1.
//! Zero-width bands report %B = 50 and width = 0 instead of NaN.

use serde::{Deserialize, Serialize};

use super::indicator::{require_bars, Indicator};
use crate::domain::PriceBar;
use crate::error::SignalError;

/// %B reported when the bands have collapsed onto the middle.
pub const DEGENERATE_PERCENT_B: f64 = 50.0;

/// The series output is the middle band; `latest_value` reports every band.
#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    name: String,
}

/// Bands at one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerValue {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub width: f64,
    /// Position of the close within the bands, in percent (0 = lower, 100 = upper).
    pub percent_b: f64,
}

impl Bollinger {
    pub fn new(period: usize, multiplier: f64) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        Self {
            period,
            multiplier,
            name: format!("bollinger_{period}_{multiplier}"),
        }
    }

    /// Mean and population stddev of the closes ending at `end` (inclusive).
    fn stats_at(&self, bars: &[PriceBar], end: usize) -> Option<(f64, f64)> {
        let window = &bars[(end + 1 - self.period)..=end];
        if window.iter().any(|b| b.close.is_nan()) {
            return None;
        }
        let p = self.period as f64;
        let mean = window.iter().map(|b| b.close).sum::<f64>() / p;
        let variance = window
            .iter()
            .map(|b| {
                let diff = b.close - mean;
                diff * diff
            })
            .sum::<f64>()
            / p;
        Some((mean, variance.sqrt()))
    }

    /// All band outputs at the final bar.
    pub fn latest_value(&self, bars: &[PriceBar]) -> Result<BollingerValue, SignalError> {
        require_bars(&self.name, self.min_bars(), bars.len())?;
        let last = bars.len() - 1;
        let (middle, stddev) = self.stats_at(bars, last).ok_or_else(|| {
            SignalError::degenerate(format!("{} window contains NaN", self.name))
        })?;

        let upper = middle + self.multiplier * stddev;
        let lower = middle - self.multiplier * stddev;
        let band_range = upper - lower;

        let width = if middle == 0.0 { 0.0 } else { band_range / middle };
        let percent_b = if band_range == 0.0 {
            DEGENERATE_PERCENT_B
        } else {
            100.0 * (bars[last].close - lower) / band_range
        };

        Ok(BollingerValue {
            upper,
            middle,
            lower,
            width,
            percent_b,
        })
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        for (i, slot) in result.iter_mut().enumerate().skip(self.period - 1) {
            if let Some((mean, _)) = self.stats_at(bars, i) {
                *slot = mean;
            }
        }

        result
    }
}
