//! Stochastic oscillator.
//!
//! %K = 100 * (close - lowest_low) / (highest_high - lowest_low) over `k_period` bars
//! %D = SMA(%K, d_period)
//! A zero high-low range reports %K = 50.
//! Lookback: k_period + d_period - 2.

use serde::{Deserialize, Serialize};

use super::indicator::{require_bars, Indicator};
use super::sma::sma_of_series;
use crate::domain::PriceBar;
use crate::error::SignalError;

#[derive(Debug, Clone)]
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
    name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StochasticValue {
    pub k: f64,
    pub d: f64,
}

impl Stochastic {
    pub fn new(k_period: usize, d_period: usize) -> Self {
        assert!(k_period >= 1 && d_period >= 1, "Stochastic periods must be >= 1");
        Self {
            k_period,
            d_period,
            name: format!("stochastic_{k_period}_{d_period}"),
        }
    }

    pub fn percent_k(&self, bars: &[PriceBar]) -> Vec<f64> {
        let n = bars.len();
        let mut k = vec![f64::NAN; n];
        if n < self.k_period {
            return k;
        }

        for (i, slot) in k.iter_mut().enumerate().skip(self.k_period - 1) {
            let window = &bars[(i + 1 - self.k_period)..=i];
            let highest = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
            let lowest = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
            let close = bars[i].close;
            if !(highest.is_finite() && lowest.is_finite() && close.is_finite()) {
                continue;
            }
            let range = highest - lowest;
            *slot = if range == 0.0 {
                50.0
            } else {
                (100.0 * (close - lowest) / range).clamp(0.0, 100.0)
            };
        }

        k
    }

    pub fn latest_value(&self, bars: &[PriceBar]) -> Result<StochasticValue, SignalError> {
        require_bars(&self.name, self.min_bars(), bars.len())?;
        let k = self.percent_k(bars);
        let d = sma_of_series(&k, self.d_period);
        let last = bars.len() - 1;
        if k[last].is_finite() && d[last].is_finite() {
            Ok(StochasticValue {
                k: k[last],
                d: d[last],
            })
        } else {
            Err(SignalError::degenerate(format!(
                "{} is not finite at the last bar",
                self.name
            )))
        }
    }
}

impl Indicator for Stochastic {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.k_period + self.d_period - 2
    }

    /// The %K series.
    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        self.percent_k(bars)
    }
}
