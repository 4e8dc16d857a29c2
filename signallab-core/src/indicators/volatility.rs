//! Realized volatility: sample stddev of log returns over a trailing window.
//!
//! The series is per-bar (not annualized); `annualize` scales it by
//! sqrt(bars per year) for the window's timeframe.
//! Lookback: period (period returns need period + 1 closes).

use super::indicator::{require_bars, Indicator};
use crate::domain::{PriceBar, Timeframe};
use crate::error::SignalError;

#[derive(Debug, Clone)]
pub struct RealizedVolatility {
    period: usize,
    name: String,
}

impl RealizedVolatility {
    pub fn new(period: usize) -> Self {
        assert!(period >= 2, "volatility period must be >= 2");
        Self {
            period,
            name: format!("volatility_{period}"),
        }
    }

    /// Per-bar volatility at the final bar. Non-positive closes cannot
    /// produce log returns and are rejected.
    pub fn latest_checked(&self, bars: &[PriceBar]) -> Result<f64, SignalError> {
        require_bars(&self.name, self.min_bars(), bars.len())?;
        let tail = &bars[bars.len() - self.min_bars()..];
        if let Some(bad) = tail.iter().find(|b| !(b.close > 0.0)) {
            return Err(SignalError::degenerate(format!(
                "{} needs positive closes, found {}",
                self.name, bad.close
            )));
        }
        self.latest(bars)
    }
}

/// Scale per-bar volatility to a yearly figure.
pub fn annualize(per_bar: f64, timeframe: Timeframe) -> f64 {
    per_bar * timeframe.periods_per_year().sqrt()
}

/// Sample standard deviation (n - 1 denominator). Zero for fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    var.sqrt()
}

impl Indicator for RealizedVolatility {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];
        if n < self.period + 1 {
            return result;
        }

        let log_returns: Vec<f64> = std::iter::once(f64::NAN)
            .chain(bars.windows(2).map(|w| {
                if w[0].close > 0.0 && w[1].close > 0.0 {
                    (w[1].close / w[0].close).ln()
                } else {
                    f64::NAN
                }
            }))
            .collect();

        for i in self.period..n {
            let window = &log_returns[(i + 1 - self.period)..=i];
            if window.iter().all(|r| r.is_finite()) {
                result[i] = sample_std_dev(window);
            }
        }

        result
    }
}
