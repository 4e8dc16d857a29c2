//! MACD: Moving Average Convergence/Divergence.
//!
//! line      = EMA(close, fast) - EMA(close, slow), as a full series
//! signal    = EMA(line, signal_period), seeded once the line is defined
//! histogram = line - signal
//!
//! Lookback: slow + signal_period - 2.

use serde::{Deserialize, Serialize};

use super::ema::ema_of_series;
use super::indicator::{require_bars, Indicator};
use crate::domain::PriceBar;
use crate::error::SignalError;

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    name: String,
}

/// Full MACD output series.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// MACD at one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdValue {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast >= 1 && signal >= 1, "MACD periods must be >= 1");
        assert!(slow > fast, "MACD slow period must exceed fast period");
        Self {
            fast,
            slow,
            signal,
            name: format!("macd_{fast}_{slow}_{signal}"),
        }
    }

    pub fn compute_lines(&self, bars: &[PriceBar]) -> MacdSeries {
        let n = bars.len();
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let fast = ema_of_series(&closes, self.fast);
        let slow = ema_of_series(&closes, self.slow);

        let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();

        // The line is NaN until the slow EMA seeds; start the signal EMA there.
        let start = self.slow - 1;
        let mut signal = vec![f64::NAN; n];
        if n > start {
            let tail = ema_of_series(&line[start..], self.signal);
            signal[start..].copy_from_slice(&tail);
        }

        let histogram = line.iter().zip(&signal).map(|(l, s)| l - s).collect();

        MacdSeries {
            line,
            signal,
            histogram,
        }
    }

    pub fn latest_value(&self, bars: &[PriceBar]) -> Result<MacdValue, SignalError> {
        require_bars(&self.name, self.min_bars(), bars.len())?;
        let series = self.compute_lines(bars);
        let last = bars.len() - 1;
        let line = series.line[last];
        let signal = series.signal[last];
        if !(line.is_finite() && signal.is_finite()) {
            return Err(SignalError::degenerate(format!(
                "{} is not finite at the last bar",
                self.name
            )));
        }
        Ok(MacdValue {
            line,
            signal,
            histogram: line - signal,
        })
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.slow + self.signal - 2
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        self.compute_lines(bars).histogram
    }
}
