//! ADX: Average Directional Index with +DI / -DI (Wilder).
//!
//! Steps:
//! 1. Compute +DM and -DM from consecutive bars
//! 2. Smooth +DM, -DM, and TR using Wilder smoothing
//! 3. +DI = 100 * smoothed(+DM) / smoothed(TR)
//! 4. -DI = 100 * smoothed(-DM) / smoothed(TR)
//! 5. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 6. ADX = Wilder-smoothed DX
//!
//! Lookback: 2 * period - 1 (DI valid from `period`, ADX seeds over `period` DX values).
//! Zero true range gives DI = 0 and DX = 0 rather than a division by zero.

use serde::{Deserialize, Serialize};

use super::atr::{true_range, wilder_smooth};
use super::indicator::{require_bars, Indicator};
use crate::domain::PriceBar;
use crate::error::SignalError;

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    name: String,
}

/// Full ADX output series.
#[derive(Debug, Clone)]
pub struct DirectionalSeries {
    pub adx: Vec<f64>,
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
}

/// ADX and directional indicators at one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdxValue {
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
}

impl Adx {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        Self {
            period,
            name: format!("adx_{period}"),
        }
    }

    pub fn compute_directional(&self, bars: &[PriceBar]) -> DirectionalSeries {
        let n = bars.len();
        let mut plus_dm = vec![f64::NAN; n];
        let mut minus_dm = vec![f64::NAN; n];

        for i in 1..n {
            let up_move = bars[i].high - bars[i - 1].high;
            let down_move = bars[i - 1].low - bars[i].low;
            if up_move.is_nan() || down_move.is_nan() {
                continue;
            }
            plus_dm[i] = if up_move > down_move && up_move > 0.0 {
                up_move
            } else {
                0.0
            };
            minus_dm[i] = if down_move > up_move && down_move > 0.0 {
                down_move
            } else {
                0.0
            };
        }

        let smooth_tr = wilder_smooth(&true_range(bars), self.period);
        let smooth_plus = wilder_smooth(&plus_dm, self.period);
        let smooth_minus = wilder_smooth(&minus_dm, self.period);

        let mut plus_di = vec![f64::NAN; n];
        let mut minus_di = vec![f64::NAN; n];
        let mut dx = vec![f64::NAN; n];

        for i in 0..n {
            let (tr, p, m) = (smooth_tr[i], smooth_plus[i], smooth_minus[i]);
            if tr.is_nan() || p.is_nan() || m.is_nan() {
                continue;
            }
            if tr == 0.0 {
                plus_di[i] = 0.0;
                minus_di[i] = 0.0;
                dx[i] = 0.0;
                continue;
            }
            plus_di[i] = 100.0 * p / tr;
            minus_di[i] = 100.0 * m / tr;
            let di_sum = plus_di[i] + minus_di[i];
            dx[i] = if di_sum == 0.0 {
                0.0
            } else {
                100.0 * (plus_di[i] - minus_di[i]).abs() / di_sum
            };
        }

        DirectionalSeries {
            adx: wilder_smooth(&dx, self.period),
            plus_di,
            minus_di,
        }
    }

    /// ADX, +DI and -DI at the final bar.
    pub fn latest_value(&self, bars: &[PriceBar]) -> Result<AdxValue, SignalError> {
        require_bars(&self.name, self.min_bars(), bars.len())?;
        let series = self.compute_directional(bars);
        let last = bars.len() - 1;
        let value = AdxValue {
            adx: series.adx[last],
            plus_di: series.plus_di[last],
            minus_di: series.minus_di[last],
        };
        if value.adx.is_finite() && value.plus_di.is_finite() && value.minus_di.is_finite() {
            Ok(value)
        } else {
            Err(SignalError::degenerate(format!(
                "{} is not finite at the last bar",
                self.name
            )))
        }
    }
}

impl Indicator for Adx {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        2 * self.period - 1
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        self.compute_directional(bars).adx
    }
}
