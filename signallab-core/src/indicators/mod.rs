//! Technical indicators.
//!
//! Every indicator implements the single-series `Indicator` trait. The
//! multi-output ones (MACD, Bollinger, ADX, Stochastic) also expose a
//! `latest_value` returning all of their outputs at the final bar, which is
//! what `IndicatorSet::compute` consumes.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod indicator;
pub mod macd;
pub mod rsi;
pub mod set;
pub mod sma;
pub mod stochastic;
pub mod volatility;

pub use adx::{Adx, AdxValue};
pub use atr::Atr;
pub use bollinger::{Bollinger, BollingerValue};
pub use ema::Ema;
pub use indicator::{require_bars, Indicator};
pub use macd::{Macd, MacdValue};
pub use rsi::Rsi;
pub use set::{EmaTriple, IndicatorSet};
pub use sma::Sma;
pub use stochastic::{Stochastic, StochasticValue};
pub use volatility::RealizedVolatility;

/// Create synthetic hourly bars from close prices for testing.
///
/// open = prev_close (or close for the first bar),
/// high = max(open, close) + 1.0, low = min(open, close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::PriceBar> {
    use crate::domain::PriceBar;
    use chrono::TimeZone;
    let base = chrono::Utc
        .with_ymd_and_hms(2024, 1, 2, 0, 0, 0)
        .single()
        .expect("valid base timestamp");
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceBar {
                timestamp: base + chrono::Duration::hours(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Create hourly bars from explicit (open, high, low, close) tuples.
#[cfg(test)]
pub fn make_ohlc_bars(ohlc: &[(f64, f64, f64, f64)]) -> Vec<crate::domain::PriceBar> {
    let mut bars = make_bars(&vec![0.0; ohlc.len()]);
    for (bar, &(open, high, low, close)) in bars.iter_mut().zip(ohlc) {
        bar.open = open;
        bar.high = high;
        bar.low = low;
        bar.close = close;
    }
    bars
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
