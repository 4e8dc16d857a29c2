//! Look-ahead contamination tests for every indicator.
//!
//! No indicator value at bar t may depend on price data from bar t+1 or later.
//!
//! Method: compute on a truncated series (bars 0..100) and the full series
//! (bars 0..200). Bars 0..100 must be identical between both runs.

use chrono::{Duration, TimeZone, Utc};
use signallab_core::indicators::*;
use signallab_core::PriceBar;

/// Deterministic pseudo-random walk driven by a simple LCG.
fn make_test_bars(n: usize) -> Vec<PriceBar> {
    let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0;

    for i in 0..n {
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
        let change = ((seed % 200) as f64 - 100.0) * 0.05;
        price = (price + change).max(10.0);

        let open = price - 0.5;
        let close = price + 0.3;
        bars.push(PriceBar {
            timestamp: base + Duration::hours(i as i64),
            open,
            high: open.max(close) + 2.0,
            low: open.min(close) - 2.0,
            close,
            volume: 1000.0 + i as f64 * 100.0,
        });
    }

    bars
}

fn assert_no_lookahead(indicator: &dyn Indicator, full_bars: &[PriceBar], truncated_len: usize) {
    let full = indicator.compute(full_bars);
    let truncated = indicator.compute(&full_bars[..truncated_len]);
    assert_eq!(truncated.len(), truncated_len, "{}: length mismatch", indicator.name());
    assert_eq!(full.len(), full_bars.len(), "{}: length mismatch", indicator.name());

    for i in 0..truncated_len {
        let (t, f) = (truncated[i], full[i]);
        if t.is_nan() && f.is_nan() {
            continue;
        }
        assert!(
            (t - f).abs() < 1e-10,
            "{}: look-ahead contamination at bar {i}: truncated={t}, full={f}",
            indicator.name()
        );
    }
}

#[test]
fn lookahead_moving_averages() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Sma::new(20), &bars, 100);
    assert_no_lookahead(&Ema::new(9), &bars, 100);
    assert_no_lookahead(&Ema::new(50), &bars, 100);
}

#[test]
fn lookahead_rsi() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Rsi::new(14), &bars, 100);
    assert_no_lookahead(&Rsi::new(7), &bars, 100);
}

#[test]
fn lookahead_macd() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Macd::new(12, 26, 9), &bars, 100);
}

#[test]
fn lookahead_bollinger() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Bollinger::new(20, 2.0), &bars, 100);
}

#[test]
fn lookahead_adx_and_atr() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Adx::new(14), &bars, 100);
    assert_no_lookahead(&Atr::new(14), &bars, 100);
}

#[test]
fn lookahead_stochastic_and_volatility() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Stochastic::new(14, 3), &bars, 100);
    assert_no_lookahead(&RealizedVolatility::new(20), &bars, 100);
}

#[test]
fn latest_matches_full_series_tail() {
    let bars = make_test_bars(120);
    let rsi = Rsi::new(14);
    let series = rsi.compute(&bars);
    assert_eq!(rsi.latest(&bars).unwrap(), series[119]);
    assert_eq!(rsi.latest(&bars[..80]).unwrap(), series[79]);
}
