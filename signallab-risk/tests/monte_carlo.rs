//! Integration tests for the Monte Carlo simulator.
//!
//! Tests:
//! 1. Same seed, same inputs → identical report (parallel and sequential)
//! 2. Different seeds → different reports
//! 3. Law of large numbers: 10 000 iterations narrow the spread of
//!    expected-return estimates compared with 100
//! 4. Report bounds: win probability, VaR vs barriers, drawdown vs stop
//! 5. A real engine signal flows straight into the simulator

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use signallab_core::{Direction, IndicatorSet, PriceBar, PriceWindow, Signal, SignalEngine, Timeframe};
use signallab_risk::{MonteCarloSimulator, RiskError, SimulationConfig};

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

/// A LONG signal on a 1%-per-bar uptrend with RSI pinned oversold.
fn long_signal() -> Signal {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let bars: Vec<PriceBar> = (0..60)
        .map(|i| {
            let close = 100.0 * 1.01_f64.powi(i);
            let open = if i == 0 { close } else { close / 1.01 };
            PriceBar {
                timestamp: base + Duration::hours(i as i64),
                open,
                high: close * 1.002,
                low: open * 0.998,
                close,
                volume: 5_000.0,
            }
        })
        .collect();
    let engine = SignalEngine::default();
    let window = PriceWindow::new("BTC-USD", Timeframe::H1, bars).unwrap();
    let mut indicators =
        IndicatorSet::compute(&window, &engine.config().indicators, &engine.config().regime)
            .unwrap();
    indicators.rsi = 25.0;
    let signal = engine.signal_from_indicators(&window, indicators).unwrap();
    assert_eq!(signal.direction, Direction::Long);
    signal
}

fn simulator(iterations: usize, seed: u64, parallel: bool) -> MonteCarloSimulator {
    MonteCarloSimulator::new(
        SimulationConfig::default()
            .with_iterations(iterations)
            .with_seed(seed)
            .with_parallelism(parallel),
    )
    .unwrap()
}

/// Horizon log-return volatility (5%); large enough that barrier hits are common.
const VOL: f64 = 0.05;

fn variance(values: &[f64]) -> f64 {
    let m = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

// ──────────────────────────────────────────────
// 1-2. Determinism
// ──────────────────────────────────────────────

#[test]
fn same_seed_same_report() {
    let signal = long_signal();
    let a = simulator(1_000, 42, true).run(&signal, VOL).unwrap();
    let b = simulator(1_000, 42, true).run(&signal, VOL).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.seed, Some(42));
}

#[test]
fn parallel_matches_sequential() {
    let signal = long_signal();
    let par = simulator(2_000, 7, true).run(&signal, VOL).unwrap();
    let seq = simulator(2_000, 7, false).run(&signal, VOL).unwrap();
    assert_eq!(par, seq);
}

#[test]
fn different_seeds_differ() {
    let signal = long_signal();
    let a = simulator(1_000, 1, true).run(&signal, VOL).unwrap();
    let b = simulator(1_000, 2, true).run(&signal, VOL).unwrap();
    assert_ne!(a.expected_return_pct, b.expected_return_pct);
}

// ──────────────────────────────────────────────
// 3. Law of large numbers
// ──────────────────────────────────────────────

#[test]
fn more_iterations_narrow_expected_return_spread() {
    let signal = long_signal();
    let estimates = |iterations: usize| -> Vec<f64> {
        (0..20)
            .map(|seed| {
                simulator(iterations, seed, true)
                    .run(&signal, VOL)
                    .unwrap()
                    .expected_return_pct
            })
            .collect()
    };
    let small = variance(&estimates(100));
    let large = variance(&estimates(10_000));
    assert!(
        large < small,
        "variance at 10k ({large}) should be below variance at 100 ({small})"
    );
}

// ──────────────────────────────────────────────
// 4. Bounds
// ──────────────────────────────────────────────

#[test]
fn report_respects_barriers() {
    let signal = long_signal();
    let (stop, target) = signal.levels().unwrap();
    let entry = signal.entry_price;
    let stop_pct = (entry - stop) / entry * 100.0;
    let target_pct = (target - entry) / entry * 100.0;

    let r = simulator(5_000, 11, true).run(&signal, VOL).unwrap();
    assert!((0.0..=100.0).contains(&r.win_probability_pct));
    assert!(r.var95 >= -stop_pct - 1e-9);
    assert!(r.cvar95 <= r.var95 + 1e-12);
    assert!(r.expected_return_pct <= target_pct + 1e-9);
    assert!(r.max_drawdown_pct >= 0.0 && r.max_drawdown_pct <= stop_pct + 1e-9);
    assert_eq!(
        r.outcomes.stopped_out + r.outcomes.took_profit + r.outcomes.timed_out,
        5_000
    );
    assert_eq!(r.iterations, 5_000);
    assert_eq!(r.steps, 24);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn win_probability_in_range(vol in 0.0..0.2_f64, seed in any::<u64>()) {
        let r = simulator(200, seed, false).run(&long_signal(), vol).unwrap();
        prop_assert!((0.0..=100.0).contains(&r.win_probability_pct));
        prop_assert!(r.max_drawdown_pct >= 0.0);
        prop_assert!(r.sharpe_ratio.is_finite());
    }
}

// ──────────────────────────────────────────────
// 5. Engine → simulator
// ──────────────────────────────────────────────

#[test]
fn neutral_engine_signal_is_refused() {
    let mut signal = long_signal();
    signal.direction = Direction::Neutral;
    signal.stop_loss = None;
    signal.take_profit = None;
    assert_eq!(
        simulator(1_000, 3, true).run(&signal, VOL).unwrap_err(),
        RiskError::NeutralSignal
    );
}

#[test]
fn report_serializes() {
    let r = simulator(100, 5, true).run(&long_signal(), VOL).unwrap();
    let json = serde_json::to_value(&r).unwrap();
    for key in [
        "var95",
        "sharpe_ratio",
        "max_drawdown_pct",
        "win_probability_pct",
        "expected_return_pct",
        "iterations",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert!(json["outcomes"]["took_profit"].as_u64().is_some());
}
