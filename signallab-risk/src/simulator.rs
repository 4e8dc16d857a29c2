//! Monte Carlo risk simulator.
//!
//! Paths are independent: each draws from its own generator supplied by a
//! `PathRngFactory`, so they can run on the rayon pool in any order and the
//! reduction (after every path has finished) sees the same inputs as a
//! sequential run.

use rayon::prelude::*;
use tracing::{debug, info};

use signallab_core::{Direction, Signal};

use crate::config::SimulationConfig;
use crate::error::RiskError;
use crate::path::{simulate_path, Barriers, PathResult};
use crate::report::RiskReport;
use crate::rng::{PathRngFactory, RngHierarchy};

#[derive(Debug, Clone, Default)]
pub struct MonteCarloSimulator {
    config: SimulationConfig,
}

impl MonteCarloSimulator {
    pub fn new(config: SimulationConfig) -> Result<Self, RiskError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Simulate with the configured seed, or an entropy seed when unset.
    ///
    /// `volatility` is the standard deviation of log returns over the whole
    /// horizon; each of the `steps` sub-steps uses `volatility / sqrt(steps)`.
    pub fn run(&self, signal: &Signal, volatility: f64) -> Result<RiskReport, RiskError> {
        let rngs = match self.config.seed {
            Some(seed) => RngHierarchy::new(seed),
            None => RngHierarchy::from_entropy(),
        };
        self.run_with(signal, volatility, &rngs)
    }

    /// Simulate with an injected randomness source.
    pub fn run_with<F: PathRngFactory>(
        &self,
        signal: &Signal,
        volatility: f64,
        rngs: &F,
    ) -> Result<RiskReport, RiskError> {
        self.config.validate()?;
        let barriers = barriers_for(signal)?;
        if !(volatility.is_finite() && volatility >= 0.0) {
            return Err(RiskError::InvalidVolatility(volatility));
        }

        let steps = self.config.steps;
        let step_sigma = volatility / (steps as f64).sqrt();
        let symbol = signal.symbol.as_str();

        debug!(
            symbol,
            direction = %signal.direction,
            entry = barriers.entry,
            stop = barriers.stop,
            target = barriers.target,
            step_sigma,
            iterations = self.config.iterations,
            "starting simulation"
        );

        let run_path = |i: usize| -> PathResult {
            let mut rng = rngs.rng_for(symbol, i as u64);
            simulate_path(&mut rng, &barriers, step_sigma, steps)
        };

        let paths: Vec<PathResult> = if self.config.parallel {
            (0..self.config.iterations).into_par_iter().map(run_path).collect()
        } else {
            (0..self.config.iterations).map(run_path).collect()
        };

        let report = RiskReport::from_paths(&paths, steps, rngs.master_seed());
        info!(
            symbol,
            iterations = report.iterations,
            expected_return_pct = report.expected_return_pct,
            var95 = report.var95,
            win_probability_pct = report.win_probability_pct,
            "simulation complete"
        );
        Ok(report)
    }
}

/// Simulate `iterations` paths with default settings and an entropy seed.
pub fn simulate_risk(
    signal: &Signal,
    volatility: f64,
    iterations: usize,
) -> Result<RiskReport, RiskError> {
    MonteCarloSimulator::new(SimulationConfig::default().with_iterations(iterations))?
        .run(signal, volatility)
}

/// Extract and check the barriers a signal implies.
pub fn barriers_for(signal: &Signal) -> Result<Barriers, RiskError> {
    if signal.direction == Direction::Neutral {
        return Err(RiskError::NeutralSignal);
    }
    let entry = signal.entry_price;
    if !(entry.is_finite() && entry > 0.0) {
        return Err(RiskError::InvalidEntry(entry));
    }
    let (stop, target) = signal.levels().ok_or(RiskError::MissingLevels)?;
    if !signal.levels_are_consistent() {
        return Err(RiskError::InconsistentLevels {
            direction: signal.direction.to_string(),
            entry,
            stop,
            target,
        });
    }
    Ok(Barriers {
        direction: signal.direction,
        entry,
        stop,
        target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rand::rngs::mock::StepRng;
    use signallab_core::indicators::{
        AdxValue, BollingerValue, EmaTriple, IndicatorSet, MacdValue, StochasticValue,
    };
    use signallab_core::{MarketRegime, ScoreBreakdown, Timeframe};

    fn signal(direction: Direction, entry: f64, levels: Option<(f64, f64)>) -> Signal {
        Signal {
            symbol: "BTC".into(),
            timeframe: Timeframe::H1,
            direction,
            confidence: 80.0,
            entry_price: entry,
            stop_loss: levels.map(|l| l.0),
            take_profit: levels.map(|l| l.1),
            indicators: IndicatorSet {
                rsi: 50.0,
                macd: MacdValue {
                    line: 0.0,
                    signal: 0.0,
                    histogram: 0.0,
                },
                ema: EmaTriple {
                    short: entry,
                    medium: entry,
                    long: entry,
                },
                stochastic: StochasticValue { k: 50.0, d: 50.0 },
                bollinger: BollingerValue {
                    upper: entry,
                    middle: entry,
                    lower: entry,
                    width: 0.0,
                    percent_b: 50.0,
                },
                adx: AdxValue {
                    adx: 0.0,
                    plus_di: 0.0,
                    minus_di: 0.0,
                },
                atr: 1.0,
                volatility: 0.02,
                annualized_volatility: 0.02,
                market_regime: MarketRegime::Ranging,
            },
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            rationale: vec![],
            score: ScoreBreakdown::default(),
            config_version: 1,
        }
    }

    fn long() -> Signal {
        signal(Direction::Long, 100.0, Some((98.0, 104.0)))
    }

    /// Factory handing every path the same constant stream.
    struct Constant(u64);

    impl PathRngFactory for Constant {
        type Rng = StepRng;

        fn rng_for(&self, _symbol: &str, _iteration: u64) -> StepRng {
            StepRng::new(self.0, 0)
        }
    }

    #[test]
    fn neutral_signal_refused() {
        let s = signal(Direction::Neutral, 100.0, None);
        assert_eq!(
            simulate_risk(&s, 0.05, 1000).unwrap_err(),
            RiskError::NeutralSignal
        );
    }

    #[test]
    fn missing_levels_refused() {
        let s = signal(Direction::Long, 100.0, None);
        assert_eq!(
            simulate_risk(&s, 0.05, 1000).unwrap_err(),
            RiskError::MissingLevels
        );
    }

    #[test]
    fn inverted_levels_refused() {
        let s = signal(Direction::Short, 100.0, Some((98.0, 104.0)));
        assert!(matches!(
            simulate_risk(&s, 0.05, 1000),
            Err(RiskError::InconsistentLevels { .. })
        ));
    }

    #[test]
    fn too_few_iterations_refused() {
        assert_eq!(
            simulate_risk(&long(), 0.05, 99).unwrap_err(),
            RiskError::TooFewIterations {
                requested: 99,
                minimum: 100
            }
        );
    }

    #[test]
    fn bad_volatility_and_entry_refused() {
        assert_eq!(
            simulate_risk(&long(), -0.1, 1000).unwrap_err(),
            RiskError::InvalidVolatility(-0.1)
        );
        assert!(matches!(
            simulate_risk(&long(), f64::INFINITY, 1000),
            Err(RiskError::InvalidVolatility(_))
        ));
        let s = signal(Direction::Long, 0.0, Some((-1.0, 1.0)));
        assert_eq!(
            simulate_risk(&s, 0.05, 1000).unwrap_err(),
            RiskError::InvalidEntry(0.0)
        );
    }

    #[test]
    fn zero_volatility_is_flat() {
        let sim = MonteCarloSimulator::new(SimulationConfig::default().with_seed(1)).unwrap();
        let r = sim.run(&long(), 0.0).unwrap();
        assert_eq!(r.expected_return_pct, 0.0);
        assert_eq!(r.sharpe_ratio, 0.0);
        assert_eq!(r.win_probability_pct, 0.0);
        assert_eq!(r.outcomes.timed_out, 1000);
    }

    #[test]
    fn injected_rng_is_used() {
        // A constant stream gives every path the same shocks.
        let sim = MonteCarloSimulator::new(SimulationConfig::default().with_iterations(100))
            .unwrap();
        let r = sim.run_with(&long(), 0.05, &Constant(1 << 62)).unwrap();
        assert!(r.return_std_pct < 1e-12);
        assert!(r.seed.is_none());
        assert_eq!(r.iterations, 100);
    }

    #[test]
    fn entropy_seed_is_reported() {
        let r = simulate_risk(&long(), 0.05, 100).unwrap();
        let seed = r.seed.unwrap();
        let replay = MonteCarloSimulator::new(
            SimulationConfig::default()
                .with_iterations(100)
                .with_seed(seed),
        )
        .unwrap()
        .run(&long(), 0.05)
        .unwrap();
        assert_eq!(r, replay);
    }
}
