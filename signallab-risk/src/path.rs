//! One simulated price path between absorbing barriers.
//!
//! State machine: `Running → {StoppedOut, TookProfit, TimedOut}`. Each step
//! multiplies the price by `exp(sigma_step * z)` with `z ~ N(0, 1)`
//! (zero drift in log space). Crossing a barrier ends the path at the
//! barrier price; otherwise the path times out at the final price.

use rand::Rng;
use serde::{Deserialize, Serialize};

use signallab_core::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PathState {
    Running,
    StoppedOut,
    TookProfit,
    TimedOut,
}

impl PathState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PathState::Running)
    }
}

/// Entry and the two absorbing barriers of a directional position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barriers {
    pub direction: Direction,
    pub entry: f64,
    pub stop: f64,
    pub target: f64,
}

impl Barriers {
    /// Signed return of exiting at `price`, in percent of entry.
    pub fn return_pct(&self, price: f64) -> f64 {
        self.direction.sign() * (price - self.entry) / self.entry * 100.0
    }

    /// State after observing `price`.
    fn classify(&self, price: f64) -> PathState {
        let (stopped, profited) = match self.direction {
            Direction::Long => (price <= self.stop, price >= self.target),
            Direction::Short => (price >= self.stop, price <= self.target),
            Direction::Neutral => (false, false),
        };
        if stopped {
            PathState::StoppedOut
        } else if profited {
            PathState::TookProfit
        } else {
            PathState::Running
        }
    }
}

/// Terminal result of one path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathResult {
    pub state: PathState,
    /// Return at exit, in percent of entry.
    pub return_pct: f64,
    /// Worst unrealized loss seen on the path, in percent of entry (>= 0).
    pub max_adverse_pct: f64,
    pub steps_taken: usize,
}

/// Standard normal draw by the Box–Muller transform.
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // gen::<f64>() is in [0, 1); flip it so ln never sees zero.
    let u1 = 1.0 - rng.gen::<f64>();
    let u2 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

/// Walk one path for at most `steps` steps.
pub fn simulate_path<R: Rng + ?Sized>(
    rng: &mut R,
    barriers: &Barriers,
    step_sigma: f64,
    steps: usize,
) -> PathResult {
    let mut price = barriers.entry;
    let mut max_adverse = 0.0_f64;

    for step in 1..=steps {
        price *= (step_sigma * standard_normal(rng)).exp();

        let state = barriers.classify(price);
        let exit = match state {
            PathState::StoppedOut => barriers.stop,
            PathState::TookProfit => barriers.target,
            _ => price,
        };
        max_adverse = max_adverse.max(-barriers.return_pct(exit));

        if state.is_terminal() {
            return PathResult {
                state,
                return_pct: barriers.return_pct(exit),
                max_adverse_pct: max_adverse,
                steps_taken: step,
            };
        }
    }

    PathResult {
        state: PathState::TimedOut,
        return_pct: barriers.return_pct(price),
        max_adverse_pct: max_adverse,
        steps_taken: steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn long() -> Barriers {
        Barriers {
            direction: Direction::Long,
            entry: 100.0,
            stop: 98.0,
            target: 104.0,
        }
    }

    fn short() -> Barriers {
        Barriers {
            direction: Direction::Short,
            entry: 100.0,
            stop: 102.0,
            target: 96.0,
        }
    }

    #[test]
    fn zero_volatility_times_out_flat() {
        let mut rng = StdRng::seed_from_u64(1);
        let r = simulate_path(&mut rng, &long(), 0.0, 24);
        assert_eq!(r.state, PathState::TimedOut);
        assert_eq!(r.return_pct, 0.0);
        assert_eq!(r.max_adverse_pct, 0.0);
        assert_eq!(r.steps_taken, 24);
    }

    #[test]
    fn huge_volatility_is_absorbed_at_barrier_prices() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..200 {
            let r = simulate_path(&mut rng, &long(), 0.5, 24);
            assert!(r.state.is_terminal());
            match r.state {
                PathState::StoppedOut => {
                    assert!((r.return_pct + 2.0).abs() < 1e-9);
                    assert!((r.max_adverse_pct - 2.0).abs() < 1e-9);
                }
                PathState::TookProfit => assert!((r.return_pct - 4.0).abs() < 1e-9),
                PathState::TimedOut => {
                    assert!(r.return_pct > -2.0 && r.return_pct < 4.0)
                }
                PathState::Running => unreachable!(),
            }
        }
    }

    #[test]
    fn short_returns_are_mirrored() {
        let b = short();
        assert_eq!(b.return_pct(96.0), 4.0);
        assert_eq!(b.return_pct(102.0), -2.0);
        assert_eq!(b.classify(102.5), PathState::StoppedOut);
        assert_eq!(b.classify(95.0), PathState::TookProfit);
        assert_eq!(b.classify(100.0), PathState::Running);
    }

    #[test]
    fn adverse_excursion_never_exceeds_stop() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let r = simulate_path(&mut rng, &short(), 0.01, 24);
            assert!(r.max_adverse_pct >= 0.0);
            assert!(r.max_adverse_pct <= 2.0 + 1e-9);
        }
    }

    #[test]
    fn box_muller_moments() {
        let mut rng = StdRng::seed_from_u64(4);
        let n = 20_000;
        let draws: Vec<f64> = (0..n).map(|_| standard_normal(&mut rng)).collect();
        let mean = draws.iter().sum::<f64>() / n as f64;
        let var = draws.iter().map(|z| (z - mean).powi(2)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.05, "mean {mean}");
        assert!((var - 1.0).abs() < 0.05, "var {var}");
        assert!(draws.iter().all(|z| z.is_finite()));
    }
}
