//! Risk report: reduction of all simulated paths.
//!
//! All figures are in percent of the entry price.
//! - expected return: mean of path returns
//! - VaR95: 5th percentile of sorted returns (linear interpolation)
//! - CVaR95: mean of the worst 5% of returns
//! - max drawdown: largest adverse excursion over all paths
//! - win probability: share of paths with a positive return
//! - Sharpe: mean / population stddev, 0 when the stddev is 0

use serde::{Deserialize, Serialize};

use crate::path::{PathResult, PathState};

/// How the simulated paths ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub stopped_out: usize,
    pub took_profit: usize,
    pub timed_out: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub var95: f64,
    pub cvar95: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown_pct: f64,
    pub win_probability_pct: f64,
    pub expected_return_pct: f64,
    pub return_std_pct: f64,
    pub iterations: usize,
    pub steps: usize,
    pub outcomes: OutcomeCounts,
    /// Master seed that reproduces this report, when known.
    pub seed: Option<u64>,
}

impl RiskReport {
    /// Aggregate terminal path results. An empty slice yields an all-zero
    /// report.
    pub fn from_paths(paths: &[PathResult], steps: usize, seed: Option<u64>) -> Self {
        let mut returns: Vec<f64> = paths.iter().map(|p| p.return_pct).collect();
        returns.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mut outcomes = OutcomeCounts::default();
        for p in paths {
            match p.state {
                PathState::StoppedOut => outcomes.stopped_out += 1,
                PathState::TookProfit => outcomes.took_profit += 1,
                PathState::TimedOut | PathState::Running => outcomes.timed_out += 1,
            }
        }

        let expected = mean(&returns);
        let std = std_dev(&returns);
        let sharpe_ratio = if std < 1e-15 { 0.0 } else { expected / std };

        let wins = returns.iter().filter(|r| **r > 0.0).count();
        let win_probability_pct = if returns.is_empty() {
            0.0
        } else {
            wins as f64 / returns.len() as f64 * 100.0
        };

        let max_drawdown_pct = paths
            .iter()
            .map(|p| p.max_adverse_pct)
            .fold(0.0_f64, f64::max);

        Self {
            var95: percentile_sorted(&returns, 5.0),
            cvar95: cvar_95_sorted(&returns),
            sharpe_ratio,
            max_drawdown_pct,
            win_probability_pct,
            expected_return_pct: expected,
            return_std_pct: std,
            iterations: paths.len(),
            steps,
            outcomes,
            seed,
        }
    }
}

/// Linear-interpolated percentile of an ascending slice; `p` in [0, 100].
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = rank - lo as f64;
    sorted[lo] * (1.0 - frac) + sorted[hi] * frac
}

/// Mean of the worst 5% of an ascending slice (at least one observation).
fn cvar_95_sorted(sorted: &[f64]) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let cutoff = ((sorted.len() as f64 * 0.05).ceil() as usize).max(1);
    mean(&sorted[..cutoff])
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}
