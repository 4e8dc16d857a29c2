//! SignalLab Risk: Monte Carlo simulation of a signal's stop/target
//! barriers.
//!
//! This crate builds on `signallab-core` to provide:
//! - Per-path barrier state machine with log-normal steps
//! - Deterministic RNG hierarchy (BLAKE3 sub-seeds per path)
//! - Parallel path simulation on rayon
//! - Risk report aggregation (VaR95, CVaR95, Sharpe, drawdown, win rate)

pub mod config;
pub mod error;
pub mod path;
pub mod report;
pub mod rng;
pub mod simulator;

pub use config::{SimulationConfig, DEFAULT_ITERATIONS, DEFAULT_STEPS, MIN_ITERATIONS};
pub use error::RiskError;
pub use path::{simulate_path, standard_normal, Barriers, PathResult, PathState};
pub use report::{percentile_sorted, OutcomeCounts, RiskReport};
pub use rng::{PathRngFactory, RngHierarchy};
pub use simulator::{barriers_for, simulate_risk, MonteCarloSimulator};
