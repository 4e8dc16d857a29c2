//! Why a simulation refused to run.

use thiserror::Error;

/// Every variant means "this input cannot produce a meaningful report";
/// nothing is simulated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    #[error("cannot simulate a NEUTRAL signal")]
    NeutralSignal,

    #[error("signal carries no stop-loss / take-profit levels")]
    MissingLevels,

    #[error("levels out of order for {direction}: stop {stop}, entry {entry}, target {target}")]
    InconsistentLevels {
        direction: String,
        entry: f64,
        stop: f64,
        target: f64,
    },

    #[error("{requested} iterations requested, at least {minimum} required")]
    TooFewIterations { requested: usize, minimum: usize },

    #[error("volatility must be finite and non-negative, got {0}")]
    InvalidVolatility(f64),

    #[error("entry price must be finite and positive, got {0}")]
    InvalidEntry(f64),

    #[error("simulation horizon must have at least one step")]
    ZeroSteps,
}
