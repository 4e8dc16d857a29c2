//! Simulation configuration.

use serde::{Deserialize, Serialize};

use crate::error::RiskError;

/// Fewest iterations that still give a usable 5th percentile.
pub const MIN_ITERATIONS: usize = 100;
pub const DEFAULT_ITERATIONS: usize = 1_000;
pub const DEFAULT_STEPS: usize = 24;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of simulated paths.
    pub iterations: usize,
    /// Sub-steps per path over the horizon.
    pub steps: usize,
    /// Master seed; `None` draws one from system entropy.
    pub seed: Option<u64>,
    /// Simulate paths on the rayon pool.
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            steps: DEFAULT_STEPS,
            seed: None,
            parallel: true,
        }
    }
}

impl SimulationConfig {
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<(), RiskError> {
        if self.iterations < MIN_ITERATIONS {
            return Err(RiskError::TooFewIterations {
                requested: self.iterations,
                minimum: MIN_ITERATIONS,
            });
        }
        if self.steps == 0 {
            return Err(RiskError::ZeroSteps);
        }
        Ok(())
    }
}
