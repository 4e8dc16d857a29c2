//! CLI configuration file: engine, simulation and logging sections.
//!
//! ```toml
//! [engine.scoring]
//! decision_margin = 25.0
//!
//! [simulation]
//! iterations = 5000
//! seed = 42
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use signallab_core::EngineConfig;
use signallab_risk::SimulationConfig;

use crate::logging::LoggingConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub simulation: SimulationConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Defaults when no path is given, otherwise the parsed and validated file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("failed to parse TOML")?;
        config.engine.validate()?;
        config.simulation.validate()?;
        Ok(config)
    }
}
