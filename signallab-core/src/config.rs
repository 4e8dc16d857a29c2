//! Engine configuration: one versioned source of truth for indicator
//! periods, regime thresholds, scoring weights and sizing multipliers.
//!
//! Every section has serde defaults, so a TOML file only needs the values it
//! overrides.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::domain::Timeframe;

/// Current scoring scheme version, stamped on every signal.
pub const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub version: u32,
    pub indicators: IndicatorParams,
    pub regime: RegimeThresholds,
    pub scoring: ScoringConfig,
    pub sizing: SizingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            indicators: IndicatorParams::default(),
            regime: RegimeThresholds::default(),
            scoring: ScoringConfig::default(),
            sizing: SizingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load from a TOML file and validate.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML string and validate.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {} (expected {CONFIG_VERSION})",
                self.version
            )));
        }
        self.indicators.validate()?;
        self.regime.validate()?;
        self.scoring.validate()?;
        self.sizing.validate()
    }
}

/// Indicator periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub ema_short: usize,
    pub ema_medium: usize,
    pub ema_long: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_k: f64,
    pub adx_period: usize,
    pub atr_period: usize,
    pub stochastic_k: usize,
    pub stochastic_d: usize,
    pub volatility_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            ema_short: 9,
            ema_medium: 21,
            ema_long: 50,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_k: 2.0,
            adx_period: 14,
            atr_period: 14,
            stochastic_k: 14,
            stochastic_d: 3,
            volatility_period: 20,
        }
    }
}

impl IndicatorParams {
    /// Shortest window for which every indicator in the set is defined.
    pub fn min_window(&self) -> usize {
        [
            self.rsi_period + 1,
            self.ema_short,
            self.ema_medium,
            self.ema_long,
            self.macd_slow + self.macd_signal - 1,
            self.bollinger_period,
            2 * self.adx_period,
            self.atr_period + 1,
            self.stochastic_k + self.stochastic_d - 1,
            self.volatility_period + 1,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("ema_short", self.ema_short),
            ("ema_medium", self.ema_medium),
            ("ema_long", self.ema_long),
            ("macd_fast", self.macd_fast),
            ("macd_signal", self.macd_signal),
            ("bollinger_period", self.bollinger_period),
            ("adx_period", self.adx_period),
            ("atr_period", self.atr_period),
            ("stochastic_k", self.stochastic_k),
            ("stochastic_d", self.stochastic_d),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, p)| *p == 0) {
            return Err(ConfigError::Invalid(format!("{name} must be >= 1")));
        }
        if self.volatility_period < 2 {
            return Err(ConfigError::Invalid("volatility_period must be >= 2".into()));
        }
        if self.macd_slow <= self.macd_fast {
            return Err(ConfigError::Invalid(
                "macd_slow must exceed macd_fast".into(),
            ));
        }
        if !(self.ema_short < self.ema_medium && self.ema_medium < self.ema_long) {
            return Err(ConfigError::Invalid(
                "EMA periods must satisfy short < medium < long".into(),
            ));
        }
        if !(self.bollinger_k > 0.0 && self.bollinger_k.is_finite()) {
            return Err(ConfigError::Invalid("bollinger_k must be positive".into()));
        }
        Ok(())
    }
}

/// Market regime thresholds.
///
/// `high_volatility` and `low_volatility` are compared against the per-bar
/// realized volatility (`IndicatorSet::volatility`), not against
/// `annualized_volatility`. Annualized figures for ordinary markets sit far
/// above 4%, so feeding them in would classify everything as
/// `HIGH_VOLATILITY`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeThresholds {
    pub high_volatility: f64,
    pub low_volatility: f64,
    pub trend_adx: f64,
    pub trend_up_rsi: f64,
    pub trend_down_rsi: f64,
}

impl Default for RegimeThresholds {
    fn default() -> Self {
        Self {
            high_volatility: 0.04,
            low_volatility: 0.015,
            trend_adx: 25.0,
            trend_up_rsi: 60.0,
            trend_down_rsi: 40.0,
        }
    }
}

impl RegimeThresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.low_volatility > self.high_volatility {
            return Err(ConfigError::Invalid(
                "low_volatility must not exceed high_volatility".into(),
            ));
        }
        if self.trend_down_rsi > self.trend_up_rsi {
            return Err(ConfigError::Invalid(
                "trend_down_rsi must not exceed trend_up_rsi".into(),
            ));
        }
        Ok(())
    }
}

/// Point weights per indicator condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// RSI beyond the oversold/overbought threshold.
    pub rsi_extreme: f64,
    /// RSI between the extreme threshold and the midline.
    pub rsi_moderate: f64,
    pub macd_histogram: f64,
    pub ema_alignment: f64,
    pub bollinger: f64,
    pub directional: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            rsi_extreme: 20.0,
            rsi_moderate: 10.0,
            macd_histogram: 25.0,
            ema_alignment: 15.0,
            bollinger: 15.0,
            directional: 10.0,
        }
    }
}

/// Signal composer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    pub rsi_oversold: f64,
    pub rsi_midline: f64,
    pub rsi_overbought: f64,
    /// %B (0-100 scale) below which price counts as stretched low.
    pub percent_b_low: f64,
    /// %B (0-100 scale) above which price counts as stretched high.
    pub percent_b_high: f64,
    /// Required lead of the winning side over the other.
    pub decision_margin: f64,
    pub confidence_floor: f64,
    pub confidence_cap: f64,
    /// MACD histogram and EMA spreads smaller than this percentage of the
    /// close count as flat.
    pub noise_floor_pct: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            rsi_oversold: 30.0,
            rsi_midline: 50.0,
            rsi_overbought: 70.0,
            percent_b_low: 20.0,
            percent_b_high: 80.0,
            decision_margin: 20.0,
            confidence_floor: 50.0,
            confidence_cap: 95.0,
            noise_floor_pct: 0.05,
        }
    }
}

impl ScoringConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.rsi_oversold < self.rsi_midline && self.rsi_midline < self.rsi_overbought) {
            return Err(ConfigError::Invalid(
                "RSI thresholds must satisfy oversold < midline < overbought".into(),
            ));
        }
        if self.percent_b_low >= self.percent_b_high {
            return Err(ConfigError::Invalid(
                "percent_b_low must be below percent_b_high".into(),
            ));
        }
        if !(0.0..=100.0).contains(&self.confidence_floor)
            || !(0.0..=100.0).contains(&self.confidence_cap)
            || self.confidence_floor > self.confidence_cap
        {
            return Err(ConfigError::Invalid(
                "confidence floor/cap must lie in [0, 100] with floor <= cap".into(),
            ));
        }
        if self.decision_margin < 0.0 || self.noise_floor_pct < 0.0 {
            return Err(ConfigError::Invalid(
                "decision_margin and noise_floor_pct must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Position sizing: ATR multiplier per timeframe and stop/target factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingConfig {
    pub atr_multipliers: BTreeMap<Timeframe, f64>,
    pub stop_factor: f64,
    pub target_factor: f64,
}

impl Default for SizingConfig {
    fn default() -> Self {
        let atr_multipliers = [
            (Timeframe::M1, 1.0),
            (Timeframe::M5, 1.2),
            (Timeframe::M15, 1.5),
            (Timeframe::M30, 1.8),
            (Timeframe::H1, 2.0),
            (Timeframe::H4, 2.5),
            (Timeframe::D1, 3.0),
            (Timeframe::D3, 3.5),
            (Timeframe::W1, 4.0),
            (Timeframe::Mo1, 5.0),
        ]
        .into_iter()
        .collect();
        Self {
            atr_multipliers,
            stop_factor: 0.8,
            target_factor: 1.6,
        }
    }
}

impl SizingConfig {
    /// Multiplier for a timeframe; timeframes missing from a partial table
    /// fall back to the built-in default.
    pub fn multiplier(&self, timeframe: Timeframe) -> f64 {
        self.atr_multipliers
            .get(&timeframe)
            .copied()
            .unwrap_or_else(|| default_multiplier(timeframe))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some((tf, m)) = self
            .atr_multipliers
            .iter()
            .find(|(_, m)| !(m.is_finite() && **m > 0.0))
        {
            return Err(ConfigError::Invalid(format!(
                "ATR multiplier for {tf} must be positive, got {m}"
            )));
        }
        if !(self.stop_factor > 0.0 && self.target_factor > 0.0) {
            return Err(ConfigError::Invalid(
                "stop_factor and target_factor must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn default_multiplier(timeframe: Timeframe) -> f64 {
    match timeframe {
        Timeframe::M1 => 1.0,
        Timeframe::M5 => 1.2,
        Timeframe::M15 => 1.5,
        Timeframe::M30 => 1.8,
        Timeframe::H1 => 2.0,
        Timeframe::H4 => 2.5,
        Timeframe::D1 => 3.0,
        Timeframe::D3 => 3.5,
        Timeframe::W1 => 4.0,
        Timeframe::Mo1 => 5.0,
    }
}
