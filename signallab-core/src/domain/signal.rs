//! Signal: the engine's output for one window evaluation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Timeframe;
use crate::indicators::IndicatorSet;

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Long,
    Short,
    Neutral,
}

impl Direction {
    /// +1 for long, -1 for short, 0 for neutral.
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
            Direction::Neutral => 0.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
            Direction::Neutral => "NEUTRAL",
        })
    }
}

/// Coarse market state derived from volatility, ADX and RSI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketRegime {
    TrendingUp,
    TrendingDown,
    Ranging,
    HighVolatility,
    LowVolatility,
}

impl fmt::Display for MarketRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MarketRegime::TrendingUp => "TRENDING_UP",
            MarketRegime::TrendingDown => "TRENDING_DOWN",
            MarketRegime::Ranging => "RANGING",
            MarketRegime::HighVolatility => "HIGH_VOLATILITY",
            MarketRegime::LowVolatility => "LOW_VOLATILITY",
        })
    }
}

/// Bullish and bearish point totals behind a decision.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub bullish: f64,
    pub bearish: f64,
}

/// A directional trading signal with risk levels.
///
/// Created once per evaluation and never mutated; the engine keeps no
/// reference to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub direction: Direction,
    /// Confidence in [0, 100].
    pub confidence: f64,
    pub entry_price: f64,
    /// `None` for neutral signals.
    pub stop_loss: Option<f64>,
    /// `None` for neutral signals.
    pub take_profit: Option<f64>,
    pub indicators: IndicatorSet,
    /// Timestamp of the last bar in the evaluated window.
    pub timestamp: DateTime<Utc>,
    /// One line per contributing indicator, in evaluation order.
    pub rationale: Vec<String>,
    pub score: ScoreBreakdown,
    /// Version of the scoring configuration that produced this signal.
    pub config_version: u32,
}

impl Signal {
    /// Stop and target as a pair, if the signal carries position levels.
    pub fn levels(&self) -> Option<(f64, f64)> {
        self.stop_loss.zip(self.take_profit)
    }

    /// True if the levels respect the direction's ordering:
    /// `stop < entry < target` for long, `target < entry < stop` for short,
    /// no levels at all for neutral.
    pub fn levels_are_consistent(&self) -> bool {
        match (self.direction, self.levels()) {
            (Direction::Neutral, None) => true,
            (Direction::Long, Some((stop, target))) => {
                stop < self.entry_price && self.entry_price < target
            }
            (Direction::Short, Some((stop, target))) => {
                target < self.entry_price && self.entry_price < stop
            }
            _ => false,
        }
    }
}
