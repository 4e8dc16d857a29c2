//! Signal composer: turns an `IndicatorSet` into a direction, a confidence
//! and a rationale.
//!
//! Bullish and bearish evidence are scored independently as weighted point
//! sums. A side wins only when it leads the other by more than the decision
//! margin; anything closer is NEUTRAL.
//!
//! Evaluation order (and therefore rationale order) is fixed:
//! RSI, MACD histogram, EMA short/medium, Bollinger %B, directional index.

use crate::config::ScoringConfig;
use crate::domain::{Direction, ScoreBreakdown};
use crate::indicators::IndicatorSet;

/// Composer output for one indicator set.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub direction: Direction,
    pub confidence: f64,
    pub score: ScoreBreakdown,
    pub rationale: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Bullish,
    Bearish,
}

impl Side {
    fn label(self) -> &'static str {
        match self {
            Side::Bullish => "bullish",
            Side::Bearish => "bearish",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignalComposer {
    config: ScoringConfig,
}

impl SignalComposer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score the set. `close` is the final close, used to scale the noise
    /// floor for MACD and EMA spreads.
    pub fn compose(&self, set: &IndicatorSet, close: f64) -> Composition {
        let cfg = &self.config;
        let w = &cfg.weights;
        let tolerance = (close.abs() * cfg.noise_floor_pct / 100.0).max(0.0);

        let mut score = ScoreBreakdown::default();
        let mut rationale = Vec::new();
        let mut award = |side: Side, points: f64, line: String| {
            if points <= 0.0 {
                return;
            }
            match side {
                Side::Bullish => score.bullish += points,
                Side::Bearish => score.bearish += points,
            }
            rationale.push(format!("{line} (+{points:.0} {})", side.label()));
        };

        let rsi = set.rsi;
        if rsi < cfg.rsi_oversold {
            award(Side::Bullish, w.rsi_extreme, format!("RSI {rsi:.1} oversold"));
        } else if rsi < cfg.rsi_midline {
            award(Side::Bullish, w.rsi_moderate, format!("RSI {rsi:.1} below midline"));
        } else if rsi > cfg.rsi_overbought {
            award(Side::Bearish, w.rsi_extreme, format!("RSI {rsi:.1} overbought"));
        } else if rsi > cfg.rsi_midline {
            award(Side::Bearish, w.rsi_moderate, format!("RSI {rsi:.1} above midline"));
        }

        let hist = set.macd.histogram;
        if hist > tolerance {
            award(
                Side::Bullish,
                w.macd_histogram,
                format!("MACD histogram {hist:.4} positive"),
            );
        } else if hist < -tolerance {
            award(
                Side::Bearish,
                w.macd_histogram,
                format!("MACD histogram {hist:.4} negative"),
            );
        }

        let spread = set.ema.short - set.ema.medium;
        if spread > tolerance {
            award(
                Side::Bullish,
                w.ema_alignment,
                format!(
                    "EMA short {:.4} above medium {:.4}",
                    set.ema.short, set.ema.medium
                ),
            );
        } else if spread < -tolerance {
            award(
                Side::Bearish,
                w.ema_alignment,
                format!(
                    "EMA short {:.4} below medium {:.4}",
                    set.ema.short, set.ema.medium
                ),
            );
        }

        let percent_b = set.bollinger.percent_b;
        if percent_b < cfg.percent_b_low {
            award(
                Side::Bullish,
                w.bollinger,
                format!("Bollinger %B {percent_b:.1} near lower band"),
            );
        } else if percent_b > cfg.percent_b_high {
            award(
                Side::Bearish,
                w.bollinger,
                format!("Bollinger %B {percent_b:.1} near upper band"),
            );
        }

        let (plus, minus) = (set.adx.plus_di, set.adx.minus_di);
        if plus > minus {
            award(
                Side::Bullish,
                w.directional,
                format!("+DI {plus:.1} above -DI {minus:.1}"),
            );
        } else if minus > plus {
            award(
                Side::Bearish,
                w.directional,
                format!("-DI {minus:.1} above +DI {plus:.1}"),
            );
        }

        let (direction, winning) = if score.bullish > score.bearish + cfg.decision_margin {
            (Direction::Long, score.bullish)
        } else if score.bearish > score.bullish + cfg.decision_margin {
            (Direction::Short, score.bearish)
        } else {
            (Direction::Neutral, 0.0)
        };

        Composition {
            direction,
            confidence: self.confidence(winning),
            score,
            rationale,
        }
    }

    /// `min(floor + winning, cap)`, kept inside [0, 100].
    fn confidence(&self, winning: f64) -> f64 {
        (self.config.confidence_floor + winning)
            .min(self.config.confidence_cap)
            .clamp(0.0, 100.0)
    }
}
