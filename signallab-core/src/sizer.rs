//! Position sizer: stop-loss and take-profit from ATR and timeframe.
//!
//! ```text
//! stop_distance        = ATR * multiplier(timeframe) * stop_factor
//! take_profit_distance = ATR * multiplier(timeframe) * target_factor
//! ```
//!
//! With the default factors (0.8 / 1.6) reward:risk is fixed at 2:1.
//! Shorter timeframes get smaller multipliers and therefore tighter stops.

use serde::{Deserialize, Serialize};

use crate::config::SizingConfig;
use crate::domain::{Direction, Timeframe};

/// Absolute price levels plus the distances they were derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionLevels {
    pub stop_loss: f64,
    pub take_profit: f64,
    pub stop_distance: f64,
    pub take_profit_distance: f64,
}

impl PositionLevels {
    /// True when ATR was zero and both levels sit on the entry price.
    pub fn is_zero_distance(&self) -> bool {
        self.stop_distance == 0.0 && self.take_profit_distance == 0.0
    }

    /// True when either level landed on the entry price, either because
    /// ATR was zero or because the distance is below the price's float
    /// resolution.
    pub fn touches_entry(&self, entry: f64) -> bool {
        self.stop_loss == entry || self.take_profit == entry
    }
}

#[derive(Debug, Clone, Default)]
pub struct PositionSizer {
    config: SizingConfig,
}

impl PositionSizer {
    pub fn new(config: SizingConfig) -> Self {
        Self { config }
    }

    /// Stop and take-profit distances. A non-finite or negative ATR is
    /// treated as zero.
    pub fn distances(&self, atr: f64, timeframe: Timeframe) -> (f64, f64) {
        let atr = if atr.is_finite() { atr.max(0.0) } else { 0.0 };
        let base = atr * self.config.multiplier(timeframe);
        (base * self.config.stop_factor, base * self.config.target_factor)
    }

    /// Levels for a directional signal; `None` for NEUTRAL.
    ///
    /// Zero ATR yields zero-distance levels rather than an error; callers
    /// decide what a zero-risk position means.
    pub fn levels(
        &self,
        direction: Direction,
        entry: f64,
        atr: f64,
        timeframe: Timeframe,
    ) -> Option<PositionLevels> {
        let (stop_distance, take_profit_distance) = self.distances(atr, timeframe);
        let (stop_loss, take_profit) = match direction {
            Direction::Long => (entry - stop_distance, entry + take_profit_distance),
            Direction::Short => (entry + stop_distance, entry - take_profit_distance),
            Direction::Neutral => return None,
        };
        Some(PositionLevels {
            stop_loss,
            take_profit,
            stop_distance,
            take_profit_distance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn long_levels_one_hour() {
        let levels = PositionSizer::default()
            .levels(Direction::Long, 100.0, 2.0, Timeframe::H1)
            .unwrap();
        // multiplier 2.0 → stop 3.2, target 6.4
        assert_approx(levels.stop_loss, 96.8, DEFAULT_EPSILON);
        assert_approx(levels.take_profit, 106.4, DEFAULT_EPSILON);
        assert!(levels.stop_loss < 100.0 && 100.0 < levels.take_profit);
    }

    #[test]
    fn short_levels_are_mirrored() {
        let levels = PositionSizer::default()
            .levels(Direction::Short, 100.0, 2.0, Timeframe::D1)
            .unwrap();
        // multiplier 3.0 → stop 4.8, target 9.6
        assert_approx(levels.stop_loss, 104.8, DEFAULT_EPSILON);
        assert_approx(levels.take_profit, 90.4, DEFAULT_EPSILON);
        assert!(levels.take_profit < 100.0 && 100.0 < levels.stop_loss);
    }

    #[test]
    fn neutral_has_no_levels() {
        assert!(PositionSizer::default()
            .levels(Direction::Neutral, 100.0, 2.0, Timeframe::H1)
            .is_none());
    }

    #[test]
    fn reward_is_twice_risk() {
        let sizer = PositionSizer::default();
        for tf in Timeframe::ALL {
            let (stop, target) = sizer.distances(1.5, tf);
            assert_approx(target, 2.0 * stop, 1e-12);
        }
    }

    #[test]
    fn multipliers_grow_with_timeframe() {
        let sizer = PositionSizer::default();
        let stops: Vec<f64> = Timeframe::ALL
            .iter()
            .map(|tf| sizer.distances(1.0, *tf).0)
            .collect();
        assert!(stops.windows(2).all(|w| w[0] < w[1]));
        assert_approx(stops[0], 0.8, DEFAULT_EPSILON);
        assert_approx(stops[9], 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn zero_atr_gives_zero_distance_without_error() {
        let levels = PositionSizer::default()
            .levels(Direction::Long, 50.0, 0.0, Timeframe::M5)
            .unwrap();
        assert!(levels.is_zero_distance());
        assert!(levels.touches_entry(50.0));
        assert_eq!(levels.stop_loss, 50.0);
        assert_eq!(levels.take_profit, 50.0);
    }

    #[test]
    fn sub_resolution_atr_touches_entry() {
        let entry = 1.0e8;
        let levels = PositionSizer::default()
            .levels(Direction::Long, entry, 1.0e-9, Timeframe::H1)
            .unwrap();
        assert!(!levels.is_zero_distance());
        assert!(levels.touches_entry(entry));

        let wide = PositionSizer::default()
            .levels(Direction::Long, entry, 1.0e3, Timeframe::H1)
            .unwrap();
        assert!(!wide.touches_entry(entry));
    }

    #[test]
    fn nan_atr_treated_as_zero() {
        assert_eq!(
            PositionSizer::default().distances(f64::NAN, Timeframe::H4),
            (0.0, 0.0)
        );
    }
}
