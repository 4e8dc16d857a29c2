//! Market regime classification.
//!
//! Rules are evaluated in order and the first match wins: volatility
//! extremes dominate, then a strong trend (ADX) confirmed by RSI, and
//! everything else is ranging.

use crate::config::RegimeThresholds;
use crate::domain::MarketRegime;

/// Classify from per-bar realized volatility, ADX and RSI.
pub fn classify(volatility: f64, adx: f64, rsi: f64, thresholds: &RegimeThresholds) -> MarketRegime {
    if volatility > thresholds.high_volatility {
        MarketRegime::HighVolatility
    } else if volatility < thresholds.low_volatility {
        MarketRegime::LowVolatility
    } else if adx > thresholds.trend_adx && rsi > thresholds.trend_up_rsi {
        MarketRegime::TrendingUp
    } else if adx > thresholds.trend_adx && rsi < thresholds.trend_down_rsi {
        MarketRegime::TrendingDown
    } else {
        MarketRegime::Ranging
    }
}
