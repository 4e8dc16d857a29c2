//! IndicatorSet: every indicator the composer reads, at the final bar.

use serde::{Deserialize, Serialize};

use super::{
    Adx, AdxValue, Atr, Bollinger, BollingerValue, Ema, Indicator, Macd, MacdValue,
    RealizedVolatility, Rsi, Stochastic, StochasticValue,
};
use crate::config::{IndicatorParams, RegimeThresholds};
use crate::domain::{MarketRegime, PriceWindow};
use crate::error::SignalError;
use crate::indicators::volatility::annualize;
use crate::regime;

/// Short, medium and long EMA of the close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmaTriple {
    pub short: f64,
    pub medium: f64,
    pub long: f64,
}

/// Fixed-schema snapshot of all indicators for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub rsi: f64,
    pub macd: MacdValue,
    pub ema: EmaTriple,
    pub stochastic: StochasticValue,
    pub bollinger: BollingerValue,
    pub adx: AdxValue,
    pub atr: f64,
    /// Per-bar realized volatility of log returns.
    pub volatility: f64,
    pub annualized_volatility: f64,
    pub market_regime: MarketRegime,
}

impl IndicatorSet {
    /// Compute every indicator over the window.
    ///
    /// Fails with `InsufficientData` naming the longest-period indicator
    /// when the window is shorter than `params.min_window()`.
    pub fn compute(
        window: &PriceWindow,
        params: &IndicatorParams,
        thresholds: &RegimeThresholds,
    ) -> Result<Self, SignalError> {
        let required = params.min_window();
        if window.len() < required {
            return Err(SignalError::insufficient(
                "indicator_set",
                required,
                window.len(),
            ));
        }
        let bars = window.bars();

        let rsi = Rsi::new(params.rsi_period).latest(bars)?;
        let macd = Macd::new(params.macd_fast, params.macd_slow, params.macd_signal)
            .latest_value(bars)?;
        let ema = EmaTriple {
            short: Ema::new(params.ema_short).latest(bars)?,
            medium: Ema::new(params.ema_medium).latest(bars)?,
            long: Ema::new(params.ema_long).latest(bars)?,
        };
        let stochastic =
            Stochastic::new(params.stochastic_k, params.stochastic_d).latest_value(bars)?;
        let bollinger =
            Bollinger::new(params.bollinger_period, params.bollinger_k).latest_value(bars)?;
        let adx = Adx::new(params.adx_period).latest_value(bars)?;
        let atr = Atr::new(params.atr_period).latest(bars)?;
        let volatility = RealizedVolatility::new(params.volatility_period).latest_checked(bars)?;

        let market_regime = regime::classify(volatility, adx.adx, rsi, thresholds);

        Ok(Self {
            rsi,
            macd,
            ema,
            stochastic,
            bollinger,
            adx,
            atr,
            volatility,
            annualized_volatility: annualize(volatility, window.timeframe()),
            market_regime,
        })
    }
}
