//! Signal engine: window in, signal out.
//!
//! Pipeline per evaluation:
//! 1. Validate the window (symbol, finite prices, ordering)
//! 2. Compute the `IndicatorSet` (regime included)
//! 3. Compose direction, confidence and rationale
//! 4. Size stop-loss / take-profit from ATR and timeframe
//!
//! The engine is immutable after construction and holds no per-symbol
//! state; caching is opt-in through a caller-owned `IndicatorCache`.

use tracing::{debug, warn};

use crate::cache::IndicatorCache;
use crate::composer::SignalComposer;
use crate::config::{ConfigError, EngineConfig};
use crate::domain::{Direction, PriceBar, PriceWindow, Signal, Timeframe};
use crate::error::SignalError;
use crate::indicators::IndicatorSet;
use crate::sizer::PositionSizer;

#[derive(Debug, Clone)]
pub struct SignalEngine {
    config: EngineConfig,
    composer: SignalComposer,
    sizer: PositionSizer,
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}

impl SignalEngine {
    /// Validate the configuration and build an engine from it.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        Self {
            composer: SignalComposer::new(config.scoring.clone()),
            sizer: PositionSizer::new(config.sizing.clone()),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Shortest window the engine accepts.
    pub fn min_window(&self) -> usize {
        self.config.indicators.min_window()
    }

    /// Evaluate one (symbol, timeframe) window.
    pub fn compute_signal(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        bars: Vec<PriceBar>,
    ) -> Result<Signal, SignalError> {
        let window = PriceWindow::new(symbol, timeframe, bars)?;
        self.evaluate(&window)
    }

    /// Like `compute_signal`, reusing indicators from `cache` when the
    /// window is unchanged since the last call for this pair.
    pub fn compute_signal_cached(
        &self,
        cache: &mut IndicatorCache,
        symbol: &str,
        timeframe: Timeframe,
        bars: Vec<PriceBar>,
    ) -> Result<Signal, SignalError> {
        let window = PriceWindow::new(symbol, timeframe, bars)?;
        let indicators =
            cache.get_or_compute(&window, &self.config.indicators, &self.config.regime)?;
        self.signal_from_indicators(&window, indicators)
    }

    /// Evaluate an already validated window.
    pub fn evaluate(&self, window: &PriceWindow) -> Result<Signal, SignalError> {
        let indicators =
            IndicatorSet::compute(window, &self.config.indicators, &self.config.regime)?;
        self.signal_from_indicators(window, indicators)
    }

    /// Compose and size a signal from precomputed indicators.
    pub fn signal_from_indicators(
        &self,
        window: &PriceWindow,
        indicators: IndicatorSet,
    ) -> Result<Signal, SignalError> {
        let last = window
            .last()
            .ok_or_else(|| SignalError::insufficient("signal", 1, 0))?;
        let entry_price = last.close;

        let mut composition = self.composer.compose(&indicators, entry_price);
        let mut levels = self.sizer.levels(
            composition.direction,
            entry_price,
            indicators.atr,
            window.timeframe(),
        );

        if let Some(l) = levels.filter(|l| l.touches_entry(entry_price)) {
            let reason = if l.is_zero_distance() {
                "ATR is zero: no stop distance, downgraded to NEUTRAL"
            } else {
                "ATR too small for the entry price: stop rounds onto entry, downgraded to NEUTRAL"
            };
            warn!(
                symbol = window.symbol(),
                timeframe = %window.timeframe(),
                direction = %composition.direction,
                atr = indicators.atr,
                "{reason}"
            );
            composition.direction = Direction::Neutral;
            composition.confidence = self.config.scoring.confidence_floor;
            composition.rationale.push(reason.to_string());
            levels = None;
        }

        debug!(
            symbol = window.symbol(),
            timeframe = %window.timeframe(),
            bars = window.len(),
            regime = %indicators.market_regime,
            bullish = composition.score.bullish,
            bearish = composition.score.bearish,
            direction = %composition.direction,
            confidence = composition.confidence,
            "signal composed"
        );

        Ok(Signal {
            symbol: window.symbol().to_string(),
            timeframe: window.timeframe(),
            direction: composition.direction,
            confidence: composition.confidence,
            entry_price,
            stop_loss: levels.map(|l| l.stop_loss),
            take_profit: levels.map(|l| l.take_profit),
            indicators,
            timestamp: last.timestamp,
            rationale: composition.rationale,
            score: composition.score,
            config_version: self.config.version,
        })
    }
}
