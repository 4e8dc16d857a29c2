//! SignalLab Core: indicators, regime classification, signal composition
//! and position sizing.
//!
//! This crate is pure computation:
//! - Domain types (bars, windows, timeframes, signals)
//! - Indicator library (RSI, EMA, MACD, Bollinger, ADX/DI, ATR, Stochastic,
//!   realized volatility) with an explicit insufficient-data policy
//! - Market regime classifier
//! - Weighted bullish/bearish signal composer
//! - ATR-based stop-loss / take-profit sizing
//! - Caller-owned indicator cache
//!
//! No I/O, no global state. Every evaluation is independent, so windows for
//! different (symbol, timeframe) pairs can be evaluated in parallel.

pub mod cache;
pub mod composer;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod regime;
pub mod sizer;

pub use cache::IndicatorCache;
pub use composer::{Composition, SignalComposer};
pub use config::{
    ConfigError, EngineConfig, IndicatorParams, RegimeThresholds, ScoringConfig, ScoringWeights,
    SizingConfig, CONFIG_VERSION,
};
pub use domain::{
    Direction, MarketRegime, PriceBar, PriceWindow, ScoreBreakdown, Signal, Timeframe,
};
pub use engine::SignalEngine;
pub use error::SignalError;
pub use indicators::IndicatorSet;
pub use sizer::{PositionLevels, PositionSizer};
