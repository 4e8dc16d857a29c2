//! Caller-owned indicator cache.
//!
//! One entry per (symbol, timeframe). Each entry remembers the BLAKE3
//! fingerprint of the window and the parameters it was computed with; a
//! lookup with any other window or parameters recomputes and supersedes the
//! entry. Correctness never depends on the cache: a hit returns exactly what
//! a fresh computation would, even when engines with different
//! configurations share one cache.

use std::collections::HashMap;

use crate::config::{IndicatorParams, RegimeThresholds};
use crate::domain::{PriceWindow, Timeframe};
use crate::error::SignalError;
use crate::indicators::IndicatorSet;

#[derive(Debug, Clone)]
struct CacheEntry {
    fingerprint: [u8; 32],
    params: IndicatorParams,
    thresholds: RegimeThresholds,
    indicators: IndicatorSet,
}

impl CacheEntry {
    fn matches(
        &self,
        fingerprint: &[u8; 32],
        params: &IndicatorParams,
        thresholds: &RegimeThresholds,
    ) -> bool {
        &self.fingerprint == fingerprint && &self.params == params && &self.thresholds == thresholds
    }
}

#[derive(Debug, Clone, Default)]
pub struct IndicatorCache {
    entries: HashMap<(String, Timeframe), CacheEntry>,
    hits: u64,
    misses: u64,
}

impl IndicatorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached set for this exact window and parameters, or a freshly
    /// computed one that replaces whatever was stored for the
    /// (symbol, timeframe) pair.
    pub fn get_or_compute(
        &mut self,
        window: &PriceWindow,
        params: &IndicatorParams,
        thresholds: &RegimeThresholds,
    ) -> Result<IndicatorSet, SignalError> {
        let key = (window.symbol().to_string(), window.timeframe());
        let fingerprint = window.fingerprint();

        if let Some(entry) = self.entries.get(&key) {
            if entry.matches(&fingerprint, params, thresholds) {
                self.hits += 1;
                return Ok(entry.indicators.clone());
            }
        }

        self.misses += 1;
        let indicators = IndicatorSet::compute(window, params, thresholds)?;
        self.entries.insert(
            key,
            CacheEntry {
                fingerprint,
                params: params.clone(),
                thresholds: thresholds.clone(),
                indicators: indicators.clone(),
            },
        );
        Ok(indicators)
    }

    /// Drop the entry for one pair. Returns true if there was one.
    pub fn invalidate(&mut self, symbol: &str, timeframe: Timeframe) -> bool {
        self.entries
            .remove(&(symbol.to_string(), timeframe))
            .is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (hits, misses) since construction.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
