//! PriceWindow: an ordered bar sequence for one (symbol, timeframe) pair.

use serde::{Deserialize, Serialize};

use super::{PriceBar, Timeframe};
use crate::error::SignalError;

/// Longest accepted symbol.
pub const MAX_SYMBOL_LEN: usize = 32;

/// Validate a symbol: non-empty, at most `MAX_SYMBOL_LEN` characters,
/// ASCII alphanumerics plus `-`, `_`, `/` and `.`.
pub fn validate_symbol(symbol: &str) -> Result<(), SignalError> {
    let well_formed = !symbol.is_empty()
        && symbol.len() <= MAX_SYMBOL_LEN
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/' | '.'));
    if well_formed {
        Ok(())
    } else {
        Err(SignalError::InvalidSymbol(symbol.to_string()))
    }
}

/// Validated price history, oldest first.
///
/// Construction rejects malformed symbols, non-finite prices and
/// timestamps that are not strictly increasing. Length requirements are
/// checked later by each indicator, since they are period-dependent.
/// Deserialization goes through the same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPriceWindow")]
pub struct PriceWindow {
    symbol: String,
    timeframe: Timeframe,
    bars: Vec<PriceBar>,
}

/// Unvalidated wire form of a `PriceWindow`.
#[derive(Deserialize)]
struct RawPriceWindow {
    symbol: String,
    timeframe: Timeframe,
    bars: Vec<PriceBar>,
}

impl TryFrom<RawPriceWindow> for PriceWindow {
    type Error = SignalError;

    fn try_from(raw: RawPriceWindow) -> Result<Self, Self::Error> {
        PriceWindow::new(raw.symbol, raw.timeframe, raw.bars)
    }
}

impl PriceWindow {
    pub fn new(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        bars: Vec<PriceBar>,
    ) -> Result<Self, SignalError> {
        let symbol = symbol.into();
        validate_symbol(&symbol)?;

        if let Some(i) = bars.iter().position(|b| !b.is_finite()) {
            return Err(SignalError::degenerate(format!(
                "non-finite price or volume at bar {i}"
            )));
        }
        if let Some(i) = bars
            .windows(2)
            .position(|w| w[1].timestamp <= w[0].timestamp)
        {
            return Err(SignalError::degenerate(format!(
                "bars not strictly increasing in time at bar {}",
                i + 1
            )));
        }

        Ok(Self {
            symbol,
            timeframe,
            bars,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// BLAKE3 content hash of the window (symbol, timeframe, every bar).
    ///
    /// Two windows with the same fingerprint produce the same indicators.
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.symbol.as_bytes());
        hasher.update(self.timeframe.as_str().as_bytes());
        for bar in &self.bars {
            hasher.update(&bar.timestamp.timestamp_millis().to_le_bytes());
            for v in [bar.open, bar.high, bar.low, bar.close, bar.volume] {
                hasher.update(&v.to_bits().to_le_bytes());
            }
        }
        *hasher.finalize().as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn accepts_common_symbols() {
        for s in ["BTC", "BTC-USD", "ETH/USDT", "BRK.B", "sol_perp"] {
            assert!(validate_symbol(s).is_ok(), "{s} should be valid");
        }
    }

    #[test]
    fn rejects_malformed_symbols() {
        assert!(validate_symbol("").is_err());
        assert!(validate_symbol("BTC USD").is_err());
        assert!(validate_symbol("BTC$").is_err());
        assert!(validate_symbol(&"X".repeat(MAX_SYMBOL_LEN + 1)).is_err());
    }

    #[test]
    fn rejects_out_of_order_bars() {
        let mut bars = make_bars(&[1.0, 2.0, 3.0]);
        bars.swap(1, 2);
        let err = PriceWindow::new("BTC", Timeframe::H1, bars).unwrap_err();
        assert!(matches!(err, SignalError::DegenerateInput { .. }));
    }

    #[test]
    fn rejects_duplicate_timestamps() {
        let mut bars = make_bars(&[1.0, 2.0]);
        bars[1].timestamp = bars[0].timestamp;
        assert!(PriceWindow::new("BTC", Timeframe::H1, bars).is_err());
    }

    #[test]
    fn rejects_nan_close() {
        let mut bars = make_bars(&[1.0, 2.0, 3.0]);
        bars[2].close = f64::NAN;
        let err = PriceWindow::new("BTC", Timeframe::H1, bars).unwrap_err();
        assert_eq!(
            err,
            SignalError::degenerate("non-finite price or volume at bar 2")
        );
    }

    #[test]
    fn empty_window_is_allowed() {
        let w = PriceWindow::new("BTC", Timeframe::D1, vec![]).unwrap();
        assert!(w.is_empty());
        assert!(w.last().is_none());
    }

    #[test]
    fn deserialization_validates() {
        let w = PriceWindow::new("BTC", Timeframe::H1, make_bars(&[1.0, 2.0, 3.0])).unwrap();
        let json = serde_json::to_string(&w).unwrap();
        let back: PriceWindow = serde_json::from_str(&json).unwrap();
        assert_eq!(back, w);

        let mut bars = make_bars(&[1.0, 2.0, 3.0]);
        bars.swap(0, 2);
        let unordered = serde_json::json!({
            "symbol": "BTC",
            "timeframe": "1h",
            "bars": bars,
        });
        let err = serde_json::from_value::<PriceWindow>(unordered).unwrap_err();
        assert!(err.to_string().contains("not strictly increasing"));

        let bad_symbol = serde_json::json!({
            "symbol": "BTC USD",
            "timeframe": "1h",
            "bars": [],
        });
        assert!(serde_json::from_value::<PriceWindow>(bad_symbol).is_err());
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = PriceWindow::new("BTC", Timeframe::H1, make_bars(&[1.0, 2.0, 3.0])).unwrap();
        let b = PriceWindow::new("BTC", Timeframe::H1, make_bars(&[1.0, 2.0, 3.0])).unwrap();
        let c = PriceWindow::new("BTC", Timeframe::H1, make_bars(&[1.0, 2.0, 3.5])).unwrap();
        let d = PriceWindow::new("BTC", Timeframe::H4, make_bars(&[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_ne!(a.fingerprint(), d.fingerprint());
    }
}
