//! Error taxonomy for signal computation.
//!
//! Every variant is a local, recoverable condition surfaced to the immediate
//! caller. Nothing in the engine panics on bad input.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    /// The window is shorter than the indicator's minimum. Recoverable by
    /// supplying more history; never substituted with a default value.
    #[error("insufficient data for {indicator}: need {required} bars, have {available}")]
    InsufficientData {
        indicator: String,
        required: usize,
        available: usize,
    },

    #[error("invalid timeframe: {0:?}")]
    InvalidTimeframe(String),

    #[error("invalid symbol: {0:?}")]
    InvalidSymbol(String),

    /// Input that cannot produce a finite result (non-finite prices,
    /// non-positive closes for log returns, out-of-order bars).
    #[error("degenerate input: {reason}")]
    DegenerateInput { reason: String },
}

impl SignalError {
    pub fn insufficient(indicator: impl Into<String>, required: usize, available: usize) -> Self {
        Self::InsufficientData {
            indicator: indicator.into(),
            required,
            available,
        }
    }

    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateInput {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_message_names_indicator() {
        let err = SignalError::insufficient("rsi_14", 15, 10);
        assert_eq!(
            err.to_string(),
            "insufficient data for rsi_14: need 15 bars, have 10"
        );
    }

    #[test]
    fn degenerate_message() {
        let err = SignalError::degenerate("close is NaN at bar 3");
        assert_eq!(err.to_string(), "degenerate input: close is NaN at bar 3");
    }
}
