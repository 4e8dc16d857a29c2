//! Supported bar timeframes.
//!
//! The set is closed: anything outside it is rejected with
//! `SignalError::InvalidTimeframe` before computation starts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SignalError;

/// Bar granularity, ordered shortest to longest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Timeframe {
    M1,
    M5,
    M15,
    M30,
    H1,
    H4,
    D1,
    D3,
    W1,
    Mo1,
}

impl Timeframe {
    pub const ALL: [Timeframe; 10] = [
        Timeframe::M1,
        Timeframe::M5,
        Timeframe::M15,
        Timeframe::M30,
        Timeframe::H1,
        Timeframe::H4,
        Timeframe::D1,
        Timeframe::D3,
        Timeframe::W1,
        Timeframe::Mo1,
    ];

    /// Canonical interval string (`1m` is a minute, `1M` a month).
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::M1 => "1m",
            Self::M5 => "5m",
            Self::M15 => "15m",
            Self::M30 => "30m",
            Self::H1 => "1h",
            Self::H4 => "4h",
            Self::D1 => "1d",
            Self::D3 => "3d",
            Self::W1 => "1w",
            Self::Mo1 => "1M",
        }
    }

    /// Nominal bar duration in seconds. A month counts as 30 days.
    pub const fn duration_secs(&self) -> u64 {
        match self {
            Self::M1 => 60,
            Self::M5 => 300,
            Self::M15 => 900,
            Self::M30 => 1_800,
            Self::H1 => 3_600,
            Self::H4 => 14_400,
            Self::D1 => 86_400,
            Self::D3 => 259_200,
            Self::W1 => 604_800,
            Self::Mo1 => 2_592_000,
        }
    }

    /// Bars per year on a 24/7 market, used to annualize per-bar volatility.
    pub fn periods_per_year(&self) -> f64 {
        const SECS_PER_YEAR: f64 = 365.0 * 86_400.0;
        match self {
            Self::Mo1 => 12.0,
            other => SECS_PER_YEAR / other.duration_secs() as f64,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timeframe::ALL
            .iter()
            .copied()
            .find(|tf| tf.as_str() == s)
            .ok_or_else(|| SignalError::InvalidTimeframe(s.to_string()))
    }
}

impl TryFrom<String> for Timeframe {
    type Error = SignalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timeframe> for String {
    fn from(tf: Timeframe) -> Self {
        tf.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_variant() {
        for tf in Timeframe::ALL {
            assert_eq!(tf.as_str().parse::<Timeframe>().unwrap(), tf);
        }
    }

    #[test]
    fn minute_and_month_are_distinct() {
        assert_eq!("1m".parse::<Timeframe>().unwrap(), Timeframe::M1);
        assert_eq!("1M".parse::<Timeframe>().unwrap(), Timeframe::Mo1);
    }

    #[test]
    fn unknown_interval_rejected() {
        let err = "2h".parse::<Timeframe>().unwrap_err();
        assert_eq!(err, SignalError::InvalidTimeframe("2h".into()));
        assert!("".parse::<Timeframe>().is_err());
        assert!("1H".parse::<Timeframe>().is_err());
    }

    #[test]
    fn ordering_is_shortest_first() {
        let mut sorted = Timeframe::ALL;
        sorted.sort();
        assert_eq!(sorted, Timeframe::ALL);
    }

    #[test]
    fn periods_per_year() {
        assert!((Timeframe::D1.periods_per_year() - 365.0).abs() < 1e-9);
        assert!((Timeframe::H1.periods_per_year() - 8_760.0).abs() < 1e-9);
        assert_eq!(Timeframe::Mo1.periods_per_year(), 12.0);
    }

    #[test]
    fn serde_uses_interval_string() {
        let json = serde_json::to_string(&Timeframe::H4).unwrap();
        assert_eq!(json, "\"4h\"");
        let tf: Timeframe = serde_json::from_str("\"1w\"").unwrap();
        assert_eq!(tf, Timeframe::W1);
        assert!(serde_json::from_str::<Timeframe>("\"7d\"").is_err());
    }
}
