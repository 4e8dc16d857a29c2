//! Domain types for SignalLab

pub mod bar;
pub mod signal;
pub mod timeframe;
pub mod window;

pub use bar::PriceBar;
pub use signal::{Direction, MarketRegime, ScoreBreakdown, Signal};
pub use timeframe::Timeframe;
pub use window::{validate_symbol, PriceWindow, MAX_SYMBOL_LEN};
