//! Core data types for the signal scanner.

mod frame;
mod ohlcv;
mod signal;
mod timeframe;
mod trade;
mod universe;

pub use frame::{AnalyzedSeries, IndicatorFrame, IndicatorSnapshot, RegimeFlags};
pub use ohlcv::{Bar, BarSeries, RejectedBar, TIMESTAMP_FORMAT};
pub use signal::{DetectorKind, Direction, Signal};
pub use timeframe::Timeframe;
pub use trade::{return_pct, round_to, ExitReason, Trade};
pub use universe::{Instrument, SymbolUniverse, DEFAULT_VENUE};
