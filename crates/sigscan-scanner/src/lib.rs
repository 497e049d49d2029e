//! Live signal scanning.
//!
//! A scan round fetches every instrument in the universe, runs the indicator pipeline
//! and the configured detector, and emits each signal found on the latest bar once.
//! Repeat signals are suppressed through a persisted last-seen map. Equity venues are
//! only fetched during their market session.

mod format;
mod market_hours;
mod orchestrator;
mod settings;
mod sinks;
mod store;

pub use format::format_signal_message;
pub use market_hours::{MarketGate, MarketHours};
pub use orchestrator::{RoundReport, ScanOrchestrator, SymbolOutcome};
pub use settings::ScanSettings;
pub use sinks::{CsvSignalSink, CsvTradeSink, SIGNAL_HEADER, TRADE_HEADER};
pub use store::JsonLastSeenStore;
