//! Backtesting: replay a detector over history and score the simulated trades.

mod engine;
mod report;
mod simulator;
mod statistics;

pub use engine::{BacktestConfig, BacktestEngine, SymbolFailure};
pub use report::BacktestReport;
pub use simulator::PositionSimulator;
pub use statistics::{GroupSummary, LedgerStats};
