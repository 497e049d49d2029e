//! Core traits for the signal scanner.

mod data_source;
mod detector;
mod indicator;
mod notifier;
mod sink;

pub use data_source::DataSource;
pub use detector::PatternDetector;
pub use indicator::{Indicator, MultiOutputIndicator, OhlcIndicator};
pub use notifier::Notifier;
pub use sink::{LastSeenStore, SignalSink, TradeSink};
