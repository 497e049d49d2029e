//! Output collaborators: signal and trade sinks, last-seen store.

use std::collections::HashMap;

use crate::error::SinkError;
use crate::types::{Signal, Trade};

/// Append-only destination for emitted signals.
pub trait SignalSink: Send + Sync {
    fn write_signals(&self, signals: &[Signal]) -> Result<(), SinkError>;
}

/// Destination for a backtest trade ledger.
pub trait TradeSink: Send + Sync {
    fn write_trades(&self, trades: &[Trade]) -> Result<(), SinkError>;
}

/// Persistent symbol -> last signal timestamp (ms) map.
pub trait LastSeenStore: Send + Sync {
    /// Read the map; a store that was never written yields an empty map.
    fn load(&self) -> Result<HashMap<String, i64>, SinkError>;

    fn save(&self, last_seen: &HashMap<String, i64>) -> Result<(), SinkError>;
}
