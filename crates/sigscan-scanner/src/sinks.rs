//! CSV result sinks.

use csv::WriterBuilder;
use sigscan_core::error::SinkError;
use sigscan_core::traits::{SignalSink, TradeSink};
use sigscan_core::types::{Signal, Trade, TIMESTAMP_FORMAT};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const SIGNAL_HEADER: [&str; 12] = [
    "symbol",
    "signal",
    "strategy",
    "entry",
    "stop_loss",
    "take_profit",
    "rsi",
    "stoch_k",
    "stoch_d",
    "macd",
    "macd_signal",
    "timestamp",
];

pub const TRADE_HEADER: [&str; 9] = [
    "symbol",
    "strategy",
    "entry_index",
    "exit_index",
    "entry_price",
    "exit_price",
    "bars_held",
    "return_pct",
    "exit_reason",
];

fn io_error(path: &Path, source: std::io::Error) -> SinkError {
    SinkError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn csv_error(e: csv::Error) -> SinkError {
    SinkError::Csv(e.to_string())
}

fn optional(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

/// Append-only signal table. The header is written when the file is created.
#[derive(Debug)]
pub struct CsvSignalSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvSignalSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn row(signal: &Signal) -> [String; 12] {
        let ind = &signal.indicators;
        let timestamp = chrono::DateTime::from_timestamp_millis(signal.timestamp)
            .unwrap_or_default()
            .format(TIMESTAMP_FORMAT)
            .to_string();
        [
            signal.symbol.clone(),
            signal.direction.to_string(),
            signal.strategy.to_string(),
            signal.entry_price.to_string(),
            signal.stop_loss.to_string(),
            optional(signal.take_profit),
            optional(ind.rsi),
            optional(ind.stoch_k),
            optional(ind.stoch_d),
            optional(ind.macd),
            optional(ind.macd_signal),
            timestamp,
        ]
    }
}

impl SignalSink for CsvSignalSink {
    fn write_signals(&self, signals: &[Signal]) -> Result<(), SinkError> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let is_new = std::fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| io_error(&self.path, e))?;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if is_new {
            writer.write_record(SIGNAL_HEADER).map_err(csv_error)?;
        }
        for signal in signals {
            writer.write_record(Self::row(signal)).map_err(csv_error)?;
        }
        writer.flush().map_err(|e| io_error(&self.path, e))
    }
}

/// Backtest trade ledger, rewritten on every call.
#[derive(Debug, Clone)]
pub struct CsvTradeSink {
    path: PathBuf,
}

impl CsvTradeSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TradeSink for CsvTradeSink {
    fn write_trades(&self, trades: &[Trade]) -> Result<(), SinkError> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)
            .map_err(csv_error)?;

        writer.write_record(TRADE_HEADER).map_err(csv_error)?;
        for t in trades {
            writer
                .write_record([
                    t.symbol.clone(),
                    t.strategy.to_string(),
                    t.entry_index.to_string(),
                    t.exit_index.to_string(),
                    t.entry_price.to_string(),
                    t.exit_price.to_string(),
                    t.bars_held.to_string(),
                    t.return_pct.to_string(),
                    t.exit_reason.to_string(),
                ])
                .map_err(csv_error)?;
        }
        writer.flush().map_err(|e| io_error(&self.path, e))
    }
}
