//! Error types for the signal scanner.

use thiserror::Error;

/// Top-level scanner error.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Malformed bar: {0}")]
    Bar(#[from] BarError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Detector error: {0}")]
    Detector(#[from] DetectorError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    #[error("Task for {symbol} failed: {source}")]
    TaskFailure {
        symbol: String,
        #[source]
        source: Box<ScanError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScanError {
    /// Wrap an error raised inside one symbol's task.
    pub fn task_failure(symbol: impl Into<String>, source: impl Into<ScanError>) -> Self {
        ScanError::TaskFailure {
            symbol: symbol.into(),
            source: Box::new(source.into()),
        }
    }
}

/// Reasons a single bar is rejected from a series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BarError {
    #[error("non-finite price at timestamp {timestamp}")]
    NonFinite { timestamp: i64 },

    #[error("OHLC ordering violated at timestamp {timestamp}: o={open} h={high} l={low} c={close}")]
    OhlcOrder {
        timestamp: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    },

    #[error("timestamp {timestamp} is not after previous timestamp {previous}")]
    NotAscending { timestamp: i64, previous: i64 },

    #[error("every bar was rejected ({rejected} malformed)")]
    EmptySeries { rejected: usize },
}

/// Market-data and universe errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No source configured for venue: {0}")]
    UnroutedVenue(String),

    #[error("Invalid timeframe: {0}")]
    InvalidTimeframe(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Data source error: {0}")]
    Internal(String),
}

/// Indicator calculation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Frame misalignment: {bars} bars, {frames} frames, {regimes} regime flags")]
    Misaligned {
        bars: usize,
        frames: usize,
        regimes: usize,
    },
}

/// Pattern detector errors.
///
/// State errors indicate a bug in the caller or the detector and are never
/// absorbed by the scan loop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectorError {
    #[error("{symbol}: setup triggered at bar {active} is still active, cannot arm a new one at bar {requested}")]
    SetupAlreadyActive {
        symbol: String,
        active: usize,
        requested: usize,
    },

    #[error("{symbol}: bar {requested} is not after the last processed bar {last}")]
    NonForwardIndex {
        symbol: String,
        last: usize,
        requested: usize,
    },

    #[error("{symbol}: bar {index} is out of range for a series of {len} bars")]
    IndexOutOfRange {
        symbol: String,
        index: usize,
        len: usize,
    },

    #[error("Invalid detector configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown detector: {0}")]
    NotFound(String),
}

/// Errors from result sinks and the last-seen store.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Notification delivery errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Notifier not configured: {0}")]
    NotConfigured(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Result type alias for scanner operations.
pub type ScanResult<T> = Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_failure_keeps_symbol_context() {
        let err = ScanError::task_failure("BTC-USDT", DataError::ApiError("429".into()));
        let message = err.to_string();
        assert!(message.contains("BTC-USDT"));
        assert!(message.contains("429"));
    }

    #[test]
    fn test_detector_error_display() {
        let err = DetectorError::SetupAlreadyActive {
            symbol: "AAPL".into(),
            active: 10,
            requested: 11,
        };
        assert!(err.to_string().contains("bar 10"));
    }
}
