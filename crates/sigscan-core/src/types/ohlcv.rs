//! OHLC bar and bar series types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Timeframe;
use crate::error::BarError;

/// Timestamp layout used by signal sinks and notifications.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single OHLC sample for one interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Trading volume, zero when the vendor omits it
    #[serde(default)]
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Calculate the typical price (HLC average).
    #[inline]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Calculate the bar's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Get the timestamp as a DateTime, falling back to the epoch when out of range.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or_default()
    }

    /// Timestamp rendered as `YYYY-MM-DD HH:MM:SS` (UTC).
    pub fn formatted_timestamp(&self) -> String {
        self.datetime().format(TIMESTAMP_FORMAT).to_string()
    }

    /// Check finiteness and `high >= max(open, close) >= min(open, close) >= low`.
    pub fn validate(&self) -> Result<(), BarError> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite()) {
            return Err(BarError::NonFinite {
                timestamp: self.timestamp,
            });
        }

        let body_top = self.open.max(self.close);
        let body_bottom = self.open.min(self.close);
        if self.high < body_top || body_bottom < self.low {
            return Err(BarError::OhlcOrder {
                timestamp: self.timestamp,
                open: self.open,
                high: self.high,
                low: self.low,
                close: self.close,
            });
        }

        Ok(())
    }
}

/// A bar dropped while building a series, with its position in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedBar {
    pub input_index: usize,
    pub bar: Bar,
    pub reason: BarError,
}

/// Ordered bar history for one symbol.
///
/// Bars are strictly ascending by timestamp. The series is append-only while it is
/// being built and is never modified by indicator or detector code.
#[derive(Debug, Clone)]
pub struct BarSeries {
    /// Symbol identifier
    pub symbol: String,
    /// Timeframe of the bars
    pub timeframe: Timeframe,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Create a new empty bar series.
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            bars: Vec::new(),
        }
    }

    /// Build a series from raw vendor bars, dropping malformed ones.
    ///
    /// Fails only when nothing survives validation.
    pub fn from_bars_validated(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        bars: impl IntoIterator<Item = Bar>,
    ) -> Result<(Self, Vec<RejectedBar>), BarError> {
        let mut series = Self::new(symbol, timeframe);
        let mut rejected = Vec::new();

        for (input_index, bar) in bars.into_iter().enumerate() {
            if let Err(reason) = series.try_push(bar) {
                debug!(symbol = %series.symbol, %reason, "rejecting bar");
                rejected.push(RejectedBar {
                    input_index,
                    bar,
                    reason,
                });
            }
        }

        if series.is_empty() {
            return Err(BarError::EmptySeries {
                rejected: rejected.len(),
            });
        }

        Ok((series, rejected))
    }

    /// Append a bar after validating it against the series ordering.
    pub fn try_push(&mut self, bar: Bar) -> Result<(), BarError> {
        bar.validate()?;
        if let Some(last) = self.bars.last() {
            if bar.timestamp <= last.timestamp {
                return Err(BarError::NotAscending {
                    timestamp: bar.timestamp,
                    previous: last.timestamp,
                });
            }
        }
        self.bars.push(bar);
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars as a slice.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Get a bar by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Extract high prices as a vector.
    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    /// Extract low prices as a vector.
    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// Extract typical prices as a vector.
    pub fn typical_prices(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.typical_price()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ts: i64, close: f64) -> Bar {
        Bar::new(ts, close, close + 1.0, close - 1.0, close, 1000.0)
    }

    #[test]
    fn test_bar_calculations() {
        let bar = Bar::new(1000, 100.0, 110.0, 95.0, 105.0, 1000000.0);

        assert!((bar.typical_price() - 103.333333).abs() < 0.001);
        assert!((bar.range() - 15.0).abs() < 0.001);
        assert!(bar.is_bullish());
    }

    #[test]
    fn test_bar_validation() {
        assert!(Bar::new(1, 100.0, 101.0, 99.0, 100.5, 0.0).validate().is_ok());

        let high_below_close = Bar::new(1, 100.0, 100.2, 99.0, 100.5, 0.0);
        assert!(matches!(
            high_below_close.validate(),
            Err(BarError::OhlcOrder { .. })
        ));

        let nan = Bar::new(1, f64::NAN, 101.0, 99.0, 100.5, 0.0);
        assert!(matches!(nan.validate(), Err(BarError::NonFinite { .. })));
    }

    #[test]
    fn test_formatted_timestamp() {
        // 2024-01-15 10:30:00 UTC
        let bar = bar(1_705_314_600_000, 100.0);
        assert_eq!(bar.formatted_timestamp(), "2024-01-15 10:30:00");
    }

    #[test]
    fn test_from_bars_rejects_duplicates_and_malformed() {
        let bars = vec![
            bar(1, 100.0),
            bar(2, 101.0),
            bar(2, 102.0),
            Bar::new(3, 100.0, 99.0, 98.0, 100.0, 0.0),
            bar(4, 103.0),
        ];

        let (series, rejected) = BarSeries::from_bars_validated("AAPL", Timeframe::Daily, bars).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![100.0, 101.0, 103.0]);
        assert_eq!(rejected.len(), 2);
        assert_eq!(rejected[0].input_index, 2);
        assert!(matches!(rejected[0].reason, BarError::NotAscending { .. }));
        assert!(matches!(rejected[1].reason, BarError::OhlcOrder { .. }));
    }

    #[test]
    fn test_from_bars_fails_when_nothing_survives() {
        let bars = vec![Bar::new(1, 100.0, 99.0, 98.0, 100.0, 0.0)];
        let result = BarSeries::from_bars_validated("AAPL", Timeframe::Daily, bars);
        assert_eq!(result.unwrap_err(), BarError::EmptySeries { rejected: 1 });
    }

    #[test]
    fn test_bar_series_extractions() {
        let mut series = BarSeries::new("AAPL", Timeframe::Daily);
        series.try_push(Bar::new(1, 100.0, 101.0, 99.0, 100.5, 1000.0)).unwrap();
        series.try_push(Bar::new(2, 100.5, 102.0, 100.0, 101.5, 2000.0)).unwrap();

        assert_eq!(series.closes(), vec![100.5, 101.5]);
        assert_eq!(series.highs(), vec![101.0, 102.0]);
        assert_eq!(series.lows(), vec![99.0, 100.0]);
        assert!(series.try_push(Bar::new(1, 100.0, 101.0, 99.0, 100.5, 0.0)).is_err());
    }
}
