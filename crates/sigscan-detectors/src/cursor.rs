//! Forward-only bar cursor shared by all detectors.

use sigscan_core::error::DetectorError;
use sigscan_core::types::{AnalyzedSeries, DetectorKind, Direction, Signal};

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Cursor {
    last: Option<usize>,
}

impl Cursor {
    /// Move to `index`, which must be in range and after the last visited bar.
    pub(crate) fn advance(&mut self, series: &AnalyzedSeries, index: usize) -> Result<(), DetectorError> {
        if index >= series.len() {
            return Err(DetectorError::IndexOutOfRange {
                symbol: series.symbol().to_string(),
                index,
                len: series.len(),
            });
        }
        if let Some(last) = self.last {
            if index <= last {
                return Err(DetectorError::NonForwardIndex {
                    symbol: series.symbol().to_string(),
                    last,
                    requested: index,
                });
            }
        }
        self.last = Some(index);
        Ok(())
    }

    pub(crate) fn reset(&mut self) {
        self.last = None;
    }
}

/// Build a signal for bar `index` with the frame's oscillator snapshot.
pub(crate) fn signal_at(
    series: &AnalyzedSeries,
    index: usize,
    kind: DetectorKind,
    direction: Direction,
    entry_price: f64,
    stop_loss: f64,
    take_profit_ratio: Option<f64>,
) -> Signal {
    Signal {
        symbol: series.symbol().to_string(),
        bar_index: index,
        timestamp: series.bar(index).map(|b| b.timestamp).unwrap_or_default(),
        direction,
        strategy: kind,
        entry_price,
        stop_loss,
        take_profit: None,
        indicators: series.frame(index).map(|f| f.snapshot()).unwrap_or_default(),
    }
    .with_take_profit_ratio(take_profit_ratio)
}
