//! Pattern detector trait.

use crate::error::DetectorError;
use crate::types::{AnalyzedSeries, DetectorKind, Signal};

/// A recognizer that yields at most one signal per bar.
///
/// Detectors are forward-only: each call must use a bar index greater than the
/// previous one until `reset` is called. Stateful detectors keep their setup
/// for the symbol they are currently walking.
pub trait PatternDetector: Send {
    /// Which detector family this is.
    fn kind(&self) -> DetectorKind;

    /// Bars needed before the pattern can possibly match.
    fn min_bars(&self) -> usize;

    /// Evaluate bar `index` of `series`.
    fn detect(
        &mut self,
        series: &AnalyzedSeries,
        index: usize,
    ) -> Result<Option<Signal>, DetectorError>;

    /// Forget all per-symbol state.
    fn reset(&mut self);

    /// Replay the whole series from a clean state and collect every signal.
    fn scan(&mut self, series: &AnalyzedSeries) -> Result<Vec<Signal>, DetectorError> {
        self.reset();
        let mut signals = Vec::new();
        for index in 0..series.len() {
            if let Some(signal) = self.detect(series, index)? {
                signals.push(signal);
            }
        }
        Ok(signals)
    }
}
