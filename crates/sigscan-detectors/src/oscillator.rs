//! Single-bar oscillator detectors.
//!
//! All three enter at the bar's close with the stop at the bar's opposite
//! extreme (low for BUY, high for SELL).

use sigscan_core::error::DetectorError;
use sigscan_core::traits::PatternDetector;
use sigscan_core::types::{AnalyzedSeries, DetectorKind, Direction, Signal};

use crate::cursor::{signal_at, Cursor};
use crate::settings::{RsiThresholds, StochasticBands};

fn bar_signal(
    series: &AnalyzedSeries,
    index: usize,
    kind: DetectorKind,
    direction: Direction,
    take_profit_ratio: Option<f64>,
) -> Option<Signal> {
    let bar = series.bar(index)?;
    let stop = match direction {
        Direction::Buy => bar.low,
        Direction::Sell => bar.high,
    };
    Some(signal_at(
        series,
        index,
        kind,
        direction,
        bar.close,
        stop,
        take_profit_ratio,
    ))
}

/// RSI below oversold is a BUY, above overbought a SELL. The bear regime
/// swaps in its own pair of levels.
#[derive(Debug, Clone, Default)]
pub struct RsiLevelDetector {
    thresholds: RsiThresholds,
    take_profit_ratio: Option<f64>,
    cursor: Cursor,
}

impl RsiLevelDetector {
    pub fn new(thresholds: RsiThresholds, take_profit_ratio: Option<f64>) -> Self {
        Self {
            thresholds,
            take_profit_ratio,
            cursor: Cursor::default(),
        }
    }

    /// `(oversold, overbought)` for the given regime.
    pub fn levels(&self, bear: bool) -> (f64, f64) {
        if bear {
            (self.thresholds.bear_oversold, self.thresholds.bear_overbought)
        } else {
            (self.thresholds.oversold, self.thresholds.overbought)
        }
    }
}

impl PatternDetector for RsiLevelDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Rsi
    }

    fn min_bars(&self) -> usize {
        1
    }

    fn detect(
        &mut self,
        series: &AnalyzedSeries,
        index: usize,
    ) -> Result<Option<Signal>, DetectorError> {
        self.cursor.advance(series, index)?;

        let Some(rsi) = series.frame(index).and_then(|f| f.rsi) else {
            return Ok(None);
        };
        let bear = series.regime(index).unwrap_or_default().bear_condition;
        let (oversold, overbought) = self.levels(bear);

        let direction = if rsi < oversold {
            Direction::Buy
        } else if rsi > overbought {
            Direction::Sell
        } else {
            return Ok(None);
        };
        Ok(bar_signal(series, index, self.kind(), direction, self.take_profit_ratio))
    }

    fn reset(&mut self) {
        self.cursor.reset();
    }
}

/// %D dropping through the lower band in a bull regime is a BUY; rising through
/// the upper band in a bear regime is a SELL.
#[derive(Debug, Clone, Default)]
pub struct StochasticCrossDetector {
    bands: StochasticBands,
    take_profit_ratio: Option<f64>,
    cursor: Cursor,
}

impl StochasticCrossDetector {
    pub fn new(bands: StochasticBands, take_profit_ratio: Option<f64>) -> Self {
        Self {
            bands,
            take_profit_ratio,
            cursor: Cursor::default(),
        }
    }
}

impl PatternDetector for StochasticCrossDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Stochastic
    }

    fn min_bars(&self) -> usize {
        2
    }

    fn detect(
        &mut self,
        series: &AnalyzedSeries,
        index: usize,
    ) -> Result<Option<Signal>, DetectorError> {
        self.cursor.advance(series, index)?;
        if index == 0 {
            return Ok(None);
        }

        let frames = series.frames();
        let (Some(prev), Some(curr)) = (frames[index - 1].stoch_d, frames[index].stoch_d) else {
            return Ok(None);
        };
        let regime = series.regime(index).unwrap_or_default();

        let direction = if regime.bull_condition && prev >= self.bands.lower && curr < self.bands.lower {
            Direction::Buy
        } else if regime.bear_condition && prev <= self.bands.upper && curr > self.bands.upper {
            Direction::Sell
        } else {
            return Ok(None);
        };
        Ok(bar_signal(series, index, self.kind(), direction, self.take_profit_ratio))
    }

    fn reset(&mut self) {
        self.cursor.reset();
    }
}

/// MACD histogram shrinking toward zero: two negative bars with the second
/// higher is a BUY, two positive bars with the second lower is a SELL.
#[derive(Debug, Clone, Default)]
pub struct MacdHistogramDetector {
    take_profit_ratio: Option<f64>,
    cursor: Cursor,
}

impl MacdHistogramDetector {
    pub fn new(take_profit_ratio: Option<f64>) -> Self {
        Self {
            take_profit_ratio,
            cursor: Cursor::default(),
        }
    }
}

impl PatternDetector for MacdHistogramDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::MacdHistogram
    }

    fn min_bars(&self) -> usize {
        2
    }

    fn detect(
        &mut self,
        series: &AnalyzedSeries,
        index: usize,
    ) -> Result<Option<Signal>, DetectorError> {
        self.cursor.advance(series, index)?;
        if index == 0 {
            return Ok(None);
        }

        let frames = series.frames();
        let (Some(prev), Some(curr)) = (frames[index - 1].macd_hist, frames[index].macd_hist) else {
            return Ok(None);
        };

        let direction = if prev < 0.0 && curr < 0.0 && curr > prev {
            Direction::Buy
        } else if prev > 0.0 && curr > 0.0 && curr < prev {
            Direction::Sell
        } else {
            return Ok(None);
        };
        Ok(bar_signal(series, index, self.kind(), direction, self.take_profit_ratio))
    }

    fn reset(&mut self) {
        self.cursor.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{analyzed_with, flat_bars};
    use sigscan_core::types::{IndicatorFrame, RegimeFlags};

    fn frames_with(values: &[Option<f64>], set: fn(&mut IndicatorFrame, Option<f64>)) -> Vec<IndicatorFrame> {
        values
            .iter()
            .map(|v| {
                let mut frame = IndicatorFrame::default();
                set(&mut frame, *v);
                frame
            })
            .collect()
    }

    #[test]
    fn test_rsi_levels_follow_regime() {
        let rsi = [Some(35.0), Some(35.0), Some(75.0), Some(75.0), None];
        let regimes = vec![
            RegimeFlags::NEUTRAL,
            RegimeFlags::BEAR,
            RegimeFlags::NEUTRAL,
            RegimeFlags::BEAR,
            RegimeFlags::NEUTRAL,
        ];
        let series = analyzed_with(
            flat_bars(5, 100.0),
            frames_with(&rsi, |f, v| f.rsi = v),
            regimes,
        );

        let mut detector = RsiLevelDetector::default();
        let signals = detector.scan(&series).unwrap();

        // 35 is only oversold under bear (40), 75 only overbought outside it (70)
        assert_eq!(signals.len(), 2);
        assert_eq!((signals[0].bar_index, signals[0].direction), (1, Direction::Buy));
        assert_eq!((signals[1].bar_index, signals[1].direction), (2, Direction::Sell));

        assert_eq!(signals[0].entry_price, 100.0);
        assert_eq!(signals[0].stop_loss, 99.0);
        assert_eq!(signals[1].stop_loss, 101.0);
        assert_eq!(signals[0].indicators.rsi, Some(35.0));
    }

    #[test]
    fn test_stochastic_cross_is_regime_gated() {
        let d = [Some(15.0), Some(8.0), Some(85.0), Some(95.0)];
        let frames = frames_with(&d, |f, v| f.stoch_d = v);

        let neutral = analyzed_with(flat_bars(4, 100.0), frames.clone(), vec![RegimeFlags::NEUTRAL; 4]);
        let mut detector = StochasticCrossDetector::default();
        assert!(detector.scan(&neutral).unwrap().is_empty());

        let bull = analyzed_with(flat_bars(4, 100.0), frames.clone(), vec![RegimeFlags::BULL; 4]);
        let signals = detector.scan(&bull).unwrap();
        assert_eq!(signals.len(), 1);
        assert_eq!((signals[0].bar_index, signals[0].direction), (1, Direction::Buy));

        let bear = analyzed_with(flat_bars(4, 100.0), frames, vec![RegimeFlags::BEAR; 4]);
        let signals = detector.scan(&bear).unwrap();
        assert_eq!(signals.len(), 1);
        assert_eq!((signals[0].bar_index, signals[0].direction), (3, Direction::Sell));
    }

    #[test]
    fn test_macd_histogram_shrinking() {
        let hist = [None, Some(-2.0), Some(-1.0), Some(-1.5), Some(1.0), Some(2.0), Some(1.5)];
        let series = analyzed_with(
            flat_bars(7, 100.0),
            frames_with(&hist, |f, v| f.macd_hist = v),
            vec![RegimeFlags::NEUTRAL; 7],
        );

        let mut detector = MacdHistogramDetector::new(Some(2.0));
        let signals = detector.scan(&series).unwrap();

        assert_eq!(signals.len(), 2);
        assert_eq!((signals[0].bar_index, signals[0].direction), (2, Direction::Buy));
        assert_eq!(signals[0].take_profit, Some(102.0));
        assert_eq!((signals[1].bar_index, signals[1].direction), (6, Direction::Sell));
    }
}
