//! 1-2-3 swing breakout.
//!
//! Bars `i-3`, `i-2`, `i-1` form a higher low, a swing high and a pullback that
//! holds above the first low; bar `i` closes through the swing high. The mirror
//! pattern gives a SELL. Signals only fire in the matching trend regime.

use sigscan_core::error::DetectorError;
use sigscan_core::traits::PatternDetector;
use sigscan_core::types::{AnalyzedSeries, Bar, DetectorKind, Direction, Signal};

use crate::cursor::{signal_at, Cursor};

#[derive(Debug, Clone, Default)]
pub struct SwingBreakoutDetector {
    take_profit_ratio: Option<f64>,
    cursor: Cursor,
}

impl SwingBreakoutDetector {
    pub fn new(take_profit_ratio: Option<f64>) -> Self {
        Self {
            take_profit_ratio,
            cursor: Cursor::default(),
        }
    }

    fn bullish(p1: &Bar, p2: &Bar, p3: &Bar, p4: &Bar) -> bool {
        p1.low < p2.low && p2.high > p3.high && p3.low > p1.low && p4.close > p2.high
    }

    fn bearish(p1: &Bar, p2: &Bar, p3: &Bar, p4: &Bar) -> bool {
        p1.high > p2.high && p2.low < p3.low && p3.high < p1.high && p4.close < p2.low
    }
}

impl PatternDetector for SwingBreakoutDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::SwingBreakout
    }

    fn min_bars(&self) -> usize {
        4
    }

    fn detect(
        &mut self,
        series: &AnalyzedSeries,
        index: usize,
    ) -> Result<Option<Signal>, DetectorError> {
        self.cursor.advance(series, index)?;
        if index < 3 {
            return Ok(None);
        }

        let bars = &series.bars()[index - 3..=index];
        let (p1, p2, p3, p4) = (&bars[0], &bars[1], &bars[2], &bars[3]);
        let regime = series.regime(index).unwrap_or_default();

        let (direction, stop) = if regime.bull_condition && Self::bullish(p1, p2, p3, p4) {
            (Direction::Buy, p1.low)
        } else if regime.bear_condition && Self::bearish(p1, p2, p3, p4) {
            (Direction::Sell, p1.high)
        } else {
            return Ok(None);
        };

        Ok(Some(signal_at(
            series,
            index,
            self.kind(),
            direction,
            p4.close,
            stop,
            self.take_profit_ratio,
        )))
    }

    fn reset(&mut self) {
        self.cursor.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{analyzed, analyzed_with, bar};
    use sigscan_core::types::{IndicatorFrame, RegimeFlags};

    fn pattern_bars() -> Vec<Bar> {
        vec![
            bar(0, 10.0, 11.0, 9.0, 10.5),
            bar(1, 10.5, 13.0, 9.5, 12.0),  // swing high 13
            bar(2, 12.0, 12.5, 9.8, 10.5),  // pullback, low above 9
            bar(3, 10.5, 14.0, 10.4, 13.5), // close above 13
        ]
    }

    #[test]
    fn test_buy_requires_bull_regime() {
        let bars = pattern_bars();
        let frames = vec![IndicatorFrame::default(); 4];

        let neutral = analyzed_with(bars.clone(), frames.clone(), vec![RegimeFlags::NEUTRAL; 4]);
        let mut detector = SwingBreakoutDetector::default();
        assert!(detector.scan(&neutral).unwrap().is_empty());

        let bull = analyzed_with(bars, frames, vec![RegimeFlags::BULL; 4]);
        let signals = detector.scan(&bull).unwrap();
        assert_eq!(signals.len(), 1);

        let signal = &signals[0];
        assert_eq!(signal.bar_index, 3);
        assert_eq!(signal.direction, Direction::Buy);
        assert_eq!(signal.entry_price, 13.5);
        assert_eq!(signal.stop_loss, 9.0);
        assert_eq!(signal.strategy, DetectorKind::SwingBreakout);
    }

    #[test]
    fn test_sell_mirror() {
        let bars = vec![
            bar(0, 10.0, 12.0, 9.0, 10.0),
            bar(1, 10.0, 11.0, 7.0, 8.0), // swing low 7
            bar(2, 8.0, 10.0, 7.5, 9.0),  // pullback, high below 12
            bar(3, 9.0, 9.2, 6.0, 6.5),   // close below 7
        ];
        let series = analyzed_with(bars, vec![IndicatorFrame::default(); 4], vec![RegimeFlags::BEAR; 4]);

        let mut detector = SwingBreakoutDetector::new(Some(2.0));
        let signals = detector.scan(&series).unwrap();
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].direction, Direction::Sell);
        assert_eq!(signals[0].stop_loss, 12.0);
        assert_eq!(signals[0].take_profit, Some(6.5 - 2.0 * 5.5));
    }

    #[test]
    fn test_strictly_rising_closes_never_fire() {
        let series = analyzed(
            (0..300)
                .map(|i| {
                    let c = 100.0 + i as f64;
                    bar(i, c - 0.5, c + 0.5, c - 1.0, c)
                })
                .collect(),
        );
        assert!(series.regime(299).unwrap().bull_condition);

        let mut detector = SwingBreakoutDetector::default();
        assert!(detector.scan(&series).unwrap().is_empty());
    }

    #[test]
    fn test_backwards_index_is_an_error() {
        let series = analyzed_with(
            pattern_bars(),
            vec![IndicatorFrame::default(); 4],
            vec![RegimeFlags::NEUTRAL; 4],
        );
        let mut detector = SwingBreakoutDetector::default();
        detector.detect(&series, 2).unwrap();
        assert!(matches!(
            detector.detect(&series, 2),
            Err(DetectorError::NonForwardIndex { last: 2, requested: 2, .. })
        ));
        assert!(matches!(
            detector.detect(&series, 9),
            Err(DetectorError::IndexOutOfRange { .. })
        ));

        detector.reset();
        assert!(detector.detect(&series, 0).is_ok());
    }
}
