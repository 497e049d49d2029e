//! Long-only position state machine.

use sigscan_core::error::DetectorError;
use sigscan_core::traits::PatternDetector;
use sigscan_core::types::{AnalyzedSeries, DetectorKind, Direction, ExitReason, Signal, Trade};

/// Position state
#[derive(Debug, Clone, Copy, PartialEq)]
enum PositionState {
    Flat,
    Long { entry_index: usize, entry_price: f64 },
}

/// Replays one symbol's signals into non-overlapping long trades.
///
/// BUY while flat enters at that bar's close. While long, a SELL or reaching
/// `max_hold` bars exits at the close; the entry bar itself never exits. SELL
/// while flat is ignored. A position still open at the end of data is dropped.
#[derive(Debug, Clone, Copy)]
pub struct PositionSimulator {
    max_hold: usize,
}

impl PositionSimulator {
    pub fn new(max_hold: usize) -> Self {
        Self {
            max_hold: max_hold.max(1),
        }
    }

    pub fn max_hold(&self) -> usize {
        self.max_hold
    }

    /// Walk the detector over the series and simulate its signals.
    pub fn run<D: PatternDetector + ?Sized>(
        &self,
        detector: &mut D,
        series: &AnalyzedSeries,
    ) -> Result<Vec<Trade>, DetectorError> {
        let signals = detector.scan(series)?;
        Ok(self.replay(series, detector.kind(), &signals))
    }

    /// Simulate an already collected signal stream.
    pub fn replay(&self, series: &AnalyzedSeries, strategy: DetectorKind, signals: &[Signal]) -> Vec<Trade> {
        let mut directions: Vec<Option<Direction>> = vec![None; series.len()];
        for signal in signals {
            if let Some(slot) = directions.get_mut(signal.bar_index) {
                *slot = Some(signal.direction);
            }
        }

        let mut trades = Vec::new();
        let mut state = PositionState::Flat;

        for (i, bar) in series.bars().iter().enumerate() {
            let signal = directions[i];
            match state {
                PositionState::Flat => {
                    if signal == Some(Direction::Buy) {
                        state = PositionState::Long {
                            entry_index: i,
                            entry_price: bar.close,
                        };
                    }
                }
                PositionState::Long {
                    entry_index,
                    entry_price,
                } => {
                    let reason = if signal == Some(Direction::Sell) {
                        Some(ExitReason::Signal)
                    } else if i - entry_index >= self.max_hold {
                        Some(ExitReason::Timeout)
                    } else {
                        None
                    };

                    if let Some(reason) = reason {
                        trades.push(Trade::new(
                            series.symbol(),
                            strategy,
                            entry_index,
                            i,
                            entry_price,
                            bar.close,
                            reason,
                        ));
                        state = PositionState::Flat;
                    }
                }
            }
        }

        trades
    }
}

impl Default for PositionSimulator {
    fn default() -> Self {
        Self::new(7)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigscan_core::types::{
        Bar, BarSeries, IndicatorFrame, IndicatorSnapshot, RegimeFlags, Timeframe,
    };

    fn series(closes: &[f64]) -> AnalyzedSeries {
        let mut series = BarSeries::new("TEST", Timeframe::Daily);
        for (i, &c) in closes.iter().enumerate() {
            series
                .try_push(Bar::new(i as i64, c, c + 1.0, c - 1.0, c, 0.0))
                .unwrap();
        }
        let n = closes.len();
        AnalyzedSeries::new(series, vec![IndicatorFrame::default(); n], vec![RegimeFlags::NEUTRAL; n])
            .unwrap()
    }

    fn signal(bar_index: usize, direction: Direction) -> Signal {
        Signal {
            symbol: "TEST".into(),
            bar_index,
            timestamp: bar_index as i64,
            direction,
            strategy: DetectorKind::Rsi,
            entry_price: 0.0,
            stop_loss: 0.0,
            take_profit: None,
            indicators: IndicatorSnapshot::default(),
        }
    }

    #[test]
    fn test_exit_on_sell_signal() {
        let series = series(&[100.0, 101.0, 102.0, 110.0, 104.0]);
        let signals = vec![signal(1, Direction::Buy), signal(3, Direction::Sell)];

        let trades = PositionSimulator::new(7).replay(&series, DetectorKind::Rsi, &signals);

        assert_eq!(trades.len(), 1);
        let trade = &trades[0];
        assert_eq!((trade.entry_index, trade.exit_index), (1, 3));
        assert_eq!(trade.entry_price, 101.0);
        assert_eq!(trade.exit_price, 110.0);
        assert_eq!(trade.bars_held, 2);
        assert_eq!(trade.return_pct, 8.91);
        assert_eq!(trade.exit_reason, ExitReason::Signal);
    }

    #[test]
    fn test_exit_on_timeout() {
        let closes: Vec<f64> = (0..12).map(|i| 100.0 - i as f64).collect();
        let series = series(&closes);
        let signals = vec![signal(2, Direction::Buy), signal(3, Direction::Buy)];

        let trades = PositionSimulator::new(3).replay(&series, DetectorKind::Rsi, &signals);

        assert_eq!(trades.len(), 1);
        assert_eq!((trades[0].entry_index, trades[0].exit_index), (2, 5));
        assert_eq!(trades[0].exit_reason, ExitReason::Timeout);
        assert!(trades[0].return_pct < 0.0);
    }

    #[test]
    fn test_sell_while_flat_ignored_and_open_position_dropped() {
        let series = series(&[100.0, 101.0, 102.0, 103.0]);
        let signals = vec![signal(0, Direction::Sell), signal(2, Direction::Buy)];

        let trades = PositionSimulator::new(7).replay(&series, DetectorKind::Rsi, &signals);
        assert!(trades.is_empty());
    }

    #[test]
    fn test_trades_never_overlap() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let series = series(&closes);
        let signals: Vec<Signal> = (0..60)
            .map(|i| {
                let direction = if i % 5 == 0 { Direction::Sell } else { Direction::Buy };
                signal(i, direction)
            })
            .collect();

        let trades = PositionSimulator::new(4).replay(&series, DetectorKind::Rsi, &signals);
        assert!(!trades.is_empty());
        for trade in &trades {
            assert!(trade.entry_index < trade.exit_index);
            assert!(trade.bars_held <= 4);
        }
        for pair in trades.windows(2) {
            assert!(pair[0].exit_index <= pair[1].entry_index);
        }
    }

    #[test]
    fn test_no_reentry_on_exit_bar() {
        let series = series(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let signals = vec![signal(0, Direction::Buy), signal(3, Direction::Buy)];

        let trades = PositionSimulator::new(3).replay(&series, DetectorKind::Rsi, &signals);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].exit_index, 3);
        assert_eq!(trades[0].exit_reason, ExitReason::Timeout);
    }
}
