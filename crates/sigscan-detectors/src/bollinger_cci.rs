//! Bollinger band touch confirmed by a CCI cross.
//!
//! A close at or beyond a band arms a setup. During the next two bars the CCI
//! must cross its short moving average in the setup direction. On the third bar
//! the setup fires if price breaks the prior bar's extreme, and is discarded
//! either way.

use serde::{Deserialize, Serialize};
use sigscan_core::error::DetectorError;
use sigscan_core::traits::PatternDetector;
use sigscan_core::types::{AnalyzedSeries, DetectorKind, Direction, Signal};
use tracing::trace;

use crate::cursor::{signal_at, Cursor};

/// Where a live setup is in its three-bar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetupPhase {
    /// Trigger bar itself
    Armed,
    /// One or two bars after the trigger, waiting for the CCI cross
    Watching,
    /// Third bar after the trigger
    ConfirmPending,
    /// Past the window
    Expired,
}

/// A live Bollinger-CCI setup for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setup {
    pub direction: Direction,
    pub trigger_index: usize,
    /// First bar in the watch window where the CCI crossed its average
    pub entry_signal_index: Option<usize>,
}

impl Setup {
    pub fn phase(&self, index: usize) -> SetupPhase {
        match index.saturating_sub(self.trigger_index) {
            0 => SetupPhase::Armed,
            1 | 2 => SetupPhase::Watching,
            3 => SetupPhase::ConfirmPending,
            _ => SetupPhase::Expired,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BollingerCciDetector {
    cci_average_period: usize,
    take_profit_ratio: Option<f64>,
    setup: Option<Setup>,
    cursor: Cursor,
}

impl BollingerCciDetector {
    pub fn new(cci_average_period: usize, take_profit_ratio: Option<f64>) -> Self {
        Self {
            cci_average_period: cci_average_period.max(1),
            take_profit_ratio,
            setup: None,
            cursor: Cursor::default(),
        }
    }

    /// The setup currently being tracked, if any.
    pub fn active_setup(&self) -> Option<&Setup> {
        self.setup.as_ref()
    }

    fn arm(&mut self, symbol: &str, setup: Setup) -> Result<(), DetectorError> {
        if let Some(active) = &self.setup {
            return Err(DetectorError::SetupAlreadyActive {
                symbol: symbol.to_string(),
                active: active.trigger_index,
                requested: setup.trigger_index,
            });
        }
        trace!(symbol, direction = %setup.direction, index = setup.trigger_index, "setup armed");
        self.setup = Some(setup);
        Ok(())
    }

    fn trigger(series: &AnalyzedSeries, index: usize) -> Option<Direction> {
        let bar = series.bar(index)?;
        let frame = series.frame(index)?;
        if !frame.bands_ready() {
            return None;
        }
        if bar.close <= frame.bollinger_lower {
            Some(Direction::Buy)
        } else if bar.close >= frame.bollinger_upper {
            Some(Direction::Sell)
        } else {
            None
        }
    }

    /// Mean of the last `cci_average_period` CCI values ending at `index`.
    fn cci_average(&self, series: &AnalyzedSeries, index: usize) -> Option<f64> {
        let start = (index + 1).checked_sub(self.cci_average_period)?;
        let sum: f64 = series.frames()[start..=index]
            .iter()
            .map(|f| f.cci)
            .sum::<Option<f64>>()?;
        Some(sum / self.cci_average_period as f64)
    }

    fn cci_crossed(&self, series: &AnalyzedSeries, index: usize, direction: Direction) -> bool {
        if index == 0 {
            return false;
        }
        let frames = series.frames();
        let values = (
            frames[index - 1].cci,
            self.cci_average(series, index - 1),
            frames[index].cci,
            self.cci_average(series, index),
        );
        let (Some(prev), Some(prev_avg), Some(now), Some(now_avg)) = values else {
            return false;
        };
        match direction {
            Direction::Buy => prev < prev_avg && now > now_avg,
            Direction::Sell => prev > prev_avg && now < now_avg,
        }
    }

    fn confirm(&self, series: &AnalyzedSeries, index: usize, setup: &Setup) -> Option<Signal> {
        setup.entry_signal_index?;
        let bars = series.bars();
        let (prior, today) = (bars.get(index.checked_sub(1)?)?, bars.get(index)?);

        let (entry, stop) = match setup.direction {
            Direction::Buy if today.high > prior.high => (prior.high, prior.low),
            Direction::Sell if today.low < prior.low => (prior.low, prior.high),
            _ => return None,
        };

        Some(signal_at(
            series,
            index,
            DetectorKind::BollingerCci,
            setup.direction,
            entry,
            stop,
            self.take_profit_ratio,
        ))
    }
}

impl Default for BollingerCciDetector {
    fn default() -> Self {
        Self::new(5, None)
    }
}

impl PatternDetector for BollingerCciDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::BollingerCci
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

        if self.setup.is_none() {
            if let Some(direction) = Self::trigger(series, index) {
                self.arm(
                    series.symbol(),
                    Setup {
                        direction,
                        trigger_index: index,
                        entry_signal_index: None,
                    },
                )?;
            }
        }

        let Some(mut setup) = self.setup else {
            return Ok(None);
        };

        match setup.phase(index) {
            SetupPhase::Armed => Ok(None),
            SetupPhase::Watching => {
                if setup.entry_signal_index.is_none()
                    && self.cci_crossed(series, index, setup.direction)
                {
                    setup.entry_signal_index = Some(index);
                    self.setup = Some(setup);
                }
                Ok(None)
            }
            SetupPhase::ConfirmPending => {
                self.setup = None;
                Ok(self.confirm(series, index, &setup))
            }
            SetupPhase::Expired => {
                self.setup = None;
                Ok(None)
            }
        }
    }

    fn reset(&mut self) {
        self.setup = None;
        self.cursor.reset();
    }
}
