//! Per-bar indicator output and trend regime flags.

use serde::{Deserialize, Serialize};

use super::{Bar, BarSeries};
use crate::error::IndicatorError;

/// Indicator values for one bar.
///
/// `None` means the indicator is still warming up at this index. Bollinger bands
/// are plain floats: warm-up entries hold `0.0` and `bollinger_ready` is false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorFrame {
    pub rsi: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    pub sma21: Option<f64>,
    pub sma50: Option<f64>,
    pub sma200: Option<f64>,
    pub bollinger_upper: f64,
    pub bollinger_middle: f64,
    pub bollinger_lower: f64,
    /// Set once a full Bollinger window exists
    #[serde(default)]
    pub bollinger_ready: bool,
    pub cci: Option<f64>,
}

impl IndicatorFrame {
    /// Whether the Bollinger bands hold computed values rather than the zero fill.
    ///
    /// Decided by window length, so a band centred on zero still counts as ready.
    pub fn bands_ready(&self) -> bool {
        self.bollinger_ready
    }

    /// Oscillator values carried alongside an emitted signal.
    pub fn snapshot(&self) -> IndicatorSnapshot {
        IndicatorSnapshot {
            rsi: self.rsi,
            stoch_k: self.stoch_k,
            stoch_d: self.stoch_d,
            macd: self.macd,
            macd_signal: self.macd_signal,
        }
    }
}

/// Indicator values attached to a signal for sinks and notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub rsi: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
}

/// Trend regime at one bar. The two flags are never both set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeFlags {
    pub bull_condition: bool,
    pub bear_condition: bool,
}

impl RegimeFlags {
    pub const NEUTRAL: RegimeFlags = RegimeFlags {
        bull_condition: false,
        bear_condition: false,
    };

    pub const BULL: RegimeFlags = RegimeFlags {
        bull_condition: true,
        bear_condition: false,
    };

    pub const BEAR: RegimeFlags = RegimeFlags {
        bull_condition: false,
        bear_condition: true,
    };
}

/// A bar series with its index-aligned indicator frames and regime flags.
#[derive(Debug, Clone)]
pub struct AnalyzedSeries {
    series: BarSeries,
    frames: Vec<IndicatorFrame>,
    regimes: Vec<RegimeFlags>,
}

impl AnalyzedSeries {
    /// Bundle the three sequences, which must have the same length.
    pub fn new(
        series: BarSeries,
        frames: Vec<IndicatorFrame>,
        regimes: Vec<RegimeFlags>,
    ) -> Result<Self, IndicatorError> {
        if frames.len() != series.len() || regimes.len() != series.len() {
            return Err(IndicatorError::Misaligned {
                bars: series.len(),
                frames: frames.len(),
                regimes: regimes.len(),
            });
        }
        Ok(Self {
            series,
            frames,
            regimes,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.series.symbol
    }

    pub fn series(&self) -> &BarSeries {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        self.series.bars()
    }

    pub fn frames(&self) -> &[IndicatorFrame] {
        &self.frames
    }

    pub fn regimes(&self) -> &[RegimeFlags] {
        &self.regimes
    }

    pub fn bar(&self, index: usize) -> Option<&Bar> {
        self.series.get(index)
    }

    pub fn frame(&self, index: usize) -> Option<&IndicatorFrame> {
        self.frames.get(index)
    }

    pub fn regime(&self, index: usize) -> Option<RegimeFlags> {
        self.regimes.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Timeframe;

    #[test]
    fn test_analyzed_series_rejects_misaligned_frames() {
        let mut series = BarSeries::new("AAPL", Timeframe::Daily);
        series.try_push(Bar::new(1, 1.0, 1.0, 1.0, 1.0, 0.0)).unwrap();
        series.try_push(Bar::new(2, 1.0, 1.0, 1.0, 1.0, 0.0)).unwrap();

        let result = AnalyzedSeries::new(
            series.clone(),
            vec![IndicatorFrame::default()],
            vec![RegimeFlags::NEUTRAL; 2],
        );
        assert_eq!(
            result.unwrap_err(),
            IndicatorError::Misaligned {
                bars: 2,
                frames: 1,
                regimes: 2
            }
        );

        let ok = AnalyzedSeries::new(
            series,
            vec![IndicatorFrame::default(); 2],
            vec![RegimeFlags::BULL; 2],
        )
        .unwrap();
        assert_eq!(ok.len(), 2);
        assert_eq!(ok.regime(1), Some(RegimeFlags::BULL));
        assert!(!ok.frame(0).unwrap().bands_ready());
    }
}
