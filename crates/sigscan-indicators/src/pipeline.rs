//! Full indicator pass over a bar series.

use serde::{Deserialize, Serialize};
use sigscan_core::error::IndicatorError;
use sigscan_core::traits::{Indicator, MultiOutputIndicator, OhlcIndicator};
use sigscan_core::types::{AnalyzedSeries, BarSeries, IndicatorFrame};
use tracing::trace;

use crate::momentum::{Cci, Macd, Rsi, Stochastic};
use crate::moving_average::Sma;
use crate::regime::RegimeClassifier;
use crate::volatility::BollingerBands;

/// Indicator periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSettings {
    pub rsi_period: usize,
    pub stoch_k: usize,
    pub stoch_d: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_multiplier: f64,
    pub cci_period: usize,
    pub sma_fast: usize,
    pub sma_mid: usize,
    pub sma_slow: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            stoch_k: 14,
            stoch_d: 3,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_multiplier: 2.0,
            cci_period: 20,
            sma_fast: 21,
            sma_mid: 50,
            sma_slow: 200,
        }
    }
}

impl IndicatorSettings {
    /// Reject periods the indicator constructors would refuse.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        let positive = [
            ("rsi_period", self.rsi_period),
            ("stoch_k", self.stoch_k),
            ("stoch_d", self.stoch_d),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("cci_period", self.cci_period),
            ("sma_fast", self.sma_fast),
            ("sma_mid", self.sma_mid),
            ("sma_slow", self.sma_slow),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, v)| *v == 0) {
            return Err(IndicatorError::InvalidParameter(format!(
                "{name} must be greater than 0"
            )));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(IndicatorError::InvalidParameter(format!(
                "macd_fast ({}) must be less than macd_slow ({})",
                self.macd_fast, self.macd_slow
            )));
        }
        if self.bollinger_period < 2 {
            return Err(IndicatorError::InvalidParameter(
                "bollinger_period must be at least 2".to_string(),
            ));
        }
        if self.bollinger_multiplier.is_nan() || self.bollinger_multiplier <= 0.0 {
            return Err(IndicatorError::InvalidParameter(
                "bollinger_multiplier must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Runs every indicator over a series and assembles index-aligned frames.
///
/// Pure: the same series always yields bit-identical frames.
#[derive(Debug, Clone)]
pub struct IndicatorPipeline {
    rsi: Rsi,
    stochastic: Stochastic,
    macd: Macd,
    bollinger: BollingerBands,
    cci: Cci,
    sma_fast: Sma,
    sma_mid: Sma,
    sma_slow: Sma,
    regime: RegimeClassifier,
}

impl IndicatorPipeline {
    pub fn new(settings: &IndicatorSettings) -> Result<Self, IndicatorError> {
        settings.validate()?;
        Ok(Self {
            rsi: Rsi::new(settings.rsi_period),
            stochastic: Stochastic::with_periods(settings.stoch_k, settings.stoch_d),
            macd: Macd::with_periods(settings.macd_fast, settings.macd_slow, settings.macd_signal),
            bollinger: BollingerBands::with_params(
                settings.bollinger_period,
                settings.bollinger_multiplier,
            ),
            cci: Cci::new(settings.cci_period),
            sma_fast: Sma::new(settings.sma_fast),
            sma_mid: Sma::new(settings.sma_mid),
            sma_slow: Sma::new(settings.sma_slow),
            regime: RegimeClassifier::new(),
        })
    }

    /// Compute one frame per bar. Fails only on an empty series.
    pub fn compute(&self, series: &BarSeries) -> Result<Vec<IndicatorFrame>, IndicatorError> {
        let closes = series.closes();
        self.rsi.validate_data(&closes)?;

        let rsi = self.rsi.calculate(&closes);
        let stoch = self.stochastic.calculate(series.bars());
        let macd = self.macd.calculate(&closes);
        let bands = self.bollinger.calculate(&closes);
        let cci = self.cci.calculate(series.bars());
        let sma_fast = self.sma_fast.calculate(&closes);
        let sma_mid = self.sma_mid.calculate(&closes);
        let sma_slow = self.sma_slow.calculate(&closes);
        let bands_from = self.bollinger.period() - 1;

        let frames: Vec<IndicatorFrame> = (0..closes.len())
            .map(|i| IndicatorFrame {
                rsi: rsi[i],
                stoch_k: stoch[i].k,
                stoch_d: stoch[i].d,
                macd: macd[i].macd,
                macd_signal: macd[i].signal,
                macd_hist: macd[i].histogram,
                sma21: sma_fast[i],
                sma50: sma_mid[i],
                sma200: sma_slow[i],
                bollinger_upper: bands[i].upper,
                bollinger_middle: bands[i].middle,
                bollinger_lower: bands[i].lower,
                bollinger_ready: i >= bands_from,
                cci: cci[i],
            })
            .collect();

        trace!(symbol = %series.symbol, bars = frames.len(), "computed indicator frames");
        Ok(frames)
    }

    /// Compute frames and regime flags and bundle them with the series.
    pub fn analyze(&self, series: BarSeries) -> Result<AnalyzedSeries, IndicatorError> {
        let frames = self.compute(&series)?;
        let regimes = self.regime.classify(&frames);
        AnalyzedSeries::new(series, frames, regimes)
    }
}
