//! Detector configuration.

use serde::{Deserialize, Serialize};
use sigscan_core::error::DetectorError;
use sigscan_core::types::DetectorKind;

/// RSI levels, with a separate pair used while the bear flag is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiThresholds {
    pub oversold: f64,
    pub overbought: f64,
    pub bear_oversold: f64,
    pub bear_overbought: f64,
}

impl Default for RsiThresholds {
    fn default() -> Self {
        Self {
            oversold: 30.0,
            overbought: 70.0,
            bear_oversold: 40.0,
            bear_overbought: 80.0,
        }
    }
}

/// %D bands for the stochastic detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StochasticBands {
    pub lower: f64,
    pub upper: f64,
}

impl Default for StochasticBands {
    fn default() -> Self {
        Self {
            lower: 10.0,
            upper: 90.0,
        }
    }
}

/// Which detector runs and how it is tuned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorSettings {
    pub kind: DetectorKind,
    /// Reward/risk multiple for take-profit; none when unset
    pub take_profit_ratio: Option<f64>,
    pub rsi: RsiThresholds,
    pub stochastic: StochasticBands,
    /// SMA length of the CCI average crossed by the Bollinger-CCI setup
    pub cci_average_period: usize,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            kind: DetectorKind::default(),
            take_profit_ratio: None,
            rsi: RsiThresholds::default(),
            stochastic: StochasticBands::default(),
            cci_average_period: 5,
        }
    }
}

impl DetectorSettings {
    pub fn validate(&self) -> Result<(), DetectorError> {
        if let Some(ratio) = self.take_profit_ratio {
            if ratio.is_nan() || ratio <= 0.0 {
                return Err(DetectorError::InvalidConfig(
                    "take_profit_ratio must be positive".into(),
                ));
            }
        }

        let rsi = &self.rsi;
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if ![rsi.oversold, rsi.overbought, rsi.bear_oversold, rsi.bear_overbought]
            .into_iter()
            .all(in_range)
        {
            return Err(DetectorError::InvalidConfig(
                "RSI thresholds must be between 0 and 100".into(),
            ));
        }
        if rsi.overbought <= rsi.oversold || rsi.bear_overbought <= rsi.bear_oversold {
            return Err(DetectorError::InvalidConfig(
                "Overbought must be greater than oversold".into(),
            ));
        }

        let stoch = &self.stochastic;
        if !in_range(stoch.lower) || !in_range(stoch.upper) || stoch.upper <= stoch.lower {
            return Err(DetectorError::InvalidConfig(
                "Stochastic bands must satisfy 0 <= lower < upper <= 100".into(),
            ));
        }

        if self.cci_average_period == 0 {
            return Err(DetectorError::InvalidConfig(
                "cci_average_period must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
