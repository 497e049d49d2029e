//! Pattern detectors.
//!
//! Each detector walks an [`AnalyzedSeries`](sigscan_core::types::AnalyzedSeries)
//! bar by bar and yields at most one signal per bar:
//! - Swing breakout (1-2-3 pattern) gated by the trend regime
//! - Bollinger band touch confirmed by a CCI cross and a day-3 breakout
//! - Oscillator levels and crosses (RSI, Stochastic, MACD histogram)
//!
//! A run uses exactly one family, picked from [`DetectorSettings::kind`] through
//! the [`DetectorRegistry`].

mod bollinger_cci;
mod cursor;
mod oscillator;
mod registry;
mod settings;
mod swing_breakout;

pub use bollinger_cci::{BollingerCciDetector, Setup, SetupPhase};
pub use oscillator::{MacdHistogramDetector, RsiLevelDetector, StochasticCrossDetector};
pub use registry::{Detector, DetectorInfo, DetectorRegistry};
pub use settings::{DetectorSettings, RsiThresholds, StochasticBands};
pub use swing_breakout::SwingBreakoutDetector;

#[cfg(test)]
pub(crate) mod test_support;
