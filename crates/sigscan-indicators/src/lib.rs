//! Technical indicators for the signal scanner.
//!
//! This crate provides the indicator transforms used by the pattern detectors:
//! - Moving averages (SMA, EMA)
//! - Momentum indicators (RSI, MACD, Stochastic, CCI)
//! - Volatility indicators (Standard Deviation, Bollinger Bands)
//!
//! Every indicator returns output index-aligned with its input. The
//! [`IndicatorPipeline`] runs them all over a bar series and the
//! [`RegimeClassifier`] derives bull/bear flags from the SMA trio.

pub mod momentum;
pub mod moving_average;
pub mod pipeline;
pub mod regime;
pub mod volatility;

pub use momentum::{Cci, Macd, MacdOutput, Rsi, Stochastic, StochasticOutput};
pub use moving_average::{Ema, Sma};
pub use pipeline::{IndicatorPipeline, IndicatorSettings};
pub use regime::RegimeClassifier;
pub use volatility::{BollingerBands, BollingerOutput, StdDev};
