//! Indicator trait definitions.

use crate::error::IndicatorError;
use crate::types::Bar;

/// Single-series technical indicator.
///
/// Output is index-aligned with the input: element `i` is `None` while the
/// indicator is warming up and depends only on inputs at indices `<= i`.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Vec<Option<Self::Output>>;

    /// Number of inputs before the first defined output.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Empty input is the only failure; short input just stays undefined.
    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        if data.is_empty() {
            return Err(IndicatorError::InsufficientData {
                required: self.period(),
                available: 0,
            });
        }
        Ok(())
    }
}

/// Indicator producing several related values per input (MACD, Bollinger).
pub trait MultiOutputIndicator: Send + Sync {
    /// The output type containing multiple values.
    type Outputs;

    fn calculate(&self, data: &[f64]) -> Vec<Self::Outputs>;

    fn period(&self) -> usize;

    fn name(&self) -> &str;

    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        if data.is_empty() {
            return Err(IndicatorError::InsufficientData {
                required: self.period(),
                available: 0,
            });
        }
        Ok(())
    }
}

/// Indicator that reads whole bars rather than a single price column.
pub trait OhlcIndicator: Send + Sync {
    type Output;

    fn calculate(&self, bars: &[Bar]) -> Vec<Self::Output>;

    fn period(&self) -> usize;

    fn name(&self) -> &str;
}
