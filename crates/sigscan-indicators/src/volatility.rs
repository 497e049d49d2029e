//! Volatility indicators.

use serde::{Deserialize, Serialize};
use sigscan_core::traits::{Indicator, MultiOutputIndicator};

/// Rolling standard deviation.
#[derive(Debug, Clone)]
pub struct StdDev {
    period: usize,
    /// Divide by `n - 1` instead of `n`
    sample: bool,
}

impl StdDev {
    /// Population standard deviation over `period` values.
    pub fn new(period: usize) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        Self {
            period,
            sample: false,
        }
    }

    /// Sample standard deviation (`n - 1` denominator).
    pub fn sample(period: usize) -> Self {
        Self {
            sample: true,
            ..Self::new(period)
        }
    }

    fn window_std(&self, window: &[f64]) -> f64 {
        let n = window.len() as f64;
        let mean: f64 = window.iter().sum::<f64>() / n;
        let denom = if self.sample { n - 1.0 } else { n };
        let variance: f64 = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / denom;
        variance.sqrt()
    }
}

impl Indicator for StdDev {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; data.len()];
        for (offset, window) in data.windows(self.period).enumerate() {
            result[offset + self.period - 1] = Some(self.window_std(window));
        }
        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "StdDev"
    }
}

/// Bollinger Bands output.
///
/// Warm-up entries are all zero rather than undefined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BollingerOutput {
    /// Upper band
    pub upper: f64,
    /// Middle band (SMA)
    pub middle: f64,
    /// Lower band
    pub lower: f64,
}

impl BollingerOutput {
    pub const ZERO: BollingerOutput = BollingerOutput {
        upper: 0.0,
        middle: 0.0,
        lower: 0.0,
    };

    /// Check if price is at or above the upper band.
    pub fn touches_upper(&self, price: f64) -> bool {
        price >= self.upper
    }

    /// Check if price is at or below the lower band.
    pub fn touches_lower(&self, price: f64) -> bool {
        price <= self.lower
    }
}

/// Bollinger Bands.
///
/// Middle band is the SMA of closes; bands sit `multiplier` sample standard
/// deviations away from it.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl BollingerBands {
    /// Create new Bollinger Bands with default parameters (20, 2.0).
    pub fn new() -> Self {
        Self::with_params(20, 2.0)
    }

    /// Create Bollinger Bands with custom parameters.
    pub fn with_params(period: usize, std_dev_multiplier: f64) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        assert!(
            std_dev_multiplier > 0.0,
            "Std dev multiplier must be positive"
        );
        Self {
            period,
            std_dev_multiplier,
        }
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for BollingerBands {
    type Outputs = BollingerOutput;

    fn calculate(&self, data: &[f64]) -> Vec<BollingerOutput> {
        let std_dev = StdDev::sample(self.period);
        let period_f64 = self.period as f64;
        let mut result = vec![BollingerOutput::ZERO; data.len()];

        for (offset, window) in data.windows(self.period).enumerate() {
            let mean: f64 = window.iter().sum::<f64>() / period_f64;
            let sd = std_dev.window_std(window);

            result[offset + self.period - 1] = BollingerOutput {
                upper: mean + self.std_dev_multiplier * sd,
                middle: mean,
                lower: mean - self.std_dev_multiplier * sd,
            };
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "Bollinger"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_dev_population_and_sample() {
        let data = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];

        let population = StdDev::new(8).calculate(&data);
        assert!((population[7].unwrap() - 2.0).abs() < 1e-10);

        let sample = StdDev::sample(8).calculate(&data);
        assert!((sample[7].unwrap() - (32.0f64 / 7.0).sqrt()).abs() < 1e-10);
        assert_eq!(sample[6], None);
    }

    #[test]
    fn test_bollinger_zero_fill_during_warmup() {
        let bb = BollingerBands::with_params(3, 2.0);
        let result = bb.calculate(&[1.0, 2.0, 3.0, 4.0]);

        assert_eq!(result[0], BollingerOutput::ZERO);
        assert_eq!(result[1], BollingerOutput::ZERO);

        // mean 2, sample std 1
        assert!((result[2].middle - 2.0).abs() < 1e-10);
        assert!((result[2].upper - 4.0).abs() < 1e-10);
        assert!((result[2].lower - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_bollinger_band_ordering() {
        let bb = BollingerBands::new();
        let data: Vec<f64> = (0..50)
            .map(|i| 100.0 + (i as f64 * 0.2).sin() * 5.0)
            .collect();

        for out in bb.calculate(&data).iter().skip(19) {
            assert!(out.upper >= out.middle);
            assert!(out.middle >= out.lower);
            assert!(out.touches_lower(out.lower));
        }
    }
}
