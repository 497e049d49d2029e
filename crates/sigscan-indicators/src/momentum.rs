//! Momentum indicators.

use serde::{Deserialize, Serialize};
use sigscan_core::traits::{Indicator, MultiOutputIndicator, OhlcIndicator};
use sigscan_core::types::Bar;

use crate::moving_average::Ema;

/// Relative Strength Index (RSI).
///
/// Measures the speed and magnitude of recent price changes
/// to evaluate overbought or oversold conditions.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    fn rsi(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
        }
    }
}

impl Indicator for Rsi {
    type Output = f64;

    /// Wilder smoothing: the first average is the mean of `period` changes,
    /// then `avg = (prev * (period - 1) + value) / period`.
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; data.len()];
        if data.len() <= self.period {
            return result;
        }

        let period_f64 = self.period as f64;
        let change = |i: usize| data[i] - data[i - 1];

        let mut avg_gain = 0.0;
        let mut avg_loss = 0.0;
        for i in 1..=self.period {
            let c = change(i);
            if c > 0.0 {
                avg_gain += c;
            } else {
                avg_loss -= c;
            }
        }
        avg_gain /= period_f64;
        avg_loss /= period_f64;
        result[self.period] = Some(Self::rsi(avg_gain, avg_loss));

        for i in (self.period + 1)..data.len() {
            let c = change(i);
            let (gain, loss) = if c > 0.0 { (c, 0.0) } else { (0.0, -c) };
            avg_gain = (avg_gain * (period_f64 - 1.0) + gain) / period_f64;
            avg_loss = (avg_loss * (period_f64 - 1.0) + loss) / period_f64;
            result[i] = Some(Self::rsi(avg_gain, avg_loss));
        }

        result
    }

    fn period(&self) -> usize {
        self.period + 1 // Need period+1 data points
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD (Moving Average Convergence Divergence) output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: Option<f64>,
    /// Signal line (EMA of MACD)
    pub signal: Option<f64>,
    /// Histogram (MACD - Signal)
    pub histogram: Option<f64>,
}

/// MACD indicator.
///
/// Both EMAs and the signal EMA run over the full input from index 0, so values
/// match a seeded-by-first-value EMA. The line is reported once the slow EMA is
/// warm and the signal once it has `signal` warm MACD values behind it.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast_period: fast,
            slow_period: slow,
            signal_period: signal,
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdOutput;

    fn calculate(&self, data: &[f64]) -> Vec<MacdOutput> {
        let fast_ema = Ema::new(self.fast_period).recursive(data);
        let slow_ema = Ema::new(self.slow_period).recursive(data);

        let macd_line: Vec<f64> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect();
        let signal_line = Ema::new(self.signal_period).recursive(&macd_line);

        let line_start = self.slow_period - 1;
        let signal_start = line_start + self.signal_period - 1;

        macd_line
            .iter()
            .zip(signal_line.iter())
            .enumerate()
            .map(|(i, (&macd, &signal))| {
                if i < line_start {
                    MacdOutput::default()
                } else if i < signal_start {
                    MacdOutput {
                        macd: Some(macd),
                        ..MacdOutput::default()
                    }
                } else {
                    MacdOutput {
                        macd: Some(macd),
                        signal: Some(signal),
                        histogram: Some(macd - signal),
                    }
                }
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.slow_period + self.signal_period - 1
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

/// Stochastic oscillator output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StochasticOutput {
    /// %K (fast stochastic)
    pub k: Option<f64>,
    /// %D (mean of the last `d` %K values, all non-zero)
    pub d: Option<f64>,
}

/// Stochastic oscillator.
///
/// Compares closing price to the high/low range over a period.
#[derive(Debug, Clone)]
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
}

impl Stochastic {
    /// Create a new stochastic oscillator with default parameters (14, 3).
    pub fn new() -> Self {
        Self::with_periods(14, 3)
    }

    /// Create with custom periods.
    pub fn with_periods(k_period: usize, d_period: usize) -> Self {
        assert!(k_period > 0 && d_period > 0);
        Self { k_period, d_period }
    }

    /// Calculate stochastic from OHLC columns.
    pub fn calculate_ohlc(&self, high: &[f64], low: &[f64], close: &[f64]) -> Vec<StochasticOutput> {
        let len = high.len().min(low.len()).min(close.len());
        let mut k_values: Vec<Option<f64>> = vec![None; len];

        for i in (self.k_period.saturating_sub(1))..len {
            let start = i + 1 - self.k_period;
            let highest = high[start..=i]
                .iter()
                .cloned()
                .fold(f64::NEG_INFINITY, f64::max);
            let lowest = low[start..=i]
                .iter()
                .cloned()
                .fold(f64::INFINITY, f64::min);

            let range = highest - lowest;
            let k = if range == 0.0 {
                50.0
            } else {
                ((close[i] - lowest) / range) * 100.0
            };
            k_values[i] = Some(k);
        }

        // A %K of exactly zero counts as degenerate and holds %D back
        let d_period_f64 = self.d_period as f64;
        (0..len)
            .map(|i| {
                let d = if i + 1 >= self.d_period {
                    k_values[i + 1 - self.d_period..=i]
                        .iter()
                        .map(|k| k.filter(|&k| k != 0.0))
                        .sum::<Option<f64>>()
                        .map(|sum| sum / d_period_f64)
                } else {
                    None
                };
                StochasticOutput { k: k_values[i], d }
            })
            .collect()
    }
}

impl Default for Stochastic {
    fn default() -> Self {
        Self::new()
    }
}

impl OhlcIndicator for Stochastic {
    type Output = StochasticOutput;

    fn calculate(&self, bars: &[Bar]) -> Vec<StochasticOutput> {
        let high: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let low: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let close: Vec<f64> = bars.iter().map(|b| b.close).collect();
        self.calculate_ohlc(&high, &low, &close)
    }

    fn period(&self) -> usize {
        self.k_period + self.d_period - 1
    }

    fn name(&self) -> &str {
        "Stochastic"
    }
}

/// Commodity Channel Index over the typical price `(h + l + c) / 3`.
///
/// `cci = (tp - SMA(tp)) / (0.015 * MAD(tp))`, zero when the mean absolute
/// deviation is zero.
#[derive(Debug, Clone)]
pub struct Cci {
    period: usize,
}

impl Cci {
    const CONSTANT: f64 = 0.015;

    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Calculate CCI from a typical price column.
    pub fn calculate_typical(&self, typical: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; typical.len()];
        if typical.len() < self.period {
            return result;
        }

        let period_f64 = self.period as f64;
        for (offset, window) in typical.windows(self.period).enumerate() {
            let i = offset + self.period - 1;
            let mean = window.iter().sum::<f64>() / period_f64;
            let mad = window.iter().map(|tp| (tp - mean).abs()).sum::<f64>() / period_f64;
            result[i] = Some(if mad == 0.0 {
                0.0
            } else {
                (typical[i] - mean) / (Self::CONSTANT * mad)
            });
        }

        result
    }
}

impl OhlcIndicator for Cci {
    type Output = Option<f64>;

    fn calculate(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let typical: Vec<f64> = bars.iter().map(Bar::typical_price).collect();
        self.calculate_typical(&typical)
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "CCI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_basic() {
        let rsi = Rsi::new(14);
        let data: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 0.5).sin() * 5.0)
            .collect();

        let result = rsi.calculate(&data);
        assert_eq!(result.len(), data.len());
        assert!(result[..14].iter().all(Option::is_none));

        for value in result.iter().flatten() {
            assert!((0.0..=100.0).contains(value));
        }
    }

    #[test]
    fn test_rsi_all_gains() {
        let rsi = Rsi::new(5);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let result = rsi.calculate(&data);

        assert_eq!(result[4], None);
        assert_eq!(result[5], Some(100.0));
        assert_eq!(result[6], Some(100.0));
    }

    #[test]
    fn test_rsi_all_losses() {
        let rsi = Rsi::new(5);
        let data = vec![7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        let result = rsi.calculate(&data);

        assert!(result[5].unwrap().abs() < 1e-10);
    }

    #[test]
    fn test_rsi_wilder_smoothing() {
        let rsi = Rsi::new(2);
        // changes: +2, -1, +3
        let data = vec![10.0, 12.0, 11.0, 14.0];
        let result = rsi.calculate(&data);

        // first: gain 1.0, loss 0.5 -> rs 2
        assert!((result[2].unwrap() - (100.0 - 100.0 / 3.0)).abs() < 1e-10);
        // next: gain (1.0 + 3) / 2 = 2, loss 0.25 -> rs 8
        assert!((result[3].unwrap() - (100.0 - 100.0 / 9.0)).abs() < 1e-10);
    }

    #[test]
    fn test_macd_histogram_is_exact_difference() {
        let macd = Macd::new();
        let data: Vec<f64> = (0..80)
            .map(|i| 100.0 + (i as f64 * 0.3).sin() * 4.0 + i as f64 * 0.1)
            .collect();
        let result = macd.calculate(&data);

        assert_eq!(result.len(), data.len());
        assert!(result[24].macd.is_none());
        assert!(result[25].macd.is_some());
        assert!(result[32].signal.is_none());
        assert!(result[33].signal.is_some());

        for out in &result {
            if let (Some(m), Some(s), Some(h)) = (out.macd, out.signal, out.histogram) {
                assert_eq!(h, m - s);
            }
        }
    }

    #[test]
    fn test_macd_uptrend_positive() {
        let macd = Macd::with_periods(5, 10, 3);
        let data: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let result = macd.calculate(&data);

        assert!(result.last().unwrap().macd.unwrap() > 0.0);
    }

    #[test]
    fn test_stochastic_bounds() {
        let stoch = Stochastic::new();
        let high: Vec<f64> = (0..30).map(|i| 105.0 + (i as f64).sin() * 3.0).collect();
        let low: Vec<f64> = high.iter().map(|h| h - 8.0).collect();
        let close: Vec<f64> = high.iter().map(|h| h - 3.0).collect();

        let result = stoch.calculate_ohlc(&high, &low, &close);
        assert_eq!(result.len(), 30);
        assert!(result[12].k.is_none());
        assert!(result[13].k.is_some());
        assert!(result[14].d.is_none());
        assert!(result[15].d.is_some());

        for output in &result {
            if let Some(k) = output.k {
                assert!((0.0..=100.0).contains(&k));
            }
            if let Some(d) = output.d {
                assert!((0.0..=100.0).contains(&d));
            }
        }
    }

    #[test]
    fn test_stochastic_zero_range_is_midpoint() {
        let stoch = Stochastic::with_periods(3, 2);
        let flat = vec![10.0; 5];
        let result = stoch.calculate_ohlc(&flat, &flat, &flat);

        assert_eq!(result[2].k, Some(50.0));
        assert_eq!(result[3].d, Some(50.0));
    }

    #[test]
    fn test_stochastic_d_waits_for_nonzero_k() {
        let stoch = Stochastic::with_periods(3, 2);
        let high = vec![10.0, 10.0, 10.0, 10.0, 10.0, 12.0, 12.0];
        let low = vec![5.0; 7];
        let close = vec![5.0, 5.0, 5.0, 5.0, 5.0, 11.0, 11.0];

        let result = stoch.calculate_ohlc(&high, &low, &close);
        let k: Vec<Option<f64>> = result.iter().map(|r| r.k).collect();
        assert_eq!(&k[..5], &[None, None, Some(0.0), Some(0.0), Some(0.0)]);

        // Close pinned to the lowest low gives %K == 0, so %D stays undefined
        assert_eq!(result[3].d, None);
        assert_eq!(result[4].d, None);
        // One zero still in the window
        assert_eq!(result[5].d, None);

        let expected = (11.0 - 5.0) / (12.0 - 5.0) * 100.0;
        assert!((result[6].d.unwrap() - expected).abs() < 1e-10);
    }

    #[test]
    fn test_stochastic_at_high() {
        let stoch = Stochastic::with_periods(5, 3);
        let high = vec![10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0];
        let low = vec![5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0];
        let close = high.clone();

        let result = stoch.calculate_ohlc(&high, &low, &close);
        assert!((result.last().unwrap().k.unwrap() - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_cci_values() {
        let cci = Cci::new(3);
        let result = cci.calculate_typical(&[1.0, 2.0, 3.0, 3.0, 3.0, 3.0]);

        assert_eq!(result[1], None);
        // mean 2, mad 2/3 -> (3 - 2) / (0.015 * 2/3) = 100
        assert!((result[2].unwrap() - 100.0).abs() < 1e-9);
        // flat window
        assert_eq!(result[5], Some(0.0));
    }
}
