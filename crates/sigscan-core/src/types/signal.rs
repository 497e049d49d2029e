//! Trade signals and detector identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::IndicatorSnapshot;
use crate::error::DetectorError;

/// Direction of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Buy => "BUY",
            Direction::Sell => "SELL",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of pattern detector families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    #[default]
    SwingBreakout,
    BollingerCci,
    Rsi,
    Stochastic,
    MacdHistogram,
}

impl DetectorKind {
    pub fn all() -> &'static [DetectorKind] {
        &[
            DetectorKind::SwingBreakout,
            DetectorKind::BollingerCci,
            DetectorKind::Rsi,
            DetectorKind::Stochastic,
            DetectorKind::MacdHistogram,
        ]
    }

    /// Strategy identifier written to sinks.
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectorKind::SwingBreakout => "swing_breakout",
            DetectorKind::BollingerCci => "bollinger_cci",
            DetectorKind::Rsi => "rsi",
            DetectorKind::Stochastic => "stochastic",
            DetectorKind::MacdHistogram => "macd_histogram",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DetectorKind::SwingBreakout => "1-2-3 swing breakout gated by the trend regime",
            DetectorKind::BollingerCci => "Bollinger band touch confirmed by a CCI cross and a day-3 breakout",
            DetectorKind::Rsi => "RSI levels with regime-adaptive thresholds",
            DetectorKind::Stochastic => "Stochastic %D leaving the extreme bands",
            DetectorKind::MacdHistogram => "MACD histogram shrinking toward zero",
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectorKind {
    type Err = DetectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "swing_breakout" | "setup123" | "123" => Ok(DetectorKind::SwingBreakout),
            "bollinger_cci" => Ok(DetectorKind::BollingerCci),
            "rsi" => Ok(DetectorKind::Rsi),
            "stochastic" | "stoch" => Ok(DetectorKind::Stochastic),
            "macd_histogram" | "macd" => Ok(DetectorKind::MacdHistogram),
            _ => Err(DetectorError::NotFound(s.to_string())),
        }
    }
}

/// A detector's decision at one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    /// Index of the bar in its series
    pub bar_index: usize,
    /// Bar timestamp in milliseconds
    pub timestamp: i64,
    pub direction: Direction,
    pub strategy: DetectorKind,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: Option<f64>,
    pub indicators: IndicatorSnapshot,
}

impl Signal {
    /// Distance between entry and stop.
    pub fn risk(&self) -> f64 {
        (self.entry_price - self.stop_loss).abs()
    }

    /// Set the take-profit at `ratio` times the risk beyond the entry.
    pub fn with_take_profit_ratio(mut self, ratio: Option<f64>) -> Self {
        self.take_profit = ratio.map(|r| match self.direction {
            Direction::Buy => self.entry_price + r * self.risk(),
            Direction::Sell => self.entry_price - r * self.risk(),
        });
        self
    }

    pub fn is_buy(&self) -> bool {
        self.direction == Direction::Buy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(direction: Direction, entry: f64, stop: f64) -> Signal {
        Signal {
            symbol: "AAPL".into(),
            bar_index: 10,
            timestamp: 0,
            direction,
            strategy: DetectorKind::BollingerCci,
            entry_price: entry,
            stop_loss: stop,
            take_profit: None,
            indicators: IndicatorSnapshot::default(),
        }
    }

    #[test]
    fn test_take_profit_ratio() {
        let buy = signal(Direction::Buy, 100.0, 95.0).with_take_profit_ratio(Some(2.0));
        assert_eq!(buy.take_profit, Some(110.0));

        let sell = signal(Direction::Sell, 100.0, 104.0).with_take_profit_ratio(Some(1.5));
        assert_eq!(sell.take_profit, Some(94.0));

        let none = signal(Direction::Buy, 100.0, 95.0).with_take_profit_ratio(None);
        assert_eq!(none.take_profit, None);
    }

    #[test]
    fn test_detector_kind_parse() {
        assert_eq!(
            DetectorKind::from_str("bollinger-cci").unwrap(),
            DetectorKind::BollingerCci
        );
        assert_eq!(DetectorKind::from_str("MACD").unwrap(), DetectorKind::MacdHistogram);
        assert!(DetectorKind::from_str("momentum").is_err());
        for kind in DetectorKind::all() {
            assert_eq!(DetectorKind::from_str(kind.as_str()).unwrap(), *kind);
        }
    }

    #[test]
    fn test_direction_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Direction::Sell).unwrap(), "\"SELL\"");
        assert_eq!(Direction::Buy.to_string(), "BUY");
    }
}
