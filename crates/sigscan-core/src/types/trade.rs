//! Simulated round-trip trades.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::DetectorKind;

/// Why a simulated position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExitReason {
    /// Opposite signal from the detector
    Signal,
    /// Holding period reached `max_hold`
    Timeout,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::Signal => f.write_str("SIGNAL"),
            ExitReason::Timeout => f.write_str("TIMEOUT"),
        }
    }
}

/// A completed long trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: String,
    pub strategy: DetectorKind,
    pub entry_index: usize,
    pub exit_index: usize,
    /// Prices are rounded to four decimals
    pub entry_price: f64,
    pub exit_price: f64,
    pub bars_held: usize,
    /// Percentage return, rounded to two decimals
    pub return_pct: f64,
    pub exit_reason: ExitReason,
}

impl Trade {
    pub fn new(
        symbol: impl Into<String>,
        strategy: DetectorKind,
        entry_index: usize,
        exit_index: usize,
        entry_price: f64,
        exit_price: f64,
        exit_reason: ExitReason,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            strategy,
            entry_index,
            exit_index,
            entry_price: round_to(entry_price, 4),
            exit_price: round_to(exit_price, 4),
            bars_held: exit_index.saturating_sub(entry_index),
            return_pct: round_to(return_pct(entry_price, exit_price), 2),
            exit_reason,
        }
    }

    pub fn is_winner(&self) -> bool {
        self.return_pct > 0.0
    }
}

/// `(exit - entry) / entry * 100`, or zero for a zero entry price.
pub fn return_pct(entry: f64, exit: f64) -> f64 {
    if entry == 0.0 {
        return 0.0;
    }
    (exit - entry) / entry * 100.0
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_return_rounding() {
        let trade = Trade::new(
            "AAPL",
            DetectorKind::Rsi,
            3,
            10,
            100.0,
            103.456_78,
            ExitReason::Timeout,
        );
        assert_eq!(trade.bars_held, 7);
        assert_eq!(trade.exit_price, 103.4568);
        assert_eq!(trade.return_pct, 3.46);
        assert!(trade.is_winner());
    }

    #[test]
    fn test_zero_entry_price() {
        assert_eq!(return_pct(0.0, 10.0), 0.0);
    }

    #[test]
    fn test_exit_reason_display() {
        assert_eq!(ExitReason::Signal.to_string(), "SIGNAL");
        assert_eq!(
            serde_json::to_string(&ExitReason::Timeout).unwrap(),
            "\"TIMEOUT\""
        );
    }
}
