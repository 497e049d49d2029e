//! Trade ledger statistics.

use serde::{Deserialize, Serialize};
use sigscan_core::types::{round_to, ExitReason, Trade};
use std::collections::BTreeMap;

/// Descriptive statistics of `return_pct` for a group of trades.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub count: usize,
    pub win_rate_pct: f64,
    pub mean_return_pct: f64,
    /// Sample standard deviation, zero for a single trade
    pub std_return_pct: f64,
    pub min_return_pct: f64,
    pub max_return_pct: f64,
}

impl GroupSummary {
    pub fn from_returns(returns: &[f64]) -> Self {
        if returns.is_empty() {
            return Self::default();
        }

        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let std = if returns.len() > 1 {
            let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
            variance.sqrt()
        } else {
            0.0
        };
        let winners = returns.iter().filter(|&&r| r > 0.0).count();

        Self {
            count: returns.len(),
            win_rate_pct: round_to(winners as f64 / n * 100.0, 2),
            mean_return_pct: round_to(mean, 4),
            std_return_pct: round_to(std, 4),
            min_return_pct: returns.iter().cloned().fold(f64::INFINITY, f64::min),
            max_return_pct: returns.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// Aggregate view of a trade ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerStats {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub overall: GroupSummary,
    /// Sum of per-trade returns
    pub cumulative_return_pct: f64,
    pub average_bars_held: f64,
    pub by_symbol: BTreeMap<String, GroupSummary>,
    pub by_exit_reason: BTreeMap<ExitReason, GroupSummary>,
}

impl LedgerStats {
    pub fn from_trades(trades: &[Trade]) -> Self {
        let mut by_symbol: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        let mut by_exit_reason: BTreeMap<ExitReason, Vec<f64>> = BTreeMap::new();

        for trade in trades {
            by_symbol
                .entry(trade.symbol.clone())
                .or_default()
                .push(trade.return_pct);
            by_exit_reason
                .entry(trade.exit_reason)
                .or_default()
                .push(trade.return_pct);
        }

        let returns: Vec<f64> = trades.iter().map(|t| t.return_pct).collect();
        let average_bars_held = if trades.is_empty() {
            0.0
        } else {
            trades.iter().map(|t| t.bars_held as f64).sum::<f64>() / trades.len() as f64
        };

        Self {
            total_trades: trades.len(),
            winning_trades: trades.iter().filter(|t| t.return_pct > 0.0).count(),
            losing_trades: trades.iter().filter(|t| t.return_pct < 0.0).count(),
            overall: GroupSummary::from_returns(&returns),
            cumulative_return_pct: round_to(returns.iter().sum(), 2),
            average_bars_held: round_to(average_bars_held, 2),
            by_symbol: by_symbol
                .into_iter()
                .map(|(k, v)| (k, GroupSummary::from_returns(&v)))
                .collect(),
            by_exit_reason: by_exit_reason
                .into_iter()
                .map(|(k, v)| (k, GroupSummary::from_returns(&v)))
                .collect(),
        }
    }
}
