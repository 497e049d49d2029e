//! Backtest report generation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sigscan_core::types::{DetectorKind, Trade};

use crate::engine::{BacktestConfig, SymbolFailure};
use crate::statistics::{GroupSummary, LedgerStats};

/// Complete backtest report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    pub strategy: DetectorKind,
    /// Configuration used
    pub config: BacktestConfig,
    pub symbols_tested: usize,
    /// Statistics
    pub stats: LedgerStats,
    /// Trade ledger, ordered by symbol then entry
    pub trades: Vec<Trade>,
    pub failures: Vec<SymbolFailure>,
    pub generated_at: DateTime<Utc>,
}

impl BacktestReport {
    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();
        let stats = &self.stats;

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                     BACKTEST REPORT                        \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str("RUN\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Strategy:            {}\n", self.strategy));
        s.push_str(&format!("  Max Hold:            {} bars\n", self.config.max_hold));
        s.push_str(&format!("  Symbols Tested:      {}\n", self.symbols_tested));
        s.push_str(&format!("  Symbols Failed:      {}\n", self.failures.len()));
        s.push('\n');

        s.push_str("TRADE STATISTICS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Total Trades:        {}\n", stats.total_trades));
        s.push_str(&format!("  Winning Trades:      {}\n", stats.winning_trades));
        s.push_str(&format!("  Losing Trades:       {}\n", stats.losing_trades));
        s.push_str(&format!("  Win Rate:            {:.2}%\n", stats.overall.win_rate_pct));
        s.push_str(&format!("  Mean Return:         {:.2}%\n", stats.overall.mean_return_pct));
        s.push_str(&format!("  Cumulative Return:   {:.2}%\n", stats.cumulative_return_pct));
        s.push_str(&format!("  Avg Bars Held:       {:.2}\n", stats.average_bars_held));
        s.push('\n');

        s.push_str("BY EXIT REASON\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        for (reason, group) in &stats.by_exit_reason {
            s.push_str(&Self::group_line(&reason.to_string(), group));
        }
        s.push('\n');

        s.push_str("BY SYMBOL\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        for (symbol, group) in &stats.by_symbol {
            s.push_str(&Self::group_line(symbol, group));
        }
        s.push('\n');

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    fn group_line(label: &str, group: &GroupSummary) -> String {
        format!(
            "  {:<12} n={:<4} win={:>6.2}%  mean={:>7.2}%  min={:>7.2}%  max={:>7.2}%\n",
            label,
            group.count,
            group.win_rate_pct,
            group.mean_return_pct,
            group.min_return_pct,
            group.max_return_pct
        )
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigscan_core::types::ExitReason;

    #[test]
    fn test_report_summary() {
        let trades = vec![
            Trade::new("AAPL", DetectorKind::Rsi, 0, 2, 100.0, 110.0, ExitReason::Signal),
            Trade::new("MSFT", DetectorKind::Rsi, 5, 12, 50.0, 49.0, ExitReason::Timeout),
        ];
        let report = BacktestReport {
            strategy: DetectorKind::Rsi,
            config: BacktestConfig::default(),
            symbols_tested: 2,
            stats: LedgerStats::from_trades(&trades),
            trades,
            failures: vec![],
            generated_at: Utc::now(),
        };

        let summary = report.summary();
        assert!(summary.contains("Strategy:            rsi"));
        assert!(summary.contains("Total Trades:        2"));
        assert!(summary.contains("TIMEOUT"));
        assert!(summary.contains("MSFT"));

        let json = report.to_json().unwrap();
        assert!(json.contains("\"exit_reason\": \"SIGNAL\""));
    }
}
