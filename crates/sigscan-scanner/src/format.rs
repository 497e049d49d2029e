//! Notification text.

use sigscan_core::types::{Signal, TIMESTAMP_FORMAT};
use std::fmt::Write;

fn value(v: Option<f64>) -> String {
    v.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v))
}

fn price(v: f64) -> String {
    format!("{:.4}", v)
}

/// Render a signal as a Markdown message for chat notifiers.
pub fn format_signal_message(signal: &Signal) -> String {
    let timestamp = chrono::DateTime::from_timestamp_millis(signal.timestamp)
        .unwrap_or_default()
        .format(TIMESTAMP_FORMAT);
    let take_profit = signal.take_profit.map_or_else(|| "-".to_string(), price);
    let ind = &signal.indicators;

    let mut msg = String::new();
    let _ = writeln!(msg, "*Asset:* {}", signal.symbol);
    let _ = writeln!(msg, "*Signal:* {}", signal.direction);
    let _ = writeln!(msg, "*Strategy:* {}", signal.strategy.description());
    let _ = writeln!(
        msg,
        "*Entry:* {} | *SL:* {} | *TP:* {}",
        price(signal.entry_price),
        price(signal.stop_loss),
        take_profit
    );
    let _ = writeln!(msg, "*Bar time:* {}", timestamp);
    let _ = writeln!(msg);
    let _ = writeln!(msg, "Indicators:");
    let _ = writeln!(msg, "  Stoch %K: {}", value(ind.stoch_k));
    let _ = writeln!(msg, "  Stoch %D: {}", value(ind.stoch_d));
    let _ = writeln!(msg, "  RSI: {}", value(ind.rsi));
    let _ = writeln!(msg, "  MACD: {}", value(ind.macd));
    let _ = write!(msg, "  MACD Signal: {}", value(ind.macd_signal));
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigscan_core::types::{DetectorKind, Direction, IndicatorSnapshot};

    #[test]
    fn test_message_contents() {
        let signal = Signal {
            symbol: "BTC-USDT".to_string(),
            bar_index: 99,
            // 2024-01-15 10:30:00 UTC
            timestamp: 1_705_314_600_000,
            direction: Direction::Buy,
            strategy: DetectorKind::BollingerCci,
            entry_price: 101.0,
            stop_loss: 99.0,
            take_profit: Some(105.0),
            indicators: IndicatorSnapshot {
                rsi: Some(55.123),
                stoch_k: Some(20.0),
                stoch_d: None,
                macd: Some(-0.5),
                macd_signal: Some(-0.75),
            },
        };

        let msg = format_signal_message(&signal);
        assert!(msg.contains("*Asset:* BTC-USDT"));
        assert!(msg.contains("*Signal:* BUY"));
        assert!(msg.contains("*Entry:* 101.0000 | *SL:* 99.0000 | *TP:* 105.0000"));
        assert!(msg.contains("2024-01-15 10:30:00"));
        assert!(msg.contains("RSI: 55.12"));
        assert!(msg.contains("Stoch %D: n/a"));
        assert!(msg.ends_with("MACD Signal: -0.75"));
    }
}
