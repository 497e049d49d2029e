//! Scan loop settings.

use serde::{Deserialize, Serialize};
use sigscan_core::types::Timeframe;
use sigscan_data::UniverseFile;

use crate::market_hours::MarketHours;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Pause between rounds
    pub interval_secs: u64,
    /// Tasks still running after this are abandoned
    pub round_deadline_secs: u64,
    /// Concurrent fetches
    pub workers: usize,
    pub timeframe: Timeframe,
    /// Bars requested per symbol
    pub lookback: usize,
    /// Symbols with fewer bars are skipped
    pub min_bars: usize,
    pub universe: Vec<UniverseFile>,
    pub excluded_venues: Vec<String>,
    pub signal_file: String,
    pub last_seen_file: String,
    /// Session gate for venues that do not trade around the clock
    pub market_hours: MarketHours,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            interval_secs: 900,
            round_deadline_secs: 300,
            workers: 30,
            timeframe: Timeframe::Minute15,
            lookback: 500,
            min_bars: 26,
            universe: Vec::new(),
            excluded_venues: vec!["CboeEurope".to_string(), "BMV".to_string(), "B3".to_string()],
            signal_file: "last_signals.csv".to_string(),
            last_seen_file: "last_signals.json".to_string(),
            market_hours: MarketHours::default(),
        }
    }
}

impl ScanSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("scan.workers must be at least 1".into());
        }
        if self.round_deadline_secs == 0 {
            return Err("scan.round_deadline_secs must be positive".into());
        }
        if self.lookback > 0 && self.lookback < self.min_bars {
            return Err(format!(
                "scan.lookback ({}) is smaller than scan.min_bars ({})",
                self.lookback, self.min_bars
            ));
        }
        self.market_hours.gate()?;
        Ok(())
    }
}
