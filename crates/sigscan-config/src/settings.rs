//! Configuration structures.

use serde::{Deserialize, Serialize};
use sigscan_backtest::BacktestConfig;
use sigscan_data::DataSettings;
use sigscan_detectors::DetectorSettings;
use sigscan_indicators::IndicatorSettings;
use sigscan_monitor::{LoggingConfig, NotifySettings};
use sigscan_scanner::ScanSettings;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub indicators: IndicatorSettings,
    #[serde(default)]
    pub detector: DetectorSettings,
    #[serde(default)]
    pub scan: ScanSettings,
    #[serde(default)]
    pub backtest: BacktestSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub notify: NotifySettings,
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "sigscan".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Backtest settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestSettings {
    #[serde(flatten)]
    pub engine: BacktestConfig,
    /// CSV trade ledger output
    pub ledger_file: String,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self {
            engine: BacktestConfig::default(),
            ledger_file: "backtest_trades.csv".to_string(),
        }
    }
}
