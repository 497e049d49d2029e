//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, BacktestSettings};

use config::{Config, Environment, File};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Load configuration from file and environment.
///
/// `SIGSCAN__SCAN__WORKERS=10` overrides `scan.workers`.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("SIGSCAN")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app: AppConfig = config.try_deserialize()?;
    validate(&app)?;
    Ok(app)
}

/// Cross-section checks beyond what deserialization enforces.
pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    config
        .indicators
        .validate()
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;
    config
        .detector
        .validate()
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;
    config.scan.validate().map_err(ConfigError::Invalid)?;
    if config.backtest.engine.max_hold == 0 {
        return Err(ConfigError::Invalid("backtest.max_hold must be at least 1".into()));
    }
    Ok(())
}

/// Render the effective configuration as TOML.
pub fn to_toml(config: &AppConfig) -> Result<String, ConfigError> {
    toml::to_string_pretty(config).map_err(|e| ConfigError::Invalid(e.to_string()))
}
