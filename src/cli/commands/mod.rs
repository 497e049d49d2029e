//! CLI command implementations.

pub mod backtest;
pub mod detectors;
pub mod scan;
pub mod validate;

use anyhow::{Context, Result};
use sigscan_config::AppConfig;
use sigscan_detectors::DetectorSettings;

/// Detector settings from config with an optional `--strategy` override.
pub(crate) fn detector_settings(config: &AppConfig, strategy: Option<&str>) -> Result<DetectorSettings> {
    let mut settings = config.detector.clone();
    if let Some(name) = strategy {
        settings.kind = name
            .parse()
            .with_context(|| format!("unknown strategy '{}'; run `sigscan detectors` for the list", name))?;
    }
    settings.validate().context("invalid detector settings")?;
    Ok(settings)
}
