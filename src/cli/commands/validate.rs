//! Validate configuration command.

use anyhow::Result;
use sigscan_config::load_config;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match load_config(config_path) {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Detector: {}", config.detector.kind);
            println!("Scan timeframe: {}", config.scan.timeframe);
            println!("Scan interval: {}s (deadline {}s)", config.scan.interval_secs, config.scan.round_deadline_secs);
            println!("Scan workers: {}", config.scan.workers);
            println!("Universe files: {}", config.scan.universe.len());
            println!("Excluded venues: {}", config.scan.excluded_venues.join(", "));
            let hours = &config.scan.market_hours;
            if hours.enabled {
                println!("Market hours: {}-{} {} (always open: {})", hours.open, hours.close, hours.timezone, hours.always_open.join(", "));
            } else {
                println!("Market hours: disabled");
            }
            println!("Backtest max hold: {} bars", config.backtest.engine.max_hold);
            println!("Telegram notifications: {}", config.notify.enabled);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
