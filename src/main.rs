//! Signal scanner CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use sigscan_config::{load_config, AppConfig, ConfigError};
use sigscan_monitor::setup_logging;
use std::path::Path;
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging comes from the config file when it loads, CLI flags win
    let loaded = cli.config.exists().then(|| load_config(&cli.config));
    let mut logging = match &loaded {
        Some(Ok(config)) => config.logging.clone(),
        _ => Default::default(),
    };
    if let Some(level) = cli.log_level {
        logging.level = level.as_str().to_string();
    }
    if cli.json_logs {
        logging.format = "json".to_string();
    }
    let _log_guard = setup_logging(&logging);

    match cli.command {
        Commands::Scan(args) => {
            let config = resolve_config(loaded, &cli.config)?;
            cli::commands::scan::run(args, config).await
        }
        Commands::Backtest(args) => {
            let config = resolve_config(loaded, &cli.config)?;
            cli::commands::backtest::run(args, config).await
        }
        Commands::Detectors => cli::commands::detectors::run().await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
    }
}

/// A missing config file means defaults; a broken one is an error.
fn resolve_config(loaded: Option<Result<AppConfig, ConfigError>>, path: &Path) -> Result<AppConfig> {
    match loaded {
        Some(result) => result.with_context(|| format!("failed to load {}", path.display())),
        None => {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(AppConfig::default())
        }
    }
}
