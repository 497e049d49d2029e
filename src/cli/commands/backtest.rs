//! Backtest command implementation.

use anyhow::{Context, Result};
use sigscan_backtest::{BacktestEngine, SymbolFailure};
use sigscan_config::AppConfig;
use sigscan_core::traits::TradeSink;
use sigscan_core::types::{BarSeries, Timeframe};
use sigscan_data::CsvDataSource;
use sigscan_indicators::IndicatorPipeline;
use sigscan_scanner::CsvTradeSink;
use std::path::PathBuf;
use tracing::{info, warn};

use super::detector_settings;
use crate::cli::BacktestArgs;

pub async fn run(args: BacktestArgs, config: AppConfig) -> Result<()> {
    let detector = detector_settings(&config, args.strategy.as_deref())?;
    info!("Starting backtest for strategy: {}", detector.kind);

    let mut engine_config = config.backtest.engine.clone();
    if let Some(max_hold) = args.max_hold {
        engine_config.max_hold = max_hold;
    }
    if let Some(workers) = args.workers {
        engine_config.workers = workers;
    }

    let timeframe: Timeframe = match &args.timeframe {
        Some(tf) => tf.parse().context("invalid --timeframe")?,
        None => config.scan.timeframe,
    };

    let data_dir = args
        .data
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.data.csv_dir));
    if !data_dir.is_dir() {
        anyhow::bail!(
            "Data directory '{}' does not exist. Provide a directory of <SYMBOL>.csv files (e.g. --data ./data)",
            data_dir.display()
        );
    }
    let source = CsvDataSource::new(&data_dir)?;

    let symbols = if args.symbols.is_empty() {
        source.symbols()?
    } else {
        args.symbols.clone()
    };

    let (series, load_failures) = load_series(&source, &symbols, timeframe).await;
    if series.is_empty() {
        anyhow::bail!("No data loaded from {}", data_dir.display());
    }
    info!("Loaded data for {} symbols", series.len());

    let pipeline = IndicatorPipeline::new(&config.indicators).context("Invalid indicator settings")?;
    let engine = BacktestEngine::new(engine_config, pipeline, detector)?;

    // The engine blocks on its own rayon pool
    let mut report = tokio::task::spawn_blocking(move || engine.run(series))
        .await
        .context("backtest worker panicked")??;
    report.failures.extend(load_failures);

    let ledger_path = args
        .ledger
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.backtest.ledger_file));
    CsvTradeSink::new(&ledger_path)
        .write_trades(&report.trades)
        .with_context(|| format!("Failed to write trade ledger {}", ledger_path.display()))?;
    info!("Trade ledger written to {:?}", ledger_path);

    match args.output.as_str() {
        "json" => {
            let json = report.to_json()?;
            println!("{}", json);
        }
        _ => {
            println!("{}", report.summary());
        }
    }

    if let Some(save_path) = &args.save {
        let json = report.to_json()?;
        std::fs::write(save_path, json)?;
        info!("Results saved to {:?}", save_path);
    }

    Ok(())
}

/// Read and validate each symbol's bars. Unreadable symbols become failures.
async fn load_series(
    source: &CsvDataSource,
    symbols: &[String],
    timeframe: Timeframe,
) -> (Vec<BarSeries>, Vec<SymbolFailure>) {
    let mut series = Vec::with_capacity(symbols.len());
    let mut failures = Vec::new();

    for symbol in symbols {
        let loaded = source
            .load_all(symbol)
            .await
            .map_err(|e| e.to_string())
            .and_then(|bars| {
                BarSeries::from_bars_validated(symbol.as_str(), timeframe, bars).map_err(|e| e.to_string())
            });

        match loaded {
            Ok((s, rejected)) => {
                if !rejected.is_empty() {
                    warn!(symbol = %symbol, rejected = rejected.len(), "malformed bars dropped");
                }
                series.push(s);
            }
            Err(error) => {
                warn!(symbol = %symbol, error = %error, "skipping symbol");
                failures.push(SymbolFailure {
                    symbol: symbol.clone(),
                    error,
                });
            }
        }
    }

    (series, failures)
}
