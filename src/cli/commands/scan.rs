//! Scan command implementation.

use anyhow::{Context, Result};
use sigscan_config::AppConfig;
use sigscan_core::traits::DataSource;
use sigscan_core::types::{Instrument, DEFAULT_VENUE};
use sigscan_data::{load_universe_files, CsvDataSource, VenueRouter};
use sigscan_indicators::IndicatorPipeline;
use sigscan_monitor::{LogNotifier, TelegramNotifier};
use sigscan_scanner::{CsvSignalSink, JsonLastSeenStore, ScanOrchestrator};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::detector_settings;
use crate::cli::ScanArgs;

pub async fn run(args: ScanArgs, config: AppConfig) -> Result<()> {
    let mut scan = config.scan.clone();
    if let Some(tf) = &args.timeframe {
        scan.timeframe = tf.parse().context("invalid --timeframe")?;
    }
    if let Some(output) = &args.output {
        scan.signal_file = output.display().to_string();
    }
    let detector = detector_settings(&config, args.strategy.as_deref())?;

    let instruments = if args.symbols.is_empty() {
        load_universe_files(&scan.universe)
            .context("Failed to load symbol universe")?
            .instruments(&scan.excluded_venues)
    } else {
        parse_instruments(&args.symbols)
    };
    if instruments.is_empty() {
        anyhow::bail!("No instruments to scan. Configure scan.universe or pass --symbols (e.g. -S BTC-USDT@BINANCE,AAPL)");
    }

    let source: Arc<dyn DataSource> = match &args.data {
        Some(dir) => Arc::new(CsvDataSource::new(dir)?),
        None => Arc::new(VenueRouter::from_settings(&config.data, &scan.excluded_venues)?),
    };

    let pipeline = IndicatorPipeline::new(&config.indicators).context("Invalid indicator settings")?;
    let store = Arc::new(JsonLastSeenStore::new(&scan.last_seen_file));

    let mut orchestrator = ScanOrchestrator::new(&scan, source, pipeline, detector.clone(), store)?
        .with_sink(Arc::new(CsvSignalSink::new(&scan.signal_file)));

    if config.notify.log_signals {
        orchestrator = orchestrator.with_notifier(Arc::new(LogNotifier));
    }
    if config.notify.enabled {
        match TelegramNotifier::from_settings(&config.notify) {
            Ok(telegram) => orchestrator = orchestrator.with_notifier(Arc::new(telegram)),
            Err(e) => warn!(error = %e, "telegram notifications disabled"),
        }
    }

    info!(
        strategy = %detector.kind,
        instruments = instruments.len(),
        timeframe = %scan.timeframe,
        workers = scan.workers,
        "starting scanner"
    );

    if args.once {
        let report = orchestrator.run_round(&instruments).await?;
        println!(
            "Scanned {} of {} instruments: {} new signal(s), {} suppressed, {} skipped ({} market closed), {} failed, {} abandoned",
            report.scanned,
            report.instruments,
            report.signals.len(),
            report.suppressed,
            report.skipped,
            report.market_closed,
            report.failures.len(),
            report.abandoned,
        );
        for signal in &report.signals {
            println!(
                "  {} {} entry={} stop={}",
                signal.symbol, signal.direction, signal.entry_price, signal.stop_loss
            );
        }
        return Ok(());
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "could not listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    orchestrator
        .run_loop(&instruments, Duration::from_secs(scan.interval_secs), shutdown)
        .await?;

    info!("scanner stopped");
    Ok(())
}

/// `SYMBOL@VENUE`, or a bare symbol on the default venue.
fn parse_instruments(raw: &[String]) -> Vec<Instrument> {
    raw.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| match s.split_once('@') {
            Some((symbol, venue)) => Instrument::new(symbol, venue),
            None => Instrument::new(s, DEFAULT_VENUE),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_instruments() {
        let raw = vec!["BTC-USDT@BINANCE".to_string(), " AAPL ".to_string(), String::new()];
        assert_eq!(
            parse_instruments(&raw),
            vec![
                Instrument::new("BTC-USDT", "BINANCE"),
                Instrument::new("AAPL", DEFAULT_VENUE),
            ]
        );
    }
}
