//! Scan rounds over a symbol universe.

use chrono::Utc;
use futures::future::join_all;
use sigscan_core::error::{ScanError, ScanResult};
use sigscan_core::traits::{DataSource, LastSeenStore, Notifier, PatternDetector, SignalSink};
use sigscan_core::types::{BarSeries, Instrument, Signal, Timeframe};
use sigscan_detectors::{DetectorRegistry, DetectorSettings};
use sigscan_indicators::IndicatorPipeline;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::format::format_signal_message;
use crate::market_hours::MarketGate;
use crate::settings::ScanSettings;

/// What one symbol's task produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolOutcome {
    /// Fewer bars than the configured minimum
    Skipped { bars: usize },
    NoSignal,
    /// Latest-bar signal, not yet checked against the last-seen map
    Candidate(Signal),
}

/// Summary of one scan round.
#[derive(Debug, Default)]
pub struct RoundReport {
    pub instruments: usize,
    pub scanned: usize,
    /// Short series plus symbols held back by the market-hours gate
    pub skipped: usize,
    pub market_closed: usize,
    pub suppressed: usize,
    /// Newly emitted signals
    pub signals: Vec<Signal>,
    /// Per-symbol task failures, each a `ScanError::TaskFailure`
    pub failures: Vec<ScanError>,
    /// Tasks still running at the deadline
    pub abandoned: usize,
    pub panicked: usize,
    pub elapsed: Duration,
}

/// State shared by the per-symbol tasks of a round.
struct ScanContext {
    source: Arc<dyn DataSource>,
    pipeline: IndicatorPipeline,
    registry: DetectorRegistry,
    detector: DetectorSettings,
    timeframe: Timeframe,
    lookback: usize,
    min_bars: usize,
}

impl ScanContext {
    async fn scan_symbol(&self, instrument: &Instrument) -> ScanResult<SymbolOutcome> {
        let bars = self
            .source
            .fetch(instrument, self.timeframe, self.lookback)
            .await?;
        if bars.is_empty() || bars.len() < self.min_bars {
            return Ok(SymbolOutcome::Skipped { bars: bars.len() });
        }

        let (series, rejected) =
            BarSeries::from_bars_validated(instrument.symbol.as_str(), self.timeframe, bars)?;
        if !rejected.is_empty() {
            debug!(symbol = %instrument.symbol, rejected = rejected.len(), "malformed bars dropped");
        }
        if series.len() < self.min_bars {
            return Ok(SymbolOutcome::Skipped { bars: series.len() });
        }

        let analyzed = self.pipeline.analyze(series)?;
        let latest = analyzed.len() - 1;

        let mut detector = self.registry.create(&self.detector)?;
        let signal = detector
            .scan(&analyzed)?
            .into_iter()
            .rfind(|s| s.bar_index == latest);

        Ok(signal.map_or(SymbolOutcome::NoSignal, SymbolOutcome::Candidate))
    }
}

/// Runs scan rounds: fetch, analyze, detect, de-duplicate, emit.
///
/// One symbol's failure never aborts a round. A detector state error does, since it
/// means the detector itself is broken.
///
/// Only the round's own task reads or writes the last-seen map, and only with results
/// it has joined. A task abandoned at the deadline cannot mark its signal as seen.
pub struct ScanOrchestrator {
    ctx: Arc<ScanContext>,
    last_seen: Mutex<HashMap<String, i64>>,
    market: MarketGate,
    workers: usize,
    round_deadline: Duration,
    store: Arc<dyn LastSeenStore>,
    sinks: Vec<Arc<dyn SignalSink>>,
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl ScanOrchestrator {
    pub fn new(
        settings: &ScanSettings,
        source: Arc<dyn DataSource>,
        pipeline: IndicatorPipeline,
        detector: DetectorSettings,
        store: Arc<dyn LastSeenStore>,
    ) -> ScanResult<Self> {
        settings.validate().map_err(ScanError::Config)?;
        let market = settings.market_hours.gate().map_err(ScanError::Config)?;
        let registry = DetectorRegistry::new();
        registry.create(&detector)?;

        Ok(Self {
            ctx: Arc::new(ScanContext {
                source,
                pipeline,
                registry,
                detector,
                timeframe: settings.timeframe,
                lookback: settings.lookback,
                min_bars: settings.min_bars,
            }),
            last_seen: Mutex::new(HashMap::new()),
            market,
            workers: settings.workers,
            round_deadline: Duration::from_secs(settings.round_deadline_secs),
            store,
            sinks: Vec::new(),
            notifiers: Vec::new(),
        })
    }

    pub fn with_sink(mut self, sink: Arc<dyn SignalSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    /// Override the round deadline.
    pub fn with_round_deadline(mut self, deadline: Duration) -> Self {
        self.round_deadline = deadline;
        self
    }

    /// Replace the market-hours gate.
    pub fn with_market_gate(mut self, market: MarketGate) -> Self {
        self.market = market;
        self
    }

    /// Snapshot of the in-memory last-seen map.
    pub async fn last_seen(&self) -> HashMap<String, i64> {
        self.last_seen.lock().await.clone()
    }

    /// Scan every instrument once.
    pub async fn run_round(&self, instruments: &[Instrument]) -> ScanResult<RoundReport> {
        let started = Instant::now();

        let mut last_seen = self.last_seen.lock().await;
        match self.store.load() {
            Ok(map) => *last_seen = map,
            Err(e) => warn!(error = %e, "last-seen map unreadable, keeping in-memory state"),
        }

        let mut report = RoundReport {
            instruments: instruments.len(),
            ..Default::default()
        };
        let semaphore = Arc::new(Semaphore::new(self.workers.max(1)));
        let mut tasks = JoinSet::new();
        let now = Utc::now();

        for instrument in instruments.iter().cloned() {
            if !self.market.allows(&instrument.venue, now) {
                debug!(symbol = %instrument.symbol, venue = %instrument.venue, "market closed, skipped");
                report.market_closed += 1;
                report.skipped += 1;
                continue;
            }

            let ctx = Arc::clone(&self.ctx);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => ctx.scan_symbol(&instrument).await,
                    Err(e) => Err(ScanError::Config(format!("worker pool closed: {e}"))),
                };
                (instrument, result)
            });
        }

        let deadline = tokio::time::Instant::now() + self.round_deadline;

        loop {
            let next = tokio::time::timeout_at(deadline, tasks.join_next()).await;
            match next {
                Ok(Some(Ok((instrument, result)))) => {
                    if let Err(fatal) = Self::record(&mut report, &last_seen, &instrument, result) {
                        tasks.abort_all();
                        return Err(fatal);
                    }
                }
                Ok(Some(Err(join_error))) => {
                    error!(error = %join_error, "scan task panicked");
                    report.panicked += 1;
                }
                Ok(None) => break,
                Err(_) => {
                    report.abandoned = tasks.len();
                    warn!(
                        abandoned = report.abandoned,
                        deadline_secs = self.round_deadline.as_secs(),
                        "round deadline reached, abandoning unfinished symbols"
                    );
                    tasks.abort_all();
                    break;
                }
            }
        }

        self.emit(&report.signals).await;

        for signal in &report.signals {
            last_seen.insert(signal.symbol.clone(), signal.timestamp);
        }
        let snapshot = last_seen.clone();
        drop(last_seen);
        if let Err(e) = self.store.save(&snapshot) {
            error!(error = %e, "failed to persist last-seen map");
        }

        report.elapsed = started.elapsed();
        info!(
            instruments = report.instruments,
            scanned = report.scanned,
            skipped = report.skipped,
            market_closed = report.market_closed,
            new_signals = report.signals.len(),
            suppressed = report.suppressed,
            failures = report.failures.len(),
            abandoned = report.abandoned,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "scan round complete"
        );

        Ok(report)
    }

    /// Run rounds every `interval` until `shutdown` resolves.
    pub async fn run_loop<F>(&self, instruments: &[Instrument], interval: Duration, shutdown: F) -> ScanResult<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                result = self.run_round(instruments) => {
                    result?;
                }
                _ = &mut shutdown => {
                    info!("shutdown requested during round");
                    return Ok(());
                }
            }

            debug!(secs = interval.as_secs(), "waiting for next round");
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = &mut shutdown => {
                    info!("shutdown requested");
                    return Ok(());
                }
            }
        }
    }

    /// Fold one joined task result into the report. Detector errors are returned as fatal.
    ///
    /// A candidate whose timestamp matches the last-seen map, or one already accepted
    /// this round, is suppressed.
    fn record(
        report: &mut RoundReport,
        last_seen: &HashMap<String, i64>,
        instrument: &Instrument,
        result: ScanResult<SymbolOutcome>,
    ) -> ScanResult<()> {
        match result {
            Ok(SymbolOutcome::Skipped { bars }) => {
                debug!(symbol = %instrument.symbol, bars, "not enough bars, skipped");
                report.skipped += 1;
            }
            Ok(SymbolOutcome::NoSignal) => report.scanned += 1,
            Ok(SymbolOutcome::Candidate(signal))
                if last_seen.get(&signal.symbol) == Some(&signal.timestamp)
                    || report
                        .signals
                        .iter()
                        .any(|s| s.symbol == signal.symbol && s.timestamp == signal.timestamp) =>
            {
                debug!(symbol = %signal.symbol, timestamp = signal.timestamp, "signal already emitted, suppressed");
                report.scanned += 1;
                report.suppressed += 1;
            }
            Ok(SymbolOutcome::Candidate(signal)) => {
                info!(
                    symbol = %signal.symbol,
                    direction = %signal.direction,
                    strategy = %signal.strategy,
                    entry = signal.entry_price,
                    stop = signal.stop_loss,
                    "new signal"
                );
                report.scanned += 1;
                report.signals.push(signal);
            }
            Err(ScanError::Detector(e)) => {
                error!(symbol = %instrument.symbol, error = %e, "detector state error");
                return Err(ScanError::task_failure(instrument.symbol.as_str(), e));
            }
            Err(e) => {
                warn!(symbol = %instrument.symbol, venue = %instrument.venue, error = %e, "symbol task failed");
                report.failures.push(ScanError::task_failure(instrument.symbol.as_str(), e));
            }
        }
        Ok(())
    }

    /// Write to every sink and notify every notifier. Failures are logged only.
    async fn emit(&self, signals: &[Signal]) {
        if signals.is_empty() {
            return;
        }

        for sink in &self.sinks {
            if let Err(e) = sink.write_signals(signals) {
                error!(error = %e, count = signals.len(), "failed to write signals");
            }
        }

        for signal in signals {
            let message = format_signal_message(signal);
            let deliveries = join_all(self.notifiers.iter().map(|notifier| {
                let message = message.as_str();
                async move { (notifier.name().to_string(), notifier.notify(message).await) }
            }))
            .await;

            for (name, result) in deliveries {
                if let Err(e) = result {
                    warn!(notifier = %name, symbol = %signal.symbol, error = %e, "notification failed");
                }
            }
        }
    }
}
