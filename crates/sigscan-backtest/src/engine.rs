//! Batch backtesting engine.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sigscan_core::error::{ScanError, ScanResult};
use sigscan_core::types::{BarSeries, Trade};
use sigscan_detectors::{DetectorRegistry, DetectorSettings};
use sigscan_indicators::IndicatorPipeline;
use tracing::{debug, info, warn};

use crate::report::BacktestReport;
use crate::simulator::PositionSimulator;
use crate::statistics::LedgerStats;

/// Backtest configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Bars after entry before a forced exit
    pub max_hold: usize,
    /// Worker threads; 0 uses one per core
    pub workers: usize,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            max_hold: 7,
            workers: 0,
        }
    }
}

/// A symbol excluded from the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolFailure {
    pub symbol: String,
    pub error: String,
}

/// Replays one detector over many symbols in parallel.
///
/// Symbols are independent; within a symbol bars are processed in order.
pub struct BacktestEngine {
    config: BacktestConfig,
    pipeline: IndicatorPipeline,
    detector: DetectorSettings,
    registry: DetectorRegistry,
}

impl BacktestEngine {
    /// Create a new backtest engine.
    pub fn new(
        config: BacktestConfig,
        pipeline: IndicatorPipeline,
        detector: DetectorSettings,
    ) -> ScanResult<Self> {
        if config.max_hold == 0 {
            return Err(ScanError::Config("max_hold must be at least 1".into()));
        }
        let registry = DetectorRegistry::new();
        registry.create(&detector)?;
        Ok(Self {
            config,
            pipeline,
            detector,
            registry,
        })
    }

    /// Simulate a single symbol.
    pub fn run_symbol(&self, series: BarSeries) -> ScanResult<Vec<Trade>> {
        let symbol = series.symbol.clone();
        let analyzed = self.pipeline.analyze(series)?;
        let mut detector = self.registry.create(&self.detector)?;

        let trades = PositionSimulator::new(self.config.max_hold).run(&mut detector, &analyzed)?;
        debug!(symbol = %symbol, trades = trades.len(), "symbol backtested");
        Ok(trades)
    }

    /// Run every series on a pool sized by `workers`.
    ///
    /// Symbols whose data or indicators fail are logged and reported as
    /// failures. A detector state error aborts the run.
    pub fn run(&self, data: Vec<BarSeries>) -> ScanResult<BacktestReport> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if self.config.workers > 0 {
            builder = builder.num_threads(self.config.workers);
        }
        let pool = builder
            .build()
            .map_err(|e| ScanError::Config(format!("backtest thread pool: {e}")))?;

        let symbols_tested = data.len();
        info!(
            symbols = symbols_tested,
            strategy = %self.detector.kind,
            threads = pool.current_num_threads(),
            "starting backtest"
        );

        let results: Vec<(String, ScanResult<Vec<Trade>>)> = pool.install(|| {
            data.into_par_iter()
                .map(|series| {
                    let symbol = series.symbol.clone();
                    (symbol, self.run_symbol(series))
                })
                .collect()
        });

        let mut trades = Vec::new();
        let mut failures = Vec::new();

        for (symbol, result) in results {
            match result {
                Ok(symbol_trades) => trades.extend(symbol_trades),
                Err(ScanError::Detector(e)) => {
                    return Err(ScanError::task_failure(symbol, e));
                }
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "symbol excluded from backtest");
                    failures.push(SymbolFailure {
                        symbol,
                        error: e.to_string(),
                    });
                }
            }
        }

        trades.sort_by(|a, b| a.symbol.cmp(&b.symbol).then(a.entry_index.cmp(&b.entry_index)));
        let stats = LedgerStats::from_trades(&trades);

        info!(
            trades = stats.total_trades,
            failures = failures.len(),
            "backtest complete"
        );

        Ok(BacktestReport {
            strategy: self.detector.kind,
            config: self.config.clone(),
            symbols_tested,
            stats,
            trades,
            failures,
            generated_at: chrono::Utc::now(),
        })
    }
}
