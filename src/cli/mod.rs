//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sigscan")]
#[command(author, version, about = "Technical-indicator signal scanner and backtester")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", env = "SIGSCAN_CONFIG")]
    pub config: PathBuf,

    /// Log level, overrides logging.level
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan the symbol universe for signals
    Scan(ScanArgs),
    /// Replay a detector over historical CSV data
    Backtest(BacktestArgs),
    /// List available detectors
    Detectors,
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct ScanArgs {
    /// Detector to run, overrides detector.kind
    #[arg(short, long)]
    pub strategy: Option<String>,

    /// Instruments as SYMBOL or SYMBOL@VENUE (comma-separated), replaces the universe files
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Timeframe, overrides scan.timeframe
    #[arg(short, long)]
    pub timeframe: Option<String>,

    /// Read bars from a directory of CSV files instead of the network
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Signal CSV file, overrides scan.signal_file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Run a single round and exit
    #[arg(long)]
    pub once: bool,
}

#[derive(clap::Args)]
pub struct BacktestArgs {
    /// Detector to backtest, overrides detector.kind
    #[arg(short, long)]
    pub strategy: Option<String>,

    /// Symbols to test (comma-separated); defaults to every CSV in the data directory
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Directory of <SYMBOL>.csv files, overrides data.csv_dir
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Timeframe of the CSV bars
    #[arg(short, long)]
    pub timeframe: Option<String>,

    /// Bars before a forced exit, overrides backtest.max_hold
    #[arg(long)]
    pub max_hold: Option<usize>,

    /// Worker threads, overrides backtest.workers
    #[arg(long)]
    pub workers: Option<usize>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub output: String,

    /// Save the JSON report to a file
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Trade ledger CSV, overrides backtest.ledger_file
    #[arg(long)]
    pub ledger: Option<PathBuf>,
}
