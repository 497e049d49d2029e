//! Symbol universe files.
//!
//! Semicolon-delimited CSV with a `Ticker` column and an optional `Broker` column naming
//! the venue:
//!
//! ```text
//! Ticker;Broker
//! AAPL;NASDAQ
//! WALMEX;BMV
//! ```

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use sigscan_core::error::DataError;
use sigscan_core::types::{SymbolUniverse, DEFAULT_VENUE};
use std::path::Path;
use tracing::{debug, info};

/// One universe file and an optional venue applied to every row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniverseFile {
    pub path: String,
    /// Overrides the `Broker` column, e.g. `BINANCE` for a crypto ticker list
    #[serde(default)]
    pub venue: Option<String>,
}

impl UniverseFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            venue: None,
        }
    }

    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = Some(venue.into());
        self
    }
}

/// Load one universe file.
///
/// Rows with an empty ticker are skipped. Without a `Broker` column or venue override,
/// tickers land in [`DEFAULT_VENUE`].
pub fn load_universe(file: &UniverseFile) -> Result<SymbolUniverse, DataError> {
    let path = Path::new(&file.path);
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| DataError::ParseError(format!("{}: {}", file.path, e)))?;

    let headers = reader
        .headers()
        .map_err(|e| DataError::ParseError(format!("{}: {}", file.path, e)))?
        .clone();

    let ticker_col = headers
        .iter()
        .position(|h| h == "Ticker")
        .ok_or_else(|| DataError::ParseError(format!("{}: missing 'Ticker' column", file.path)))?;
    let broker_col = headers.iter().position(|h| h == "Broker");

    let mut universe = SymbolUniverse::new();

    for record in reader.records() {
        let record = record.map_err(|e| DataError::ParseError(format!("{}: {}", file.path, e)))?;

        let ticker = record.get(ticker_col).unwrap_or_default();
        if ticker.is_empty() {
            debug!(path = %file.path, "skipping row without ticker");
            continue;
        }

        let venue = match (&file.venue, broker_col.and_then(|c| record.get(c))) {
            (Some(venue), _) => venue.as_str(),
            (None, Some(broker)) if !broker.is_empty() => broker,
            _ => DEFAULT_VENUE,
        };

        universe.insert(venue, ticker);
    }

    info!(path = %file.path, symbols = universe.len(), "universe loaded");
    Ok(universe)
}

/// Load and merge several universe files.
pub fn load_universe_files(files: &[UniverseFile]) -> Result<SymbolUniverse, DataError> {
    let mut universe = SymbolUniverse::new();
    for file in files {
        universe.merge(load_universe(file)?);
    }
    Ok(universe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigscan_core::types::Instrument;
    use std::path::PathBuf;

    fn write_temp(content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("sigscan-universe-{}.csv", uuid::Uuid::new_v4()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_with_broker_column() {
        let path = write_temp("Ticker;Broker;Name\nAAPL;NASDAQ;Apple\nWALMEX;BMV;Walmart\n;NYSE;Blank\nKO;NYSE;Coca-Cola\n");
        let universe = load_universe(&UniverseFile::new(path.to_string_lossy())).unwrap();

        assert_eq!(universe.len(), 3);
        assert!(universe.symbols("BMV").unwrap().contains("WALMEX"));

        let excluded = vec!["BMV".to_string()];
        let instruments = universe.instruments(&excluded);
        assert_eq!(
            instruments,
            vec![Instrument::new("AAPL", "NASDAQ"), Instrument::new("KO", "NYSE")]
        );

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_venue_override_and_default() {
        let crypto = write_temp("Ticker\nBTC-USDT\nETH-USDT\n");
        let plain = write_temp("Ticker\nMSFT\n");

        let universe = load_universe_files(&[
            UniverseFile::new(crypto.to_string_lossy()).with_venue("BINANCE"),
            UniverseFile::new(plain.to_string_lossy()),
        ])
        .unwrap();

        assert_eq!(universe.symbols("BINANCE").unwrap().len(), 2);
        assert!(universe.symbols(DEFAULT_VENUE).unwrap().contains("MSFT"));

        std::fs::remove_file(crypto).ok();
        std::fs::remove_file(plain).ok();
    }

    #[test]
    fn test_missing_ticker_column() {
        let path = write_temp("Symbol;Broker\nAAPL;NASDAQ\n");
        let result = load_universe(&UniverseFile::new(path.to_string_lossy()));
        assert!(matches!(result, Err(DataError::ParseError(msg)) if msg.contains("Ticker")));
        std::fs::remove_file(path).ok();
    }
}
