//! CSV bar files, one per symbol.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use sigscan_core::error::DataError;
use sigscan_core::traits::DataSource;
use sigscan_core::types::{Bar, Instrument, Timeframe};
use std::path::{Path, PathBuf};

use crate::tail;

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp", alias = "Datetime")]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
}

/// Reads `<dir>/<SYMBOL>.csv` for offline scans and backtests.
///
/// Rows are returned sorted by timestamp; duplicates and malformed prices are left for
/// series validation to reject.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    dir: PathBuf,
}

impl CsvDataSource {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, DataError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(DataError::Internal(format!(
                "data directory {} does not exist",
                dir.display()
            )));
        }
        Ok(Self { dir })
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", symbol))
    }

    /// Symbols with a CSV file in the directory, sorted.
    pub fn symbols(&self) -> Result<Vec<String>, DataError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| DataError::Internal(e.to_string()))?;

        let mut symbols: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        symbols.sort();
        Ok(symbols)
    }

    /// Load every bar in the symbol's file.
    pub async fn load_all(&self, symbol: &str) -> Result<Vec<Bar>, DataError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(DataError::SymbolNotFound(symbol.to_string()));
        }
        let content = tokio::fs::read(&path)
            .await
            .map_err(|e| DataError::Internal(format!("{}: {}", path.display(), e)))?;
        parse_bars(&content, &path)
    }
}

fn parse_bars(content: &[u8], path: &Path) -> Result<Vec<Bar>, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content);

    let mut bars = Vec::new();

    for result in reader.deserialize() {
        let record: CsvRecord =
            result.map_err(|e| DataError::ParseError(format!("{}: {}", path.display(), e)))?;

        let timestamp = parse_timestamp(&record.date)?;

        bars.push(Bar::new(
            timestamp,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        ));
    }

    bars.sort_by_key(|b| b.timestamp);

    Ok(bars)
}

/// Parse the date formats commonly found in exported bar files.
fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
    ];
    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis());
        }
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.timestamp_millis());
    }

    // Unix time, milliseconds past 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        return Ok(if ts > 10_000_000_000 { ts } else { ts * 1000 });
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}

#[async_trait]
impl DataSource for CsvDataSource {
    async fn fetch(
        &self,
        instrument: &Instrument,
        _timeframe: Timeframe,
        lookback: usize,
    ) -> Result<Vec<Bar>, DataError> {
        let bars = self.load_all(&instrument.symbol).await?;
        Ok(tail(bars, lookback))
    }

    fn name(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sigscan-csv-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("2024-01-15").unwrap(), 1_705_276_800_000);
        assert_eq!(parse_timestamp("2024-01-15 10:30:00").unwrap(), 1_705_314_600_000);
        assert_eq!(parse_timestamp("2024-01-15 10:30").unwrap(), 1_705_314_600_000);
        assert_eq!(parse_timestamp("1705312800000").unwrap(), 1_705_312_800_000);
        assert_eq!(parse_timestamp("1705312800").unwrap(), 1_705_312_800_000);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[tokio::test]
    async fn test_fetch_reads_symbol_file() {
        let dir = temp_dir();
        std::fs::write(
            dir.join("AAPL.csv"),
            "Date,Open,High,Low,Close,Volume\n\
             2024-01-03,102,103,101,102.5,900\n\
             2024-01-01,100,101,99,100.5,1000\n\
             2024-01-02,101,102,100,101.5,1100\n",
        )
        .unwrap();

        let source = CsvDataSource::new(&dir).unwrap();
        let instrument = Instrument::new("AAPL", "NASDAQ");

        let all = source.fetch(&instrument, Timeframe::Daily, 0).await.unwrap();
        assert_eq!(all.iter().map(|b| b.close).collect::<Vec<_>>(), vec![100.5, 101.5, 102.5]);

        let last_two = source.fetch(&instrument, Timeframe::Daily, 2).await.unwrap();
        assert_eq!(last_two.len(), 2);
        assert_eq!(last_two[0].close, 101.5);

        assert_eq!(source.symbols().unwrap(), vec!["AAPL".to_string()]);

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_missing_symbol() {
        let dir = temp_dir();
        let source = CsvDataSource::new(&dir).unwrap();

        let err = source
            .fetch(&Instrument::new("MSFT", "NASDAQ"), Timeframe::Daily, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound(s) if s == "MSFT"));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_directory() {
        let dir = std::env::temp_dir().join(format!("sigscan-missing-{}", uuid::Uuid::new_v4()));
        assert!(CsvDataSource::new(dir).is_err());
    }
}
