//! Tradable instruments grouped by venue.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Venue assigned to tickers that carry no broker column.
pub const DEFAULT_VENUE: &str = "DEFAULT";

/// A symbol together with the venue it trades on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: String,
    pub venue: String,
}

impl Instrument {
    pub fn new(symbol: impl Into<String>, venue: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            venue: venue.into(),
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.symbol, self.venue)
    }
}

/// Venue -> symbols mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolUniverse {
    venues: BTreeMap<String, BTreeSet<String>>,
}

impl SymbolUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, venue: impl Into<String>, symbol: impl Into<String>) {
        self.venues
            .entry(venue.into())
            .or_default()
            .insert(symbol.into());
    }

    pub fn merge(&mut self, other: SymbolUniverse) {
        for (venue, symbols) in other.venues {
            self.venues.entry(venue).or_default().extend(symbols);
        }
    }

    pub fn venues(&self) -> impl Iterator<Item = &str> {
        self.venues.keys().map(String::as_str)
    }

    pub fn symbols(&self, venue: &str) -> Option<&BTreeSet<String>> {
        self.venues.get(venue)
    }

    /// Total number of (venue, symbol) pairs.
    pub fn len(&self) -> usize {
        self.venues.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into instruments, skipping excluded venues (case-insensitive).
    pub fn instruments(&self, excluded: &[String]) -> Vec<Instrument> {
        self.venues
            .iter()
            .filter(|(venue, _)| !excluded.iter().any(|e| e.eq_ignore_ascii_case(venue)))
            .flat_map(|(venue, symbols)| {
                symbols
                    .iter()
                    .map(move |symbol| Instrument::new(symbol.clone(), venue.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruments_skip_excluded_venues() {
        let mut universe = SymbolUniverse::new();
        universe.insert("BINANCE", "BTC-USDT");
        universe.insert("NASDAQ", "AAPL");
        universe.insert("BMV", "WALMEX");
        universe.insert("NASDAQ", "AAPL");

        assert_eq!(universe.len(), 3);

        let instruments = universe.instruments(&["bmv".to_string()]);
        assert_eq!(
            instruments,
            vec![
                Instrument::new("BTC-USDT", "BINANCE"),
                Instrument::new("AAPL", "NASDAQ"),
            ]
        );
    }
}
