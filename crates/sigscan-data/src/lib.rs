//! Market data sources for the signal scanner.
//!
//! Every source implements [`DataSource`](sigscan_core::DataSource) and returns bars in
//! ascending timestamp order. [`VenueRouter`] picks the source for an instrument based on
//! the venue it trades on.

mod binance;
mod csv_source;
mod http;
mod polygon;
mod router;
mod settings;
mod universe;

pub use binance::BinanceSource;
pub use csv_source::CsvDataSource;
pub use polygon::PolygonSource;
pub use router::{VenueRouter, BINANCE_VENUE};
pub use settings::DataSettings;
pub use universe::{load_universe, load_universe_files, UniverseFile};

use sigscan_core::types::Bar;

/// Keep only the newest `lookback` bars. A lookback of zero keeps everything.
pub(crate) fn tail(mut bars: Vec<Bar>, lookback: usize) -> Vec<Bar> {
    if lookback > 0 && bars.len() > lookback {
        bars.drain(..bars.len() - lookback);
    }
    bars
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_keeps_newest() {
        let bars: Vec<Bar> = (0..5)
            .map(|i| Bar::new(i, 1.0, 1.0, 1.0, 1.0, 0.0))
            .collect();

        let kept = tail(bars.clone(), 2);
        assert_eq!(kept.iter().map(|b| b.timestamp).collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(tail(bars.clone(), 0).len(), 5);
        assert_eq!(tail(bars, 10).len(), 5);
    }
}
