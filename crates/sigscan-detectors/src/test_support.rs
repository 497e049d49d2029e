//! Fixtures for detector tests.

use sigscan_core::types::{AnalyzedSeries, Bar, BarSeries, IndicatorFrame, RegimeFlags, Timeframe};
use sigscan_indicators::{IndicatorPipeline, IndicatorSettings};

pub(crate) const DAY_MS: i64 = 86_400_000;

pub(crate) fn bar(i: i64, open: f64, high: f64, low: f64, close: f64) -> Bar {
    Bar::new(i * DAY_MS, open, high, low, close, 1000.0)
}

pub(crate) fn series(bars: Vec<Bar>) -> BarSeries {
    let (series, rejected) = BarSeries::from_bars_validated("TEST", Timeframe::Daily, bars).unwrap();
    assert!(rejected.is_empty(), "fixture bars rejected: {rejected:?}");
    series
}

/// Run the default pipeline over the bars.
pub(crate) fn analyzed(bars: Vec<Bar>) -> AnalyzedSeries {
    IndicatorPipeline::new(&IndicatorSettings::default())
        .unwrap()
        .analyze(series(bars))
        .unwrap()
}

/// Bundle hand-built frames and regimes with the bars.
pub(crate) fn analyzed_with(
    bars: Vec<Bar>,
    frames: Vec<IndicatorFrame>,
    regimes: Vec<RegimeFlags>,
) -> AnalyzedSeries {
    AnalyzedSeries::new(series(bars), frames, regimes).unwrap()
}

/// Flat bars around `price`.
pub(crate) fn flat_bars(n: usize, price: f64) -> Vec<Bar> {
    (0..n as i64)
        .map(|i| bar(i, price, price + 1.0, price - 1.0, price))
        .collect()
}
