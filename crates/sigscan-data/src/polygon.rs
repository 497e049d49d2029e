//! Polygon.io aggregates adapter.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use sigscan_core::error::DataError;
use sigscan_core::traits::DataSource;
use sigscan_core::types::{Bar, Instrument, Timeframe};
use tracing::debug;

use crate::http::{build_client, get_json};
use crate::tail;

/// Shortest history window requested, in calendar days.
const MIN_WINDOW_DAYS: i64 = 365;
const MAX_RESULTS: usize = 50_000;

#[derive(Debug, Deserialize)]
struct AggsResponse {
    #[serde(default)]
    results: Vec<AggBar>,
}

#[derive(Debug, Deserialize)]
struct AggBar {
    t: i64,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    #[serde(default)]
    v: f64,
}

/// Fetches equity candles from `GET /v2/aggs/ticker/{symbol}/range/{mult}/{span}/{from}/{to}`.
pub struct PolygonSource {
    base_url: String,
    api_key: String,
    client: Client,
}

impl PolygonSource {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, DataError> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: build_client(timeout_secs)?,
        })
    }

    /// Create with the API key read from the named environment variable.
    pub fn from_env(base_url: impl Into<String>, key_var: &str, timeout_secs: u64) -> Result<Self, DataError> {
        let api_key = std::env::var(key_var)
            .map_err(|_| DataError::Internal(format!("{} is not set", key_var)))?;
        Self::new(base_url, api_key, timeout_secs)
    }

    /// First day of the request window ending at `today`.
    ///
    /// At least a year back, widened for long intraday lookbacks so that weekends and
    /// closed sessions still leave `lookback` bars.
    pub fn window_start(today: NaiveDate, timeframe: Timeframe, lookback: usize) -> NaiveDate {
        let span_secs = lookback as i64 * timeframe.as_secs() as i64;
        let needed_days = (span_secs + 86_399) / 86_400 * 2;
        today - Duration::days(needed_days.max(MIN_WINDOW_DAYS))
    }
}

#[async_trait]
impl DataSource for PolygonSource {
    async fn fetch(
        &self,
        instrument: &Instrument,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<Vec<Bar>, DataError> {
        let today = Utc::now().date_naive();
        let from = Self::window_start(today, timeframe, lookback);
        let (multiplier, timespan) = timeframe.polygon_range();

        let url = format!(
            "{}/v2/aggs/ticker/{}/range/{}/{}/{}/{}",
            self.base_url,
            instrument.symbol.to_uppercase(),
            multiplier,
            timespan,
            from.format("%Y-%m-%d"),
            today.format("%Y-%m-%d"),
        );

        let request = self.client.get(&url).query(&[
            ("adjusted", "true".to_string()),
            ("sort", "asc".to_string()),
            ("limit", MAX_RESULTS.to_string()),
            ("apiKey", self.api_key.clone()),
        ]);

        let data: AggsResponse = get_json(request).await?;
        debug!(symbol = %instrument.symbol, results = data.results.len(), "polygon aggregates received");

        let bars = data
            .results
            .into_iter()
            .map(|a| Bar::new(a.t, a.o, a.h, a.l, a.c, a.v))
            .collect();

        Ok(tail(bars, lookback))
    }

    fn name(&self) -> &str {
        "polygon"
    }
}
