//! Venue to data source routing.

use async_trait::async_trait;
use sigscan_core::error::DataError;
use sigscan_core::traits::DataSource;
use sigscan_core::types::{Bar, Instrument, Timeframe};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::{BinanceSource, DataSettings, PolygonSource};

/// Venue whose instruments are crypto pairs served by Binance.
pub const BINANCE_VENUE: &str = "BINANCE";

/// Maps venues to data sources.
///
/// Venue names match case-insensitively. Excluded venues are never fetched; venues
/// without an explicit route fall back to the default source when one is set.
#[derive(Clone, Default)]
pub struct VenueRouter {
    routes: HashMap<String, Arc<dyn DataSource>>,
    default: Option<Arc<dyn DataSource>>,
    excluded: Vec<String>,
}

impl VenueRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard wiring: Binance for `BINANCE`, Polygon for everything else.
    ///
    /// A missing Polygon key leaves equities unrouted instead of failing the whole scan.
    pub fn from_settings(settings: &DataSettings, excluded: &[String]) -> Result<Self, DataError> {
        let binance = BinanceSource::new(&settings.binance_url, settings.request_timeout_secs)?;
        let mut router = Self::new()
            .with_route(BINANCE_VENUE, Arc::new(binance))
            .with_excluded(excluded.iter().cloned());

        match PolygonSource::from_env(
            &settings.polygon_url,
            &settings.polygon_api_key_env,
            settings.request_timeout_secs,
        ) {
            Ok(polygon) => router = router.with_default(Arc::new(polygon)),
            Err(e) => warn!(error = %e, "polygon source disabled, equity venues are unrouted"),
        }

        Ok(router)
    }

    pub fn with_route(mut self, venue: &str, source: Arc<dyn DataSource>) -> Self {
        self.routes.insert(venue.to_uppercase(), source);
        self
    }

    pub fn with_default(mut self, source: Arc<dyn DataSource>) -> Self {
        self.default = Some(source);
        self
    }

    pub fn with_excluded(mut self, venues: impl IntoIterator<Item = String>) -> Self {
        self.excluded.extend(venues);
        self
    }

    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    pub fn is_excluded(&self, venue: &str) -> bool {
        self.excluded.iter().any(|e| e.eq_ignore_ascii_case(venue))
    }

    /// Resolve the source serving `venue`.
    pub fn route(&self, venue: &str) -> Result<&Arc<dyn DataSource>, DataError> {
        if self.is_excluded(venue) {
            return Err(DataError::UnroutedVenue(format!("{} (excluded)", venue)));
        }
        self.routes
            .get(&venue.to_uppercase())
            .or(self.default.as_ref())
            .ok_or_else(|| DataError::UnroutedVenue(venue.to_string()))
    }
}

#[async_trait]
impl DataSource for VenueRouter {
    async fn fetch(
        &self,
        instrument: &Instrument,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<Vec<Bar>, DataError> {
        self.route(&instrument.venue)?
            .fetch(instrument, timeframe, lookback)
            .await
    }

    fn name(&self) -> &str {
        "router"
    }
}
