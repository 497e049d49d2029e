//! Data source trait definitions.

use async_trait::async_trait;

use crate::error::DataError;
use crate::types::{Bar, Instrument, Timeframe};

/// Source of historical bars.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch up to `lookback` most recent bars, oldest first.
    ///
    /// An empty vector means the vendor has nothing for the symbol; callers
    /// skip it rather than fail.
    async fn fetch(
        &self,
        instrument: &Instrument,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<Vec<Bar>, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}
