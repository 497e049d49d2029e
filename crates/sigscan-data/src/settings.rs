//! Data source settings.

use serde::{Deserialize, Serialize};

/// Endpoints and credentials for the market data adapters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub binance_url: String,
    pub polygon_url: String,
    /// Name of the environment variable holding the Polygon API key
    pub polygon_api_key_env: String,
    /// Directory of `<SYMBOL>.csv` files for offline runs
    pub csv_dir: String,
    pub request_timeout_secs: u64,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            binance_url: "https://api.binance.com".to_string(),
            polygon_url: "https://api.polygon.io".to_string(),
            polygon_api_key_env: "POLYGON_API_KEY".to_string(),
            csv_dir: "data".to_string(),
            request_timeout_secs: 10,
        }
    }
}
