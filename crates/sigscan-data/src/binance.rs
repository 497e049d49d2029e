//! Binance spot klines adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use sigscan_core::error::DataError;
use sigscan_core::traits::DataSource;
use sigscan_core::types::{Bar, Instrument, Timeframe};
use tracing::debug;

use crate::http::{build_client, get_json};

/// Largest page the klines endpoint serves.
const MAX_KLINES: usize = 1000;

/// Fetches candles from `GET /api/v3/klines`.
pub struct BinanceSource {
    base_url: String,
    client: Client,
}

impl BinanceSource {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, DataError> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: build_client(timeout_secs)?,
        })
    }

    /// Binance pairs carry no separator: `BTC-USDT` is queried as `BTCUSDT`.
    pub fn pair(symbol: &str) -> String {
        symbol.replace('-', "").to_uppercase()
    }

    fn parse_kline(row: &[Value]) -> Result<Bar, DataError> {
        if row.len() < 5 {
            return Err(DataError::ParseError(format!(
                "kline has {} fields, expected at least 5",
                row.len()
            )));
        }

        let timestamp = row[0]
            .as_i64()
            .ok_or_else(|| DataError::ParseError(format!("bad open time: {}", row[0])))?;

        let price = |value: &Value| -> Result<f64, DataError> {
            match value {
                Value::String(s) => s
                    .parse::<f64>()
                    .map_err(|e| DataError::ParseError(format!("{}: {}", s, e))),
                Value::Number(n) => n
                    .as_f64()
                    .ok_or_else(|| DataError::ParseError(n.to_string())),
                other => Err(DataError::ParseError(format!("bad price: {}", other))),
            }
        };

        let volume = match row.get(5) {
            Some(v) => price(v)?,
            None => 0.0,
        };

        Ok(Bar::new(
            timestamp,
            price(&row[1])?,
            price(&row[2])?,
            price(&row[3])?,
            price(&row[4])?,
            volume,
        ))
    }
}

#[async_trait]
impl DataSource for BinanceSource {
    async fn fetch(
        &self,
        instrument: &Instrument,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<Vec<Bar>, DataError> {
        let url = format!("{}/api/v3/klines", self.base_url);
        let limit = if lookback == 0 { MAX_KLINES } else { lookback.min(MAX_KLINES) };

        let request = self.client.get(&url).query(&[
            ("symbol", Self::pair(&instrument.symbol)),
            ("interval", timeframe.binance_interval().to_string()),
            ("limit", limit.to_string()),
        ]);

        let rows: Vec<Vec<Value>> = get_json(request).await?;
        debug!(symbol = %instrument.symbol, rows = rows.len(), "binance klines received");

        rows.iter().map(|row| Self::parse_kline(row)).collect()
    }

    fn name(&self) -> &str {
        "binance"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_pair_strips_separator() {
        assert_eq!(BinanceSource::pair("BTC-USDT"), "BTCUSDT");
        assert_eq!(BinanceSource::pair("eth-btc"), "ETHBTC");
    }

    #[tokio::test]
    async fn test_fetch_parses_string_prices() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/klines"))
            .and(query_param("symbol", "BTCUSDT"))
            .and(query_param("interval", "15m"))
            .and(query_param("limit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                [1700000000000i64, "100.5", "101.0", "99.5", "100.8", "12.3", 1700000899999i64],
                [1700000900000i64, "100.8", "102.0", "100.1", "101.9", "8.0", 1700001799999i64]
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let source = BinanceSource::new(server.uri(), 5).unwrap();
        let bars = source
            .fetch(&Instrument::new("BTC-USDT", "BINANCE"), Timeframe::Minute15, 2)
            .await
            .unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp, 1_700_000_000_000);
        assert_eq!(bars[0].open, 100.5);
        assert_eq!(bars[1].close, 101.9);
        assert_eq!(bars[1].volume, 8.0);
    }

    #[tokio::test]
    async fn test_fetch_maps_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/klines"))
            .respond_with(ResponseTemplate::new(400).set_body_string("{\"code\":-1121}"))
            .mount(&server)
            .await;

        let source = BinanceSource::new(server.uri(), 5).unwrap();
        let err = source
            .fetch(&Instrument::new("NOPE-USDT", "BINANCE"), Timeframe::Hour1, 10)
            .await
            .unwrap_err();

        assert!(matches!(err, DataError::ApiError(msg) if msg.contains("400")));
    }

    #[tokio::test]
    async fn test_fetch_rejects_short_rows() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/klines"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([[1, "1.0"]])))
            .mount(&server)
            .await;

        let source = BinanceSource::new(server.uri(), 5).unwrap();
        let result = source
            .fetch(&Instrument::new("BTC-USDT", "BINANCE"), Timeframe::Hour1, 10)
            .await;

        assert!(matches!(result, Err(DataError::ParseError(_))));
    }
}
