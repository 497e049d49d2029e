//! Shared HTTP plumbing for the REST adapters.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use sigscan_core::error::DataError;
use std::time::Duration;

pub(crate) fn build_client(timeout_secs: u64) -> Result<Client, DataError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .user_agent(concat!("sigscan/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| DataError::ConnectionError(e.to_string()))
}

/// Send a request and decode a JSON body, mapping non-2xx statuses to `ApiError`.
pub(crate) async fn get_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, DataError> {
    let resp = request
        .send()
        .await
        .map_err(|e| DataError::ConnectionError(e.to_string()))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        return Err(DataError::ApiError(format!("{}: {}", status, text)));
    }

    resp.json()
        .await
        .map_err(|e| DataError::ParseError(e.to_string()))
}
