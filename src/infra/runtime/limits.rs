use std::time::Duration;

use crate::infra::config::ApiConfig;

const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 2_000;
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Build a reqwest client with default timeouts.
pub fn make_http_client() -> reqwest::Client {
    make_http_client_with(&ApiConfig::default())
}

/// Timeouts live here only; tool handlers never add their own.
pub fn make_http_client_with(cfg: &ApiConfig) -> reqwest::Client {
    let connect = cfg.connect_timeout_ms.unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS);
    let total = cfg.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS);
    reqwest::Client::builder()
        .connect_timeout(Duration::from_millis(connect))
        .timeout(Duration::from_millis(total))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default reqwest client");
            reqwest::Client::new()
        })
}
