//! Shared HTTP client construction.

use std::time::Duration;

use crate::config::NetworkConfig;

/// Build the `reqwest` client shared by the STT and LLM callers.
///
/// The per-request timeout comes from `config.request_timeout_secs`; a value
/// of `0` disables it.  A default client is used if the builder fails.
pub fn build_client(config: &NetworkConfig) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();
    if config.request_timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
    }
    builder.build().unwrap_or_else(|e| {
        log::warn!("http: client builder failed ({e}), using defaults");
        reqwest::Client::new()
    })
}
