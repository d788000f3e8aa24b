// src/http.rs
use std::time::Duration;

pub const USER_AGENT: &str = "asymmetry-scanner/0.1";

/// Build a reqwest client with connect + request timeouts.
///
/// Falls back to a default client if the builder rejects the settings, so
/// callers never have to handle construction failure.
pub fn client(user_agent: &str, timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(4).min(timeout))
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "http client builder failed; using defaults");
            reqwest::Client::new()
        })
}
