//! Error taxonomy used inside component boundaries.
//!
//! No variant ever crosses a component boundary upward: fetchers turn errors
//! into `SignalOutcome::Unavailable`, the scorer into a fallback verdict, the
//! enricher into `MarketLine::Unavailable`, and delivery into a log line.

use thiserror::Error;

/// Result alias for fallible scanner internals.
pub type Result<T> = std::result::Result<T, ScanError>;

#[derive(Error, Debug)]
pub enum ScanError {
    /// Credentials missing or upstream unreachable.
    #[error("{source_name} unavailable: {reason}")]
    SourceUnavailable {
        source_name: &'static str,
        reason: String,
    },

    /// The scoring oracle could not be called or returned no content.
    #[error("oracle call failed: {0}")]
    OracleCall(String),

    /// The oracle answered but the payload is not a verdict.
    #[error("oracle parse failure: {0}")]
    OracleParse(String),

    /// Ticker lookup failed.
    #[error("market data for {ticker} failed: {reason}")]
    Enrichment { ticker: String, reason: String },

    /// Webhook unreachable or rejected the payload.
    #[error("delivery failed: {0}")]
    Delivery(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ScanError {
    pub fn unavailable(source_name: &'static str, reason: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            source_name,
            reason: reason.into(),
        }
    }

    /// Short reason suitable for evidence strings and fallback theses.
    pub fn short_reason(&self) -> String {
        match self {
            Self::SourceUnavailable { reason, .. } => reason.clone(),
            Self::Http(e) if e.is_timeout() => "request timed out".to_string(),
            Self::Http(e) => match e.status() {
                Some(status) => format!("HTTP {status}"),
                None => "request failed".to_string(),
            },
            other => other.to_string(),
        }
    }
}
