//! Trend verdict: the structured answer expected from the scoring oracle.
//!
//! The oracle is untrusted. Decoding is a separate step with a tagged result;
//! the scorer turns any `Err` into [`TrendVerdict::fallback`].

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::Deserialize;

use crate::error::{Result, ScanError};

/// Literal the oracle uses for "no ticker applies" (case-insensitive).
pub const NO_TICKER_SENTINEL: &str = "none";

/// Maximum length (chars) of the error text carried in a fallback thesis.
pub const FALLBACK_THESIS_MAX: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrendVerdict {
    #[serde(default)]
    pub asymmetry_score: i64,
    #[serde(default)]
    pub thesis: String,
    #[serde(default)]
    pub tickers: Vec<String>,
    #[serde(default = "default_conviction")]
    pub conviction: String,
    #[serde(default)]
    pub sources_summary: String,
}

fn default_conviction() -> String {
    "low".to_string()
}

impl TrendVerdict {
    /// Zero-score verdict used whenever the oracle call or decode fails.
    pub fn fallback(reason: &str) -> Self {
        Self {
            asymmetry_score: 0,
            thesis: truncate_chars(&format!("Error: {reason}"), FALLBACK_THESIS_MAX),
            tickers: Vec::new(),
            conviction: default_conviction(),
            sources_summary: String::new(),
        }
    }

    pub fn qualifies(&self, threshold: i64) -> bool {
        self.asymmetry_score >= threshold
    }
}

/// True if `ticker` names a real symbol (not blank, not the sentinel).
pub fn is_real_ticker(ticker: &str) -> bool {
    let t = ticker.trim();
    !t.is_empty() && !t.eq_ignore_ascii_case(NO_TICKER_SENTINEL)
}

/// Remove a surrounding fenced code block (```` ``` ```` or ```` ```json ````), if any.
pub fn strip_code_fence(raw: &str) -> &str {
    static RE_FENCE: OnceCell<Regex> = OnceCell::new();
    let re = RE_FENCE.get_or_init(|| {
        Regex::new(r"(?s)\A```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)\r?\n?[ \t]*```\z")
            .expect("static fence regex")
    });
    let t = raw.trim();
    match re.captures(t).and_then(|c| c.get(1)) {
        Some(m) => m.as_str().trim(),
        None => t,
    }
}

/// Decode an oracle payload into a verdict.
///
/// Missing fields take defaults; a non-object payload or a field of the
/// wrong type is a parse failure.
pub fn decode_verdict(raw: &str) -> Result<TrendVerdict> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(ScanError::OracleParse("empty response".into()));
    }
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ScanError::OracleParse(e.to_string()))?;
    if !value.is_object() {
        return Err(ScanError::OracleParse("expected a JSON object".into()));
    }
    serde_json::from_value(value).map_err(|e| ScanError::OracleParse(e.to_string()))
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
