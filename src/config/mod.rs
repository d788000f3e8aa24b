// src/config/mod.rs
//! Process configuration.
//!
//! Everything the scanner needs from the environment is read exactly once in
//! [`ScannerConfig::from_env`]; components receive their sub-config by
//! reference and never touch `std::env` themselves.

pub mod keywords;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::buzz::BuzzWeights;

pub const ENV_KEYWORDS_PATH: &str = "SCANNER_KEYWORDS_PATH";

pub const DEFAULT_THRESHOLD: i64 = 7;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REPORT_HEADER: &str = "**Camillo AI Daily Report**";

/// Scoring oracle (OpenAI-compatible chat completions endpoint).
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
    /// Deterministic in-process oracle, no network.
    pub test_mode: bool,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.6,
            timeout: Duration::from_secs(30),
            test_mode: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RedditConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub user_agent: String,
    /// Upper bound on posts counted per keyword.
    pub post_limit: u32,
    pub token_url: String,
    pub search_url: String,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            user_agent: "camillo-agent".to_string(),
            post_limit: 20,
            token_url: "https://www.reddit.com/api/v1/access_token".to_string(),
            search_url: "https://oauth.reddit.com/r/all/search".to_string(),
        }
    }
}

impl RedditConfig {
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.client_id.as_deref()?, self.client_secret.as_deref()?))
    }
}

#[derive(Debug, Clone)]
pub struct WebSearchConfig {
    pub api_key: Option<String>,
    /// Google country bias (`gl`).
    pub country: String,
    pub language: String,
    pub endpoint: String,
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            country: "ca".to_string(),
            language: "en".to_string(),
            endpoint: "https://serpapi.com/search.json".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SocialConfig {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub access_token: Option<String>,
    pub access_secret: Option<String>,
    pub token_url: String,
    pub search_url: String,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            access_token: None,
            access_secret: None,
            token_url: "https://api.twitter.com/oauth2/token".to_string(),
            search_url: "https://api.twitter.com/2/tweets/search/recent".to_string(),
        }
    }
}

impl SocialConfig {
    /// All four values must be present for the source to run.
    pub fn is_configured(&self) -> bool {
        [
            &self.api_key,
            &self.api_secret,
            &self.access_token,
            &self.access_secret,
        ]
        .iter()
        .all(|v| v.is_some())
    }
}

#[derive(Debug, Clone)]
pub struct SourcesConfig {
    pub reddit: RedditConfig,
    pub web_search: WebSearchConfig,
    pub social: SocialConfig,
    pub timeout: Duration,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            reddit: RedditConfig::default(),
            web_search: WebSearchConfig::default(),
            social: SocialConfig::default(),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Chart endpoint base; the symbol is appended as a path segment.
    pub chart_url: String,
    pub timeout: Duration,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            chart_url: "https://query2.finance.yahoo.com/v8/finance/chart".to_string(),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    pub webhook_url: Option<String>,
    pub timeout: Duration,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub keywords: Vec<String>,
    pub weights: BuzzWeights,
    pub threshold: i64,
    pub report_header: String,
    /// Keywords scanned at once; 1 keeps the run fully sequential.
    pub concurrency: usize,
    /// Re-run period; `None` runs once.
    pub interval: Option<Duration>,
    pub oracle: OracleConfig,
    pub sources: SourcesConfig,
    pub market: MarketConfig,
    pub delivery: DeliveryConfig,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            keywords: keywords::default_keywords(),
            weights: BuzzWeights::default(),
            threshold: DEFAULT_THRESHOLD,
            report_header: DEFAULT_REPORT_HEADER.to_string(),
            concurrency: 1,
            interval: None,
            oracle: OracleConfig::default(),
            sources: SourcesConfig::default(),
            market: MarketConfig::default(),
            delivery: DeliveryConfig::default(),
        }
    }
}

impl ScannerConfig {
    /// Build from the process environment (call `dotenvy::dotenv()` first).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| {
            lookup(k)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut cfg = Self::default();

        if let Some(p) = get(ENV_KEYWORDS_PATH) {
            let path = PathBuf::from(p);
            cfg.keywords = keywords::load_keywords_from(&path)?;
        }
        if let Some(v) = get("SCANNER_THRESHOLD") {
            cfg.threshold = v
                .parse()
                .with_context(|| format!("SCANNER_THRESHOLD must be an integer, got {v:?}"))?;
        }
        if let Some(v) = get("SCANNER_WEIGHTS") {
            cfg.weights = BuzzWeights::parse(&v)?;
        }
        if let Some(v) = get("SCAN_CONCURRENCY") {
            let n: usize = v
                .parse()
                .with_context(|| format!("SCAN_CONCURRENCY must be a positive integer, got {v:?}"))?;
            cfg.concurrency = n.max(1);
        }
        if let Some(v) = get("SCAN_INTERVAL_SECS") {
            let secs: u64 = v
                .parse()
                .with_context(|| format!("SCAN_INTERVAL_SECS must be seconds, got {v:?}"))?;
            if secs == 0 {
                bail!("SCAN_INTERVAL_SECS must be greater than zero");
            }
            cfg.interval = Some(Duration::from_secs(secs));
        }
        let timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(v) => {
                let secs: u64 = v
                    .parse()
                    .with_context(|| format!("HTTP_TIMEOUT_SECS must be seconds, got {v:?}"))?;
                if secs == 0 {
                    bail!("HTTP_TIMEOUT_SECS must be greater than zero");
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        cfg.oracle.api_key = get("GROQ_API_KEY");
        if let Some(v) = get("GROQ_MODEL") {
            cfg.oracle.model = v;
        }
        if let Some(v) = get("GROQ_BASE_URL") {
            cfg.oracle.base_url = v.trim_end_matches('/').to_string();
        }
        cfg.oracle.test_mode = get("ORACLE_TEST_MODE").is_some_and(|v| v == "mock");

        cfg.sources.timeout = timeout;
        cfg.sources.reddit.client_id = get("REDDIT_CLIENT_ID");
        cfg.sources.reddit.client_secret = get("REDDIT_CLIENT_SECRET");
        if let Some(v) = get("REDDIT_USER_AGENT") {
            cfg.sources.reddit.user_agent = v;
        }
        cfg.sources.web_search.api_key = get("SERPAPI_KEY");
        cfg.sources.social.api_key = get("TWITTER_API_KEY");
        cfg.sources.social.api_secret = get("TWITTER_API_SECRET");
        cfg.sources.social.access_token = get("TWITTER_ACCESS_TOKEN");
        cfg.sources.social.access_secret = get("TWITTER_ACCESS_SECRET");

        cfg.market.timeout = timeout;
        cfg.delivery.webhook_url = get("DISCORD_WEBHOOK");
        cfg.delivery.timeout = timeout;

        Ok(cfg)
    }
}
