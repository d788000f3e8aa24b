use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::SocialConfig;
use crate::error::{Result, ScanError};
use crate::http;
use crate::signals::types::{SignalKind, SignalOutcome, SignalReading, SignalSource};

const PAGE_SIZE: &str = "10";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Default, Deserialize)]
struct RecentSearch {
    #[serde(default)]
    meta: Meta,
}

#[derive(Debug, Default, Deserialize)]
struct Meta {
    #[serde(default)]
    result_count: u64,
}

/// X (Twitter) v2 recent search: English, non-retweet posts mentioning the keyword.
pub struct SocialSource {
    cfg: SocialConfig,
    client: reqwest::Client,
}

impl SocialSource {
    pub fn new(cfg: &SocialConfig, timeout: Duration) -> Self {
        Self {
            cfg: cfg.clone(),
            client: http::client(http::USER_AGENT, timeout),
        }
    }

    async fn bearer_token(&self) -> Result<String> {
        let (Some(key), Some(secret)) = (&self.cfg.api_key, &self.cfg.api_secret) else {
            return Err(ScanError::unavailable(self.name(), "not configured"));
        };
        let resp: TokenResponse = self
            .client
            .post(&self.cfg.token_url)
            .basic_auth(key, Some(secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp.access_token)
    }

    async fn fetch_inner(&self, keyword: &str) -> Result<SignalReading> {
        if !self.cfg.is_configured() {
            return Err(ScanError::unavailable(self.name(), "not configured"));
        }
        let token = self.bearer_token().await?;
        let query = search_query(keyword);
        let resp: RecentSearch = self
            .client
            .get(&self.cfg.search_url)
            .bearer_auth(token)
            .query(&[("query", query.as_str()), ("max_results", PAGE_SIZE)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let count = resp.meta.result_count;
        Ok(SignalReading::new(SignalKind::Social, count)
            .with_evidence(format!("{count} recent posts")))
    }
}

fn search_query(keyword: &str) -> String {
    format!("{} -is:retweet lang:en", keyword.trim())
}

#[async_trait]
impl SignalSource for SocialSource {
    async fn fetch(&self, keyword: &str) -> SignalOutcome {
        match self.fetch_inner(keyword).await {
            Ok(r) => SignalOutcome::Reading(r),
            Err(e) => {
                if !matches!(e, ScanError::SourceUnavailable { .. }) {
                    tracing::warn!(error = %e, keyword, source = self.name(), "social fetch failed");
                }
                SignalOutcome::unavailable(self.kind(), e.short_reason())
            }
        }
    }

    fn kind(&self) -> SignalKind {
        SignalKind::Social
    }

    fn name(&self) -> &'static str {
        "X"
    }
}
