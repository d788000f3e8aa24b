use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::RedditConfig;
use crate::error::{Result, ScanError};
use crate::http;
use crate::signals::types::{SignalKind, SignalOutcome, SignalReading, SignalSource};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    #[serde(default)]
    title: String,
}

/// Counts posts across r/all matching the keyword in the trailing week, newest first.
pub struct RedditSource {
    credentials: Option<(String, String)>,
    post_limit: u32,
    token_url: String,
    search_url: String,
    client: reqwest::Client,
}

impl RedditSource {
    pub fn new(cfg: &RedditConfig, timeout: Duration) -> Self {
        Self {
            credentials: cfg
                .credentials()
                .map(|(id, secret)| (id.to_string(), secret.to_string())),
            post_limit: cfg.post_limit,
            token_url: cfg.token_url.clone(),
            search_url: cfg.search_url.clone(),
            client: http::client(&cfg.user_agent, timeout),
        }
    }

    async fn access_token(&self, id: &str, secret: &str) -> Result<String> {
        let resp: TokenResponse = self
            .client
            .post(&self.token_url)
            .basic_auth(id, Some(secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp.access_token)
    }

    async fn fetch_inner(&self, keyword: &str) -> Result<SignalReading> {
        let Some((id, secret)) = &self.credentials else {
            return Err(ScanError::unavailable(self.name(), "not configured"));
        };
        let token = self.access_token(id, secret).await?;
        let limit = self.post_limit.to_string();
        let listing: Listing = self
            .client
            .get(&self.search_url)
            .bearer_auth(token)
            .query(&[
                ("q", keyword),
                ("sort", "new"),
                ("t", "week"),
                ("limit", limit.as_str()),
                ("raw_json", "1"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(reading_from_listing(listing, self.post_limit))
    }
}

fn reading_from_listing(listing: Listing, cap: u32) -> SignalReading {
    let posts = listing.data.children;
    let count = posts.len().min(cap as usize) as u64;
    let mut evidence = format!("{count} posts this week");
    if let Some(newest) = posts.first().map(|c| c.data.title.trim()).filter(|t| !t.is_empty()) {
        evidence.push_str(&format!(", newest: \"{newest}\""));
    }
    SignalReading::new(SignalKind::Reddit, count).with_evidence(evidence)
}

#[async_trait]
impl SignalSource for RedditSource {
    async fn fetch(&self, keyword: &str) -> SignalOutcome {
        match self.fetch_inner(keyword).await {
            Ok(r) => SignalOutcome::Reading(r),
            Err(e) => {
                if !matches!(e, ScanError::SourceUnavailable { .. }) {
                    tracing::warn!(error = %e, keyword, source = self.name(), "reddit fetch failed");
                }
                SignalOutcome::unavailable(self.kind(), e.short_reason())
            }
        }
    }

    fn kind(&self) -> SignalKind {
        SignalKind::Reddit
    }

    fn name(&self) -> &'static str {
        "Reddit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_credentials_short_circuit() {
        let src = RedditSource::new(&RedditConfig::default(), Duration::from_secs(1));
        let out = src.fetch("rucking trend canada").await;
        assert_eq!(
            out,
            SignalOutcome::unavailable(SignalKind::Reddit, "not configured")
        );
    }

    #[test]
    fn listing_counts_posts_and_quotes_newest_title() {
        let raw = r#"{"data":{"children":[
            {"data":{"title":"Rucking is everywhere now"}},
            {"data":{"title":"Old post"}}
        ]}}"#;
        let listing: Listing = serde_json::from_str(raw).unwrap();
        let r = reading_from_listing(listing, 20);
        assert_eq!(r.count, 2);
        assert_eq!(
            r.evidence.as_deref(),
            Some("2 posts this week, newest: \"Rucking is everywhere now\"")
        );
    }

    #[test]
    fn listing_is_capped() {
        let children: Vec<String> = (0..5)
            .map(|i| format!(r#"{{"data":{{"title":"p{i}"}}}}"#))
            .collect();
        let raw = format!(r#"{{"data":{{"children":[{}]}}}}"#, children.join(","));
        let listing: Listing = serde_json::from_str(&raw).unwrap();
        assert_eq!(reading_from_listing(listing, 3).count, 3);
    }
}
