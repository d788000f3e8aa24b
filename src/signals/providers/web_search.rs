use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::WebSearchConfig;
use crate::error::{Result, ScanError};
use crate::http;
use crate::signals::types::{SignalKind, SignalOutcome, SignalReading, SignalSource};

/// Terms appended to every keyword to bias results toward consumer buzz.
const TREND_TERMS: &str = "viral trend tiktok reddit";

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<Organic>,
    #[serde(default)]
    related_searches: Vec<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Organic {
    #[serde(default)]
    title: String,
}

/// SerpAPI Google search. Score = organic hits + 2 x related queries.
pub struct WebSearchSource {
    api_key: Option<String>,
    country: String,
    language: String,
    endpoint: String,
    client: reqwest::Client,
}

impl WebSearchSource {
    pub fn new(cfg: &WebSearchConfig, timeout: Duration) -> Self {
        Self {
            api_key: cfg.api_key.clone(),
            country: cfg.country.clone(),
            language: cfg.language.clone(),
            endpoint: cfg.endpoint.clone(),
            client: http::client(http::USER_AGENT, timeout),
        }
    }

    async fn fetch_inner(&self, keyword: &str) -> Result<SignalReading> {
        let Some(key) = &self.api_key else {
            return Err(ScanError::unavailable(self.name(), "key not set"));
        };
        let query = search_query(keyword);
        let resp: SearchResponse = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("engine", "google"),
                ("q", query.as_str()),
                ("gl", self.country.as_str()),
                ("hl", self.language.as_str()),
                ("api_key", key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = resp.error.as_deref().filter(|e| !e.is_empty()) {
            return Err(ScanError::unavailable(self.name(), err.to_string()));
        }
        Ok(reading_from_response(&resp))
    }
}

fn search_query(keyword: &str) -> String {
    format!("{} {TREND_TERMS}", keyword.trim())
}

fn reading_from_response(resp: &SearchResponse) -> SignalReading {
    let organic = resp.organic_results.len() as u64;
    let related = resp.related_searches.len() as u64;
    let score = organic + 2 * related;
    let titles: Vec<&str> = resp
        .organic_results
        .iter()
        .map(|o| o.title.trim())
        .filter(|t| !t.is_empty())
        .take(3)
        .collect();
    SignalReading::new(SignalKind::WebSearch, score).with_evidence(titles.join(" | "))
}

#[async_trait]
impl SignalSource for WebSearchSource {
    async fn fetch(&self, keyword: &str) -> SignalOutcome {
        match self.fetch_inner(keyword).await {
            Ok(r) => SignalOutcome::Reading(r),
            Err(e) => {
                if !matches!(e, ScanError::SourceUnavailable { .. }) {
                    tracing::warn!(error = %e, keyword, source = self.name(), "web search failed");
                }
                SignalOutcome::unavailable(self.kind(), e.short_reason())
            }
        }
    }

    fn kind(&self) -> SignalKind {
        SignalKind::WebSearch
    }

    fn name(&self) -> &'static str {
        "SerpAPI"
    }
}
