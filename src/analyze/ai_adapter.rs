//! Scoring oracle adapter: provider abstraction over an OpenAI-compatible chat API.
//!
//! The oracle is opaque to the rest of the crate: it takes a prompt and hands
//! back raw text. Decoding that text into a verdict lives in `verdict.rs`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::OracleConfig;
use crate::error::{Result, ScanError};
use crate::http;

// ------------------------------------------------------------
// Public surface
// ------------------------------------------------------------

pub type OracleFuture<'a> = Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

/// Trait object used by the scorer (and by tests with canned responses).
pub trait ScoringOracle: Send + Sync {
    /// Send one prompt, return the raw completion text.
    fn complete<'a>(&'a self, prompt: &'a str) -> OracleFuture<'a>;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
}

pub type DynOracle = Arc<dyn ScoringOracle>;

/// System prompt shared by all real providers.
pub const SYSTEM_PROMPT: &str = "You are Chris Camillo 2.0, an expert at spotting asymmetric consumer trends before Wall Street. Reply with ONLY one valid JSON object, no prose, no markdown.";

/// Factory: build an oracle according to config.
///
/// * `test_mode` returns a deterministic mock.
/// * No credential returns a disabled oracle (every call fails).
/// * Otherwise the Groq chat-completions provider.
pub fn build_oracle(cfg: &OracleConfig) -> DynOracle {
    if cfg.test_mode {
        return Arc::new(MockOracle::neutral());
    }
    match cfg.api_key.as_deref() {
        Some(key) => Arc::new(GroqProvider::new(cfg, key)),
        None => Arc::new(DisabledOracle),
    }
}

// ------------------------------------------------------------
// Concrete providers
// ------------------------------------------------------------

/// Groq (OpenAI-compatible Chat Completions API).
pub struct GroqProvider {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
    temperature: f32,
}

impl GroqProvider {
    pub fn new(cfg: &OracleConfig, api_key: &str) -> Self {
        Self {
            http: http::client(http::USER_AGENT, cfg.timeout),
            api_key: api_key.to_string(),
            endpoint: format!("{}/chat/completions", cfg.base_url.trim_end_matches('/')),
            model: cfg.model.clone(),
            temperature: cfg.temperature,
        }
    }

    async fn complete_impl(&self, prompt: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
            max_tokens: u32,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            #[serde(default)]
            content: String,
        }

        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Msg {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: 400,
        };

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScanError::OracleCall(format!("HTTP {status}")));
        }
        let body: Resp = resp.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();
        if content.trim().is_empty() {
            return Err(ScanError::OracleCall("empty completion".into()));
        }
        Ok(content)
    }
}

impl ScoringOracle for GroqProvider {
    fn complete<'a>(&'a self, prompt: &'a str) -> OracleFuture<'a> {
        Box::pin(self.complete_impl(prompt))
    }
    fn provider_name(&self) -> &'static str {
        "groq"
    }
}

/// Always fails; used when no oracle credential is configured.
pub struct DisabledOracle;

impl ScoringOracle for DisabledOracle {
    fn complete<'a>(&'a self, _prompt: &'a str) -> OracleFuture<'a> {
        Box::pin(async {
            Err(ScanError::OracleCall(
                "oracle credential not set".to_string(),
            ))
        })
    }
    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

/// Fixed-response oracle for tests/local runs.
#[derive(Clone)]
pub struct MockOracle {
    pub fixed: String,
}

impl MockOracle {
    pub fn new(fixed: impl Into<String>) -> Self {
        Self {
            fixed: fixed.into(),
        }
    }

    /// A below-threshold verdict with no tickers.
    pub fn neutral() -> Self {
        Self::new(
            r#"{"asymmetry_score": 3, "thesis": "Neutral hint (mock).", "tickers": ["none"], "conviction": "low", "sources_summary": "mock"}"#,
        )
    }
}

impl ScoringOracle for MockOracle {
    fn complete<'a>(&'a self, _prompt: &'a str) -> OracleFuture<'a> {
        let out = self.fixed.clone();
        Box::pin(async move { Ok(out) })
    }
    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_picks_provider_by_config() {
        let mut cfg = OracleConfig::default();
        assert_eq!(build_oracle(&cfg).provider_name(), "disabled");

        cfg.api_key = Some("gsk_test".into());
        assert_eq!(build_oracle(&cfg).provider_name(), "groq");

        cfg.test_mode = true;
        assert_eq!(build_oracle(&cfg).provider_name(), "mock");
    }

    #[tokio::test]
    async fn disabled_oracle_fails_every_call() {
        let err = DisabledOracle.complete("anything").await.unwrap_err();
        assert!(err.to_string().contains("credential not set"));
    }

    #[tokio::test]
    async fn mock_returns_fixed_text() {
        let m = MockOracle::new("{}");
        assert_eq!(m.complete("x").await.unwrap(), "{}");
    }

    #[test]
    fn endpoint_joins_base_url() {
        let cfg = OracleConfig {
            base_url: "http://127.0.0.1:9/v1/".into(),
            ..Default::default()
        };
        let p = GroqProvider::new(&cfg, "k");
        assert_eq!(p.endpoint, "http://127.0.0.1:9/v1/chat/completions");
    }
}
