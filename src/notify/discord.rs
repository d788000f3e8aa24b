use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::DeliverySink;
use crate::error::{Result, ScanError};

/// Posts the digest as a single Discord webhook message. One attempt, no retry.
#[derive(Clone)]
pub struct DiscordNotifier {
    webhook: String,
    client: Client,
    timeout: Duration,
}

impl DiscordNotifier {
    pub fn new(webhook: String) -> Self {
        Self {
            webhook,
            client: Client::new(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Serialize)]
struct DiscordWebhookPayload<'a> {
    content: &'a str,
}

#[async_trait]
impl DeliverySink for DiscordNotifier {
    async fn deliver(&self, text: &str) -> Result<()> {
        let payload = DiscordWebhookPayload { content: text };
        let rsp = self
            .client
            .post(&self.webhook)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ScanError::Delivery(format!("Discord webhook request failed: {e}")))?;

        if let Err(e) = rsp.error_for_status_ref() {
            return Err(ScanError::Delivery(format!(
                "Discord webhook HTTP error: {e}"
            )));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "discord"
    }
}
