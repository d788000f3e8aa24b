// src/notify/mod.rs
pub mod discord;

use async_trait::async_trait;
use metrics::counter;
use std::io::Write;

use crate::config::DeliveryConfig;
use crate::error::{Result, ScanError};
use crate::report::Report;

pub use discord::DiscordNotifier;

/// Destination for the rendered digest.
#[async_trait]
pub trait DeliverySink: Send + Sync {
    async fn deliver(&self, text: &str) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Used when no webhook is configured; the report is printed, never dropped.
pub struct StdoutSink;

#[async_trait]
impl DeliverySink for StdoutSink {
    async fn deliver(&self, text: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{text}")
            .and_then(|_| out.flush())
            .map_err(|e| ScanError::Delivery(format!("stdout write failed: {e}")))
    }

    fn name(&self) -> &'static str {
        "stdout"
    }
}

pub fn build_sink(cfg: &DeliveryConfig) -> Box<dyn DeliverySink> {
    match &cfg.webhook_url {
        Some(url) => Box::new(DiscordNotifier::new(url.clone()).with_timeout(cfg.timeout)),
        None => {
            tracing::info!("no DISCORD_WEBHOOK configured; report goes to stdout");
            Box::new(StdoutSink)
        }
    }
}

/// Deliver once. Failure is logged and reported as `false`, never propagated.
pub async fn deliver_report(sink: &dyn DeliverySink, report: &Report) -> bool {
    let text = report.render();
    match sink.deliver(&text).await {
        Ok(()) => {
            tracing::info!(sink = sink.name(), bytes = text.len(), "report delivered");
            true
        }
        Err(e) => {
            counter!("scanner_delivery_errors_total").increment(1);
            tracing::error!(sink = sink.name(), error = %e, "report delivery failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_follows_webhook_presence() {
        let mut cfg = DeliveryConfig::default();
        assert_eq!(build_sink(&cfg).name(), "stdout");
        cfg.webhook_url = Some("http://127.0.0.1:9/hook".into());
        assert_eq!(build_sink(&cfg).name(), "discord");
    }
}
