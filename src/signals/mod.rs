// src/signals/mod.rs
pub mod providers;
pub mod types;

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;

use crate::config::SourcesConfig;
use crate::signals::providers::{
    reddit::RedditSource, social::SocialSource, web_search::WebSearchSource,
};
pub use crate::signals::types::{SignalKind, SignalOutcome, SignalReading, SignalSource};

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "scanner_signal_readings_total",
            "Signal fetches that produced a reading."
        );
        describe_counter!(
            "scanner_signal_unavailable_total",
            "Signal fetches that degraded to unavailable."
        );
    });
}

/// Build the standard source set: web search, Reddit, social (in that order).
pub fn default_sources(cfg: &SourcesConfig) -> Vec<Box<dyn SignalSource>> {
    vec![
        Box::new(WebSearchSource::new(&cfg.web_search, cfg.timeout)),
        Box::new(RedditSource::new(&cfg.reddit, cfg.timeout)),
        Box::new(SocialSource::new(&cfg.social, cfg.timeout)),
    ]
}

/// Run every source for `keyword`, one after another, in registration order.
pub async fn collect_signals(
    sources: &[Box<dyn SignalSource>],
    keyword: &str,
) -> Vec<SignalOutcome> {
    ensure_metrics_described();

    let mut out = Vec::with_capacity(sources.len());
    for s in sources {
        let outcome = s.fetch(keyword).await;
        match &outcome {
            SignalOutcome::Reading(r) => {
                counter!("scanner_signal_readings_total", "source" => s.name()).increment(1);
                tracing::debug!(keyword, source = s.name(), count = r.count, "signal reading");
            }
            SignalOutcome::Unavailable { reason, .. } => {
                counter!("scanner_signal_unavailable_total", "source" => s.name()).increment(1);
                tracing::debug!(keyword, source = s.name(), reason = %reason, "signal unavailable");
            }
        }
        out.push(outcome);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Fixed(SignalKind, u64);

    #[async_trait]
    impl SignalSource for Fixed {
        async fn fetch(&self, _keyword: &str) -> SignalOutcome {
            SignalOutcome::Reading(SignalReading::new(self.0, self.1))
        }
        fn kind(&self) -> SignalKind {
            self.0
        }
        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn outcomes_follow_registration_order() {
        let sources: Vec<Box<dyn SignalSource>> = vec![
            Box::new(Fixed(SignalKind::Social, 1)),
            Box::new(Fixed(SignalKind::WebSearch, 2)),
        ];
        let out = collect_signals(&sources, "kw").await;
        let kinds: Vec<_> = out.iter().map(|o| o.kind()).collect();
        assert_eq!(kinds, vec![SignalKind::Social, SignalKind::WebSearch]);
    }

    #[tokio::test]
    async fn unconfigured_defaults_never_touch_the_network() {
        let sources = default_sources(&SourcesConfig::default());
        let out = collect_signals(&sources, "pickleball ontario").await;
        assert_eq!(out.len(), 3);
        assert!(out
            .iter()
            .all(|o| matches!(o, SignalOutcome::Unavailable { .. })));
        assert_eq!(out.iter().map(|o| o.count()).sum::<u64>(), 0);
    }
}
