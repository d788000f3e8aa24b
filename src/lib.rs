// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod buzz;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod market;
pub mod report;
pub mod scheduler;
pub mod signals;

// Scoring stage (oracle adapter, verdict decoding, scorer)
pub mod analyze;

// Delivery sinks
pub mod notify;

// ---- Re-exports for stable public API ----
pub use crate::analyze::ai_adapter;
pub use crate::config::ScannerConfig;
pub use crate::engine::{KeywordScan, Scanner};
pub use crate::error::ScanError;
pub use crate::notify::{build_sink, deliver_report, DeliverySink};
pub use crate::report::Report;

use tracing::info;

/// One complete run: scan every configured keyword, build the digest, deliver it.
///
/// Never fails. Fetch, scoring, enrichment, and delivery problems are logged
/// and degrade in place; the returned report is what was (or would have been)
/// delivered.
pub async fn run_once(cfg: &ScannerConfig) -> Report {
    info!(
        "🚀 Camillo Agent Run — {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M")
    );
    let scanner = Scanner::from_config(cfg);
    let report = scanner.run(&cfg.keywords).await;

    let sink = build_sink(&cfg.delivery);
    if deliver_report(sink.as_ref(), &report).await {
        info!("✅ Report sent!");
    }
    report
}
