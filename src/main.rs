//! Trend asymmetry scanner binary.
//! Loads configuration once, runs the scan, delivers the digest, exits 0.
//! With `SCAN_INTERVAL_SECS` set, keeps re-running on that period until Ctrl-C.

use anyhow::Result;
use asymmetry_scanner::{run_once, scheduler, ScannerConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs by default; `LOG_FORMAT=json` switches to JSON lines.
/// Logs go to stderr so stdout carries only the report.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when the file is absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    // A broken keyword file or malformed tuning value is a configuration
    // defect and aborts before any scanning.
    let cfg = ScannerConfig::from_env()?;

    match cfg.interval {
        None => {
            run_once(&cfg).await;
        }
        Some(period) => {
            let handle = scheduler::spawn_scan_scheduler(cfg, period);
            tokio::signal::ctrl_c().await?;
            tracing::info!("shutdown requested");
            handle.abort();
        }
    }
    Ok(())
}
