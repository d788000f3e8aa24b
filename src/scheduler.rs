// src/scheduler.rs
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::ScannerConfig;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("scanner_runs_total", "Scheduled scan runs completed.");
        describe_gauge!(
            "scanner_last_run_ts",
            "Unix timestamp (seconds) of the last scheduled run."
        );
    });
}

/// Call `job` immediately, then once per `period`, forever.
///
/// A run that overruns the period delays the next tick instead of bursting.
pub async fn run_every<F, Fut>(period: Duration, mut job: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        job().await;
    }
}

/// Spawn the periodic scan + deliver loop on the runtime.
pub fn spawn_scan_scheduler(cfg: ScannerConfig, period: Duration) -> JoinHandle<()> {
    ensure_metrics_described();
    let cfg = Arc::new(cfg);
    tokio::spawn(async move {
        run_every(period, || {
            let cfg = Arc::clone(&cfg);
            async move {
                let now = chrono::Utc::now().timestamp().max(0) as f64;
                let report = crate::run_once(&cfg).await;

                counter!("scanner_runs_total").increment(1);
                gauge!("scanner_last_run_ts").set(now);

                tracing::info!(
                    target: "scheduler",
                    signal = report.has_signal(),
                    next_in_secs = period.as_secs(),
                    "scheduled scan tick"
                );
            }
        })
        .await;
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn ticks_immediately_then_per_period() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let task = tokio::spawn(async move {
            run_every(Duration::from_secs(60), || {
                let h = h.clone();
                async move {
                    h.fetch_add(1, Ordering::SeqCst);
                }
            })
            .await;
        });

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn scan_scheduler_keeps_running_offline() {
        let mut cfg = ScannerConfig::default();
        cfg.keywords = vec!["matcha".to_string()];
        cfg.oracle.test_mode = true;

        let handle = spawn_scan_scheduler(cfg, Duration::from_secs(3600));
        tokio::time::sleep(Duration::from_secs(2 * 3600 + 1)).await;
        assert!(!handle.is_finished());
        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());
    }
}
