//! Runs the configured signal fetchers for a few keywords and prints what each source returned.
//! Usage: `probe_sources [keyword ...]` (defaults to the configured keyword list).

use asymmetry_scanner::buzz::aggregate;
use asymmetry_scanner::signals::{collect_signals, default_sources, SignalOutcome};
use asymmetry_scanner::ScannerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cfg = ScannerConfig::from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    let keywords = if args.is_empty() { cfg.keywords.clone() } else { args };

    let sources = default_sources(&cfg.sources);
    for kw in &keywords {
        let outcomes = collect_signals(&sources, kw).await;
        let buzz = aggregate(&outcomes, &cfg.weights);
        println!("{kw}: buzz {buzz}");
        for o in &outcomes {
            match o {
                SignalOutcome::Reading(r) => println!(
                    "  {:<6} {:>4}  {}",
                    r.kind.label(),
                    r.count,
                    r.evidence.as_deref().unwrap_or("-")
                ),
                SignalOutcome::Unavailable { kind, reason } => {
                    println!("  {:<6}  n/a  {reason}", kind.label())
                }
            }
        }
    }

    println!("probe done");
    Ok(())
}
