//! # Scan pipeline
//! Per keyword: fetch signals → aggregate buzz → score → (if qualifying) enrich tickers.
//! After all keywords, the report is built in keyword order.
//!
//! Keywords are independent. With `concurrency > 1` several keywords are in
//! flight at once, but results are collected in input order before the
//! report is assembled, so the digest is identical to a sequential run.

use std::time::Instant;

use futures::stream::{self, StreamExt};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;

use crate::analyze::{build_oracle, TrendScorer, TrendVerdict};
use crate::buzz::{aggregate, BuzzBreakdown, BuzzWeights};
use crate::config::ScannerConfig;
use crate::market::{MarketDataSource, MarketEnricher, MarketLine, YahooChartProvider};
use crate::report::{Report, ReportBuilder};
use crate::signals::{collect_signals, default_sources, SignalOutcome, SignalSource};

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("scanner_keywords_total", "Keywords scanned.");
        describe_counter!(
            "scanner_qualifying_total",
            "Keywords whose verdict met the threshold."
        );
        describe_counter!(
            "scanner_oracle_fallback_total",
            "Verdicts replaced by the zero-score fallback."
        );
        describe_counter!(
            "scanner_enrichment_errors_total",
            "Ticker lookups that failed."
        );
        describe_counter!(
            "scanner_delivery_errors_total",
            "Report deliveries that failed."
        );
        describe_histogram!("scanner_keyword_ms", "Per-keyword pipeline time in milliseconds.");
    });
}

/// Everything the pipeline learned about one keyword.
#[derive(Debug, Clone)]
pub struct KeywordScan {
    pub keyword: String,
    pub outcomes: Vec<SignalOutcome>,
    pub buzz: BuzzBreakdown,
    pub verdict: TrendVerdict,
    /// Ticker lines; only looked up for qualifying verdicts.
    pub plays: Vec<MarketLine>,
}

pub struct Scanner {
    sources: Vec<Box<dyn SignalSource>>,
    weights: BuzzWeights,
    scorer: TrendScorer,
    enricher: MarketEnricher,
    threshold: i64,
    header: String,
    concurrency: usize,
}

impl Scanner {
    /// Assemble the pipeline from explicit parts (tests inject mocks here).
    pub fn new(
        sources: Vec<Box<dyn SignalSource>>,
        scorer: TrendScorer,
        market: Box<dyn MarketDataSource>,
    ) -> Self {
        Self {
            sources,
            weights: BuzzWeights::default(),
            scorer,
            enricher: MarketEnricher::new(market),
            threshold: crate::config::DEFAULT_THRESHOLD,
            header: crate::config::DEFAULT_REPORT_HEADER.to_string(),
            concurrency: 1,
        }
    }

    /// Production wiring from configuration.
    pub fn from_config(cfg: &ScannerConfig) -> Self {
        Self::new(
            default_sources(&cfg.sources),
            TrendScorer::new(build_oracle(&cfg.oracle)),
            Box::new(YahooChartProvider::new(&cfg.market)),
        )
        .with_weights(cfg.weights)
        .with_threshold(cfg.threshold)
        .with_header(cfg.report_header.clone())
        .with_concurrency(cfg.concurrency)
    }

    pub fn with_weights(mut self, weights: BuzzWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_threshold(mut self, threshold: i64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    /// Run the full pipeline for one keyword.
    pub async fn scan_keyword(&self, keyword: &str) -> KeywordScan {
        ensure_metrics_described();
        let t0 = Instant::now();

        let outcomes = collect_signals(&self.sources, keyword).await;
        let buzz = aggregate(&outcomes, &self.weights);
        let verdict = self.scorer.score(keyword, &buzz, &outcomes).await;

        let plays = if verdict.qualifies(self.threshold) {
            counter!("scanner_qualifying_total").increment(1);
            self.enricher.enrich(&verdict.tickers).await
        } else {
            Vec::new()
        };

        counter!("scanner_keywords_total").increment(1);
        histogram!("scanner_keyword_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        tracing::info!(
            keyword,
            buzz = buzz.total,
            score = verdict.asymmetry_score,
            conviction = %verdict.conviction,
            plays = plays.len(),
            "keyword scanned"
        );

        KeywordScan {
            keyword: keyword.to_string(),
            outcomes,
            buzz,
            verdict,
            plays,
        }
    }

    /// Scan every keyword; results come back in input order.
    pub async fn scan_all(&self, keywords: &[String]) -> Vec<KeywordScan> {
        if self.concurrency <= 1 {
            let mut out = Vec::with_capacity(keywords.len());
            for kw in keywords {
                out.push(self.scan_keyword(kw).await);
            }
            return out;
        }
        stream::iter(keywords.iter().cloned())
            .map(|kw| async move { self.scan_keyword(&kw).await })
            .buffered(self.concurrency)
            .collect()
            .await
    }

    pub fn build_report(&self, scans: &[KeywordScan]) -> Report {
        let mut builder = ReportBuilder::new(self.header.clone(), self.threshold);
        for scan in scans {
            builder.push(scan);
        }
        builder.finish()
    }

    /// Scan + report. Never fails; every stage degrades in place.
    pub async fn run(&self, keywords: &[String]) -> Report {
        tracing::info!(
            keywords = keywords.len(),
            oracle = self.scorer.provider_name(),
            threshold = self.threshold,
            concurrency = self.concurrency,
            "scan started"
        );
        let scans = self.scan_all(keywords).await;
        let report = self.build_report(&scans);
        tracing::info!(signal = report.has_signal(), "scan finished");
        report
    }
}
