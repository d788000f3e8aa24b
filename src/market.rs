//! Market enrichment: one price / market-cap line per ticker a verdict names.

use async_trait::async_trait;
use metrics::counter;
use serde::Deserialize;
use std::fmt;

use crate::analyze::verdict::is_real_ticker;
use crate::config::MarketConfig;
use crate::error::{Result, ScanError};
use crate::http;

#[derive(Debug, Clone, PartialEq)]
pub struct TickerSnapshot {
    pub symbol: String,
    pub price: Option<f64>,
    pub market_cap: Option<u64>,
}

/// One "Plays" line of the report.
#[derive(Debug, Clone, PartialEq)]
pub enum MarketLine {
    Snapshot(TickerSnapshot),
    Unavailable(String),
}

impl fmt::Display for MarketLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketLine::Snapshot(s) => {
                let price = s
                    .price
                    .map(|p| format!("${p:.2}"))
                    .unwrap_or_else(|| "unavailable".to_string());
                let cap = s
                    .market_cap
                    .map(|c| format!("${}", group_thousands(c)))
                    .unwrap_or_else(|| "unavailable".to_string());
                write!(f, "{} | Price {price} | MktCap {cap}", s.symbol)
            }
            MarketLine::Unavailable(symbol) => write!(f, "{symbol} — data unavailable"),
        }
    }
}

/// `1234567` -> `"1,234,567"`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn snapshot(&self, symbol: &str) -> Result<TickerSnapshot>;
    fn name(&self) -> &'static str;
}

pub struct MarketEnricher {
    source: Box<dyn MarketDataSource>,
}

impl MarketEnricher {
    pub fn new(source: Box<dyn MarketDataSource>) -> Self {
        Self { source }
    }

    /// One line per real ticker, input order. The "none" sentinel and blanks
    /// are skipped without a lookup; a failed lookup becomes a placeholder line.
    pub async fn enrich(&self, tickers: &[String]) -> Vec<MarketLine> {
        let mut out = Vec::new();
        for raw in tickers.iter().filter(|t| is_real_ticker(t)) {
            let symbol = raw.trim().to_ascii_uppercase();
            match self.source.snapshot(&symbol).await {
                Ok(snap) => out.push(MarketLine::Snapshot(snap)),
                Err(e) => {
                    counter!("scanner_enrichment_errors_total").increment(1);
                    tracing::warn!(ticker = %symbol, source = self.source.name(), error = %e, "ticker lookup failed");
                    out.push(MarketLine::Unavailable(symbol));
                }
            }
        }
        out
    }
}

// ------------------------------------------------------------
// Yahoo Finance chart endpoint
// ------------------------------------------------------------

/// Browser UA; the chart endpoint refuses obvious bot agents.
const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    symbol: Option<String>,
    regular_market_price: Option<f64>,
    /// Rarely present on chart metadata; rendered "unavailable" when absent.
    market_cap: Option<u64>,
}

/// `GET {chart_url}/{SYMBOL}?range=1d&interval=1d`, reading the latest price from `meta`.
pub struct YahooChartProvider {
    base: String,
    client: reqwest::Client,
}

impl YahooChartProvider {
    pub fn new(cfg: &MarketConfig) -> Self {
        Self {
            base: cfg.chart_url.trim_end_matches('/').to_string(),
            client: http::client(BROWSER_UA, cfg.timeout),
        }
    }
}

fn snapshot_from_body(symbol: &str, body: &str) -> Result<TickerSnapshot> {
    let resp: ChartResponse = serde_json::from_str(body)?;
    let enrichment = |reason: String| ScanError::Enrichment {
        ticker: symbol.to_string(),
        reason,
    };
    if let Some(err) = resp.chart.error {
        return Err(enrichment(format!("{}: {}", err.code, err.description)));
    }
    let meta = resp
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .map(|d| d.meta)
        .ok_or_else(|| enrichment("empty chart result".into()))?;
    Ok(TickerSnapshot {
        symbol: meta.symbol.unwrap_or_else(|| symbol.to_string()),
        price: meta.regular_market_price,
        market_cap: meta.market_cap,
    })
}

#[async_trait]
impl MarketDataSource for YahooChartProvider {
    async fn snapshot(&self, symbol: &str) -> Result<TickerSnapshot> {
        let resp = self
            .client
            .get(format!("{}/{symbol}", self.base))
            .query(&[("range", "1d"), ("interval", "1d")])
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        match snapshot_from_body(symbol, &body) {
            Ok(snap) if status.is_success() => Ok(snap),
            // Unknown symbols come back as 404 with a chart error body.
            Err(e @ ScanError::Enrichment { .. }) => Err(e),
            _ => Err(ScanError::Enrichment {
                ticker: symbol.to_string(),
                reason: format!("HTTP {status}"),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "yahoo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Recording {
        calls: Arc<Mutex<Vec<String>>>,
        fail: &'static str,
    }

    #[async_trait]
    impl MarketDataSource for Recording {
        async fn snapshot(&self, symbol: &str) -> Result<TickerSnapshot> {
            self.calls.lock().unwrap().push(symbol.to_string());
            if symbol == self.fail {
                return Err(ScanError::Enrichment {
                    ticker: symbol.into(),
                    reason: "boom".into(),
                });
            }
            Ok(TickerSnapshot {
                symbol: symbol.to_string(),
                price: Some(12.5),
                market_cap: Some(1_234_567),
            })
        }
        fn name(&self) -> &'static str {
            "recording"
        }
    }

    fn enricher(fail: &'static str) -> (MarketEnricher, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let e = MarketEnricher::new(Box::new(Recording {
            calls: calls.clone(),
            fail,
        }));
        (e, calls)
    }

    #[tokio::test]
    async fn sentinel_never_fetched() {
        let (e, calls) = enricher("");
        let lines = e.enrich(&["NONE".to_string(), "XYZ".to_string()]).await;
        assert_eq!(lines.len(), 1);
        assert_eq!(*calls.lock().unwrap(), vec!["XYZ".to_string()]);
        assert_eq!(lines[0].to_string(), "XYZ | Price $12.50 | MktCap $1,234,567");
    }

    #[tokio::test]
    async fn failure_keeps_the_line() {
        let (e, _) = enricher("BAD");
        let lines = e.enrich(&["bad".to_string(), " ".to_string(), "ok".to_string()]).await;
        let rendered: Vec<String> = lines.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "BAD — data unavailable".to_string(),
                "OK | Price $12.50 | MktCap $1,234,567".to_string(),
            ]
        );
    }

    #[test]
    fn missing_fields_render_unavailable() {
        let line = MarketLine::Snapshot(TickerSnapshot {
            symbol: "XYZ".into(),
            price: None,
            market_cap: None,
        });
        assert_eq!(
            line.to_string(),
            "XYZ | Price unavailable | MktCap unavailable"
        );
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(3_000_000_000_000), "3,000,000,000,000");
    }

    #[test]
    fn chart_body_parses() {
        let body = r#"{"chart":{"result":[{"meta":{"symbol":"CELH","regularMarketPrice":41.2,"currency":"USD"},"timestamp":[1760000000]}],"error":null}}"#;
        let s = snapshot_from_body("CELH", body).unwrap();
        assert_eq!(s.symbol, "CELH");
        assert_eq!(s.price, Some(41.2));
        assert_eq!(s.market_cap, None);

        let missing = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = snapshot_from_body("NOPE", missing).unwrap_err();
        assert!(matches!(err, ScanError::Enrichment { .. }));
        assert!(err.to_string().contains("Not Found"));

        let empty = r#"{"chart":{"result":[],"error":null}}"#;
        assert!(matches!(
            snapshot_from_body("NOPE", empty),
            Err(ScanError::Enrichment { .. })
        ));
    }
}
