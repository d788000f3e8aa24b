//! Trend scorer: prompt the oracle with buzz context, decode its verdict.

use metrics::counter;

use crate::analyze::ai_adapter::DynOracle;
use crate::analyze::verdict::{decode_verdict, TrendVerdict, NO_TICKER_SENTINEL};
use crate::buzz::BuzzBreakdown;
use crate::signals::{SignalKind, SignalOutcome};

pub struct TrendScorer {
    oracle: DynOracle,
}

impl TrendScorer {
    pub fn new(oracle: DynOracle) -> Self {
        Self { oracle }
    }

    pub fn provider_name(&self) -> &'static str {
        self.oracle.provider_name()
    }

    /// One oracle call, no retry. Any failure yields the zero-score fallback.
    pub async fn score(
        &self,
        keyword: &str,
        buzz: &BuzzBreakdown,
        outcomes: &[SignalOutcome],
    ) -> TrendVerdict {
        let prompt = build_prompt(keyword, buzz, outcomes);
        let decoded = match self.oracle.complete(&prompt).await {
            Ok(raw) => decode_verdict(&raw),
            Err(e) => Err(e),
        };
        match decoded {
            Ok(v) => v,
            Err(e) => {
                counter!("scanner_oracle_fallback_total").increment(1);
                tracing::warn!(
                    keyword,
                    provider = self.oracle.provider_name(),
                    error = %e,
                    "oracle verdict unavailable; using fallback"
                );
                TrendVerdict::fallback(&e.short_reason())
            }
        }
    }
}

fn evidence_for(outcomes: &[SignalOutcome], kind: SignalKind) -> String {
    let texts: Vec<String> = outcomes
        .iter()
        .filter(|o| o.kind() == kind)
        .map(SignalOutcome::evidence_text)
        .collect();
    if texts.is_empty() {
        "0 (not collected)".to_string()
    } else {
        texts.join("; ")
    }
}

/// Render the oracle request. The buzz total appears verbatim.
pub fn build_prompt(keyword: &str, buzz: &BuzzBreakdown, outcomes: &[SignalOutcome]) -> String {
    format!(
        r#"Keyword: {keyword}
Aggregated buzz score (web x{w_web} + reddit x{w_reddit} + social x{w_social}): {total}
Web search buzz: {web}
Reddit mentions this week: {reddit}
Social mentions (recent): {social}

Rate asymmetry 0-10 (10 = massive under-the-radar edge).
Write a 2-sentence thesis and list 1-3 potential public tickers, or ["{none}"] if none apply.
Output ONLY valid JSON:
{{"asymmetry_score": int, "thesis": "string", "tickers": ["TICKER1", "TICKER2"], "conviction": "high/medium/low", "sources_summary": "string"}}"#,
        total = buzz.total,
        w_web = buzz.weights.web_search,
        w_reddit = buzz.weights.reddit,
        w_social = buzz.weights.social,
        web = evidence_for(outcomes, SignalKind::WebSearch),
        reddit = evidence_for(outcomes, SignalKind::Reddit),
        social = evidence_for(outcomes, SignalKind::Social),
        none = NO_TICKER_SENTINEL,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::ai_adapter::{DisabledOracle, MockOracle};
    use crate::buzz::{aggregate, BuzzWeights};
    use crate::signals::SignalReading;
    use std::sync::Arc;

    fn outcomes() -> Vec<SignalOutcome> {
        vec![
            SignalOutcome::Reading(
                SignalReading::new(SignalKind::WebSearch, 3).with_evidence("A | B"),
            ),
            SignalOutcome::Reading(SignalReading::new(SignalKind::Reddit, 5)),
            SignalOutcome::unavailable(SignalKind::Social, "not configured"),
        ]
    }

    #[test]
    fn prompt_carries_buzz_and_evidence() {
        let o = outcomes();
        let b = aggregate(&o, &BuzzWeights::default());
        let p = build_prompt("pickleball ontario", &b, &o);
        assert!(p.contains("Keyword: pickleball ontario"));
        assert!(p.contains(": 18\n"));
        assert!(p.contains("Web search buzz: 3 (A | B)"));
        assert!(p.contains("Reddit mentions this week: 5"));
        assert!(p.contains("Social mentions (recent): 0 (not configured)"));
        assert!(p.contains(r#"["none"]"#));
        assert!(p.contains("(web x1 + reddit x3 + social x2): 18\n"));
    }

    #[test]
    fn prompt_states_configured_weights() {
        let o = outcomes();
        let b = aggregate(&o, &BuzzWeights::parse("2,4,1").unwrap());
        let p = build_prompt("pickleball ontario", &b, &o);
        assert!(p.contains("Aggregated buzz score (web x2 + reddit x4 + social x1): 26\n"));
        assert!(!p.contains("reddit x3"));
    }

    #[tokio::test]
    async fn garbage_response_falls_back() {
        let s = TrendScorer::new(Arc::new(MockOracle::new("I think this is a 9/10!")));
        let v = s.score("kw", &BuzzBreakdown::default(), &[]).await;
        assert_eq!(v.asymmetry_score, 0);
        assert!(v.thesis.starts_with("Error: oracle parse failure"));
        assert!(v.thesis.chars().count() <= 80);
    }

    #[tokio::test]
    async fn disabled_oracle_falls_back() {
        let s = TrendScorer::new(Arc::new(DisabledOracle));
        let v = s.score("kw", &BuzzBreakdown::default(), &[]).await;
        assert_eq!(v, TrendVerdict::fallback("oracle call failed: oracle credential not set"));
    }

    #[tokio::test]
    async fn fenced_response_is_decoded() {
        let s = TrendScorer::new(Arc::new(MockOracle::new(
            "```json\n{\"asymmetry_score\":9,\"thesis\":\"t\",\"tickers\":[\"XYZ\"],\"conviction\":\"high\",\"sources_summary\":\"s\"}\n```",
        )));
        let v = s.score("kw", &BuzzBreakdown::default(), &[]).await;
        assert_eq!(v.asymmetry_score, 9);
        assert_eq!(v.tickers, vec!["XYZ".to_string()]);
    }
}
