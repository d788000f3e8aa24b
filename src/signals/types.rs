// src/signals/types.rs
use async_trait::async_trait;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    WebSearch,
    Reddit,
    Social,
}

impl SignalKind {
    pub fn label(self) -> &'static str {
        match self {
            SignalKind::WebSearch => "web",
            SignalKind::Reddit => "reddit",
            SignalKind::Social => "social",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One source's numeric signal for one keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalReading {
    pub kind: SignalKind,
    pub count: u64,
    pub evidence: Option<String>,
}

impl SignalReading {
    pub fn new(kind: SignalKind, count: u64) -> Self {
        Self {
            kind,
            count,
            evidence: None,
        }
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        let e = evidence.into();
        self.evidence = if e.trim().is_empty() { None } else { Some(e) };
        self
    }
}

/// What a fetcher hands back: a reading, or the reason it has none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalOutcome {
    Reading(SignalReading),
    Unavailable { kind: SignalKind, reason: String },
}

impl SignalOutcome {
    pub fn unavailable(kind: SignalKind, reason: impl Into<String>) -> Self {
        SignalOutcome::Unavailable {
            kind,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> SignalKind {
        match self {
            SignalOutcome::Reading(r) => r.kind,
            SignalOutcome::Unavailable { kind, .. } => *kind,
        }
    }

    /// Count contributed to buzz; unavailable sources contribute nothing.
    pub fn count(&self) -> u64 {
        match self {
            SignalOutcome::Reading(r) => r.count,
            SignalOutcome::Unavailable { .. } => 0,
        }
    }

    /// Text shown to the scoring oracle for this source.
    pub fn evidence_text(&self) -> String {
        match self {
            SignalOutcome::Reading(SignalReading {
                count,
                evidence: Some(e),
                ..
            }) => format!("{count} ({e})"),
            SignalOutcome::Reading(r) => r.count.to_string(),
            SignalOutcome::Unavailable { reason, .. } => format!("0 ({reason})"),
        }
    }
}

/// A best-effort signal fetcher. `fetch` must not fail: any error becomes
/// `SignalOutcome::Unavailable`.
#[async_trait]
pub trait SignalSource: Send + Sync {
    async fn fetch(&self, keyword: &str) -> SignalOutcome;
    fn kind(&self) -> SignalKind;
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_counts_as_zero() {
        let o = SignalOutcome::unavailable(SignalKind::Reddit, "not configured");
        assert_eq!(o.count(), 0);
        assert_eq!(o.kind(), SignalKind::Reddit);
        assert_eq!(o.evidence_text(), "0 (not configured)");
    }

    #[test]
    fn blank_evidence_is_dropped() {
        let r = SignalReading::new(SignalKind::Social, 4).with_evidence("  ");
        assert!(r.evidence.is_none());
        assert_eq!(SignalOutcome::Reading(r).evidence_text(), "4");
    }
}
