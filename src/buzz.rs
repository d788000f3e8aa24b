//! Buzz aggregation: one weighted scalar per keyword.
//!
//! `total = web_search * w_search + reddit * w_reddit + social * w_social`
//!
//! Community sources weigh more than raw search hits. Weights are fixed for
//! the whole run; values are not validated and pass through unchanged
//! (arithmetic saturates rather than overflowing).

use anyhow::{anyhow, Result};
use std::fmt;

use crate::signals::{SignalKind, SignalOutcome};

/// Aggregated buzz for one keyword.
pub type BuzzScore = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuzzWeights {
    pub web_search: u64,
    pub reddit: u64,
    pub social: u64,
}

impl Default for BuzzWeights {
    fn default() -> Self {
        Self {
            web_search: 1,
            reddit: 3,
            social: 2,
        }
    }
}

impl BuzzWeights {
    pub fn weight_for(&self, kind: SignalKind) -> u64 {
        match kind {
            SignalKind::WebSearch => self.web_search,
            SignalKind::Reddit => self.reddit,
            SignalKind::Social => self.social,
        }
    }

    /// Parse `"search,reddit,social"`, e.g. `"1,3,2"`.
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [w, r, x] = parts.as_slice() else {
            return Err(anyhow!(
                "SCANNER_WEIGHTS expects three comma-separated integers, got {s:?}"
            ));
        };
        let num = |p: &str| {
            p.parse::<u64>()
                .map_err(|_| anyhow!("invalid weight {p:?} in SCANNER_WEIGHTS"))
        };
        Ok(Self {
            web_search: num(*w)?,
            reddit: num(*r)?,
            social: num(*x)?,
        })
    }
}

/// Per-source counts kept for the report's buzz line, plus the weights the
/// total was computed with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuzzBreakdown {
    pub web_search: u64,
    pub reddit: u64,
    pub social: u64,
    pub total: BuzzScore,
    pub weights: BuzzWeights,
}

impl fmt::Display for BuzzBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (web {}, reddit {}, social {})",
            self.total, self.web_search, self.reddit, self.social
        )
    }
}

/// Weighted sum of all readings. Unavailable sources contribute zero.
pub fn aggregate(outcomes: &[SignalOutcome], weights: &BuzzWeights) -> BuzzBreakdown {
    let mut b = BuzzBreakdown {
        weights: *weights,
        ..BuzzBreakdown::default()
    };
    for o in outcomes {
        let count = o.count();
        match o.kind() {
            SignalKind::WebSearch => b.web_search = b.web_search.saturating_add(count),
            SignalKind::Reddit => b.reddit = b.reddit.saturating_add(count),
            SignalKind::Social => b.social = b.social.saturating_add(count),
        }
        b.total = b
            .total
            .saturating_add(count.saturating_mul(weights.weight_for(o.kind())));
    }
    b
}
