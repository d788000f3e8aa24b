// src/analyze/mod.rs
//! Scoring stage: oracle adapter, verdict decoding, scorer.

pub mod ai_adapter;
pub mod scorer;
pub mod verdict;

pub use crate::analyze::ai_adapter::{build_oracle, DynOracle, MockOracle, ScoringOracle};
pub use crate::analyze::scorer::{build_prompt, TrendScorer};
pub use crate::analyze::verdict::{decode_verdict, is_real_ticker, strip_code_fence, TrendVerdict};
