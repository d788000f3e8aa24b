//! Digest assembly.
//!
//! The builder starts with a header line and appends one block per
//! qualifying keyword, in the order keywords are pushed. If nothing
//! qualifies, `finish` appends a single fallback line.

use crate::engine::KeywordScan;

pub const FALLBACK_LINE: &str = "No high-asymmetry signals today — normal day. Keep scanning!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    lines: Vec<String>,
    signal_found: bool,
}

impl Report {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn has_signal(&self) -> bool {
        self.signal_found
    }

    /// The exact text handed to the delivery sink.
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

#[derive(Debug, Clone)]
pub struct ReportBuilder {
    lines: Vec<String>,
    threshold: i64,
    signal_found: bool,
}

impl ReportBuilder {
    pub fn new(header: impl Into<String>, threshold: i64) -> Self {
        Self {
            lines: vec![header.into()],
            threshold,
            signal_found: false,
        }
    }

    /// Append `scan`'s block if its verdict meets the threshold. Returns whether it did.
    pub fn push(&mut self, scan: &KeywordScan) -> bool {
        if !scan.verdict.qualifies(self.threshold) {
            return false;
        }
        self.lines.extend(format_block(scan));
        self.signal_found = true;
        true
    }

    pub fn finish(mut self) -> Report {
        if !self.signal_found {
            self.lines.push(FALLBACK_LINE.to_string());
        }
        Report {
            lines: self.lines,
            signal_found: self.signal_found,
        }
    }
}

fn format_block(scan: &KeywordScan) -> Vec<String> {
    let v = &scan.verdict;
    let mut block = vec![
        format!(
            "\n🔥 **{}** — Score: {}/10 ({})",
            scan.keyword.to_uppercase(),
            v.asymmetry_score,
            v.conviction
        ),
        format!("Thesis: {}", v.thesis),
    ];

    let summary = v.sources_summary.trim();
    if summary.is_empty() {
        block.push(format!("Buzz: {}", scan.buzz));
    } else {
        block.push(format!("Buzz: {} | {summary}", scan.buzz));
    }

    if !scan.plays.is_empty() {
        let plays: Vec<String> = scan.plays.iter().map(ToString::to_string).collect();
        block.push(format!("Plays: {}", plays.join("\n")));
    }
    block
}
