//! Issue-announcement line recognition

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::IssueKind;

/// Raw fields extracted from an issue-announcement line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueMatch {
    pub kind: IssueKind,
    pub bytes: u64,
    pub blocks: u64,
    pub loss_record: String,
}

lazy_static! {
    /// Ordered per-kind recognizers; the first match wins
    static ref ISSUE_PATTERNS: Vec<(IssueKind, Regex)> = vec![
        (IssueKind::DefinitelyLost, leak_pattern(r"definitel?y\s+lost")),
        (IssueKind::PossiblyLost, leak_pattern(r"possibl?y\s+lost")),
        (IssueKind::StillReachable, leak_pattern(r"still\s+reachabl?e")),
        (IssueKind::InvalidRead, access_pattern("read")),
        (IssueKind::InvalidWrite, access_pattern("write")),
    ];
}

fn leak_pattern(kind_phrase: &str) -> Regex {
    let pattern = format!(
        r"(?i)==\d+==\s+([\d,]+)(?:\s+\([^)]+\))?\s+bytes?\s+in\s+([\d,]+)\s+blocks?\s+are\s+{}\s+in\s+loss\s+record\s+(.+)",
        kind_phrase
    );
    Regex::new(&pattern).expect("leak pattern is valid")
}

fn access_pattern(direction: &str) -> Regex {
    let pattern = format!(
        r"(?i)==\d+==\s+Invalid\s+{}\s+of\s+size\s+(\d+)",
        direction
    );
    Regex::new(&pattern).expect("access pattern is valid")
}

/// Tests a line against the recognizer set. Returns `None` when the line is
/// not an issue announcement; the caller then advances by one line.
pub fn detect_issue(line: &str) -> Option<IssueMatch> {
    for (kind, pattern) in ISSUE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(line) {
            let detected = if kind.is_invalid_access() {
                IssueMatch {
                    kind: *kind,
                    bytes: parse_count(&caps[1]),
                    blocks: 1,
                    loss_record: "N/A".to_string(),
                }
            } else {
                IssueMatch {
                    kind: *kind,
                    bytes: parse_count(&caps[1]),
                    blocks: parse_count(&caps[2]),
                    loss_record: caps[3].trim().to_string(),
                }
            };
            return Some(detected);
        }
    }
    None
}

/// Strips thousands separators before conversion. The capture groups
/// guarantee digit content; counts too large for u64 degrade to 0.
fn parse_count(raw: &str) -> u64 {
    raw.replace(',', "").parse().unwrap_or(0)
}
