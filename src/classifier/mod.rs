//! Issue classification and statistical aggregation
//!
//! Groups parsed issues by kind, orders them by priority, and accumulates
//! the statistics consumed by reporting.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::collections::HashMap;

use tracing::debug;

use crate::types::{ClassifiedIssues, IssueKind, MemoryIssue, Severity, StackFrame, Statistics};

/// Maximum number of ranked source keys carried in statistics
const TOP_SOURCES_LIMIT: usize = 10;

/// Classifies and organizes memory issues by kind with aggregate
/// statistics. Empty input yields an all-zero result, never an error.
pub fn classify(issues: Vec<MemoryIssue>) -> ClassifiedIssues {
    if issues.is_empty() {
        return ClassifiedIssues::default();
    }

    let statistics = calculate_statistics(&issues);

    // Partition preserves input order; each partition is then sorted
    // independently of the others and of the full list.
    let mut issues_by_kind: BTreeMap<IssueKind, Vec<MemoryIssue>> = BTreeMap::new();
    for issue in &issues {
        issues_by_kind
            .entry(issue.kind)
            .or_default()
            .push(issue.clone());
    }
    for group in issues_by_kind.values_mut() {
        prioritize(group);
    }

    let mut all_issues = issues;
    prioritize(&mut all_issues);

    debug!(
        total = all_issues.len(),
        kinds = issues_by_kind.len(),
        "classification complete"
    );

    ClassifiedIssues {
        issues_by_kind,
        statistics,
        all_issues,
    }
}

/// Stable priority sort: severity rank ascending, then bytes and blocks
/// descending. Equal keys retain their relative order.
pub fn prioritize(issues: &mut [MemoryIssue]) {
    issues.sort_by_key(|issue| {
        (
            issue.severity.rank(),
            Reverse(issue.bytes),
            Reverse(issue.blocks),
        )
    });
}

/// Accumulates per-kind and per-severity statistics across all issues
pub fn calculate_statistics(issues: &[MemoryIssue]) -> Statistics {
    if issues.is_empty() {
        return Statistics::default();
    }

    let mut stats = Statistics::default();
    for issue in issues {
        *stats.issues_by_kind.entry(issue.kind).or_insert(0) += 1;
        *stats.bytes_by_kind.entry(issue.kind).or_insert(0) += issue.bytes;
        *stats.blocks_by_kind.entry(issue.kind).or_insert(0) += issue.blocks;
        *stats
            .severity_distribution
            .entry(issue.severity)
            .or_insert(0) += 1;

        stats.total_bytes_lost += issue.bytes;
        stats.total_blocks_lost += issue.blocks;
    }
    stats.total_issues = issues.len();
    stats.top_sources = top_sources(issues, TOP_SOURCES_LIMIT);
    stats
}

/// Ranks source keys by frequency, most frequent first. Ties keep
/// first-encountered order: keys are counted in input order and the final
/// sort is stable on descending frequency.
pub fn top_sources(issues: &[MemoryIssue], limit: usize) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut ordered_keys: Vec<String> = Vec::new();

    for issue in issues {
        let key = match source_key(issue) {
            Some(key) => key,
            None => continue,
        };
        match counts.get_mut(&key) {
            Some(count) => *count += 1,
            None => {
                counts.insert(key.clone(), 1);
                ordered_keys.push(key);
            }
        }
    }

    ordered_keys.sort_by_key(|key| Reverse(counts[key]));
    ordered_keys.truncate(limit);
    ordered_keys
}

/// The issue's derived location, or a "function (library)" key from the
/// top frame when the function is known; unknown frames contribute nothing
fn source_key(issue: &MemoryIssue) -> Option<String> {
    if let Some(location) = &issue.source_location {
        return Some(location.clone());
    }
    let top = issue.stack_trace.first()?;
    if top.function_name != StackFrame::UNKNOWN {
        return Some(format!("{} ({})", top.function_name, top.library));
    }
    None
}

/// All issues with the given severity, preserving input order
pub fn issues_by_severity(issues: &[MemoryIssue], severity: Severity) -> Vec<MemoryIssue> {
    issues
        .iter()
        .filter(|issue| issue.severity == severity)
        .cloned()
        .collect()
}

/// All critical-severity issues, preserving input order
pub fn critical_issues(issues: &[MemoryIssue]) -> Vec<MemoryIssue> {
    issues_by_severity(issues, Severity::Critical)
}
