//! Statistical aggregation over classified memory issues

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::issue::{IssueKind, MemoryIssue, Severity};

/// Aggregate statistics over an issue set.
///
/// Per-kind maps carry entries only for kinds with at least one occurrence;
/// their sums equal the corresponding totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_issues: usize,
    pub total_bytes_lost: u64,
    pub total_blocks_lost: u64,
    pub issues_by_kind: BTreeMap<IssueKind, usize>,
    pub bytes_by_kind: BTreeMap<IssueKind, u64>,
    pub blocks_by_kind: BTreeMap<IssueKind, u64>,
    pub severity_distribution: BTreeMap<Severity, usize>,
    /// Up to ten source keys, most frequent first
    pub top_sources: Vec<String>,
}

impl Statistics {
    /// Percentage of total issue count per kind; empty when there are no issues
    pub fn percentage_by_kind(&self) -> BTreeMap<IssueKind, f64> {
        if self.total_issues == 0 {
            return BTreeMap::new();
        }
        self.issues_by_kind
            .iter()
            .map(|(kind, count)| (*kind, *count as f64 / self.total_issues as f64 * 100.0))
            .collect()
    }

    /// Percentage of total bytes per kind; empty when no bytes were lost
    pub fn bytes_percentage_by_kind(&self) -> BTreeMap<IssueKind, f64> {
        if self.total_bytes_lost == 0 {
            return BTreeMap::new();
        }
        self.bytes_by_kind
            .iter()
            .map(|(kind, bytes)| {
                (*kind, *bytes as f64 / self.total_bytes_lost as f64 * 100.0)
            })
            .collect()
    }

    /// Aggregates the three leak kinds, excluding invalid accesses
    pub fn leak_summary(&self) -> LeakSummary {
        let leak_kinds = [
            IssueKind::DefinitelyLost,
            IssueKind::PossiblyLost,
            IssueKind::StillReachable,
        ];

        let mut summary = LeakSummary::default();
        for kind in leak_kinds {
            summary.bytes += self.bytes_by_kind.get(&kind).copied().unwrap_or(0);
            summary.blocks += self.blocks_by_kind.get(&kind).copied().unwrap_or(0);
            summary.issues += self.issues_by_kind.get(&kind).copied().unwrap_or(0);
        }
        if self.total_bytes_lost > 0 {
            summary.percentage_of_total_bytes =
                summary.bytes as f64 / self.total_bytes_lost as f64 * 100.0;
        }
        summary
    }
}

/// Leak totals across definitely lost, possibly lost, and still reachable
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeakSummary {
    pub bytes: u64,
    pub blocks: u64,
    pub issues: usize,
    pub percentage_of_total_bytes: f64,
}

/// Issues organized by classification, with aggregate statistics.
///
/// The full list is the union of the per-kind lists, each independently
/// re-sorted by the same priority rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedIssues {
    pub issues_by_kind: BTreeMap<IssueKind, Vec<MemoryIssue>>,
    pub statistics: Statistics,
    pub all_issues: Vec<MemoryIssue>,
}

impl ClassifiedIssues {
    /// All issues with the given severity, preserving list order
    pub fn issues_by_severity(&self, severity: Severity) -> Vec<&MemoryIssue> {
        self.all_issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .collect()
    }

    /// All critical-severity issues, preserving list order
    pub fn critical_issues(&self) -> Vec<&MemoryIssue> {
        self.issues_by_severity(Severity::Critical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_statistics() -> Statistics {
        let mut stats = Statistics {
            total_issues: 4,
            total_bytes_lost: 1000,
            total_blocks_lost: 6,
            ..Statistics::default()
        };
        stats.issues_by_kind.insert(IssueKind::DefinitelyLost, 2);
        stats.issues_by_kind.insert(IssueKind::InvalidRead, 2);
        stats.bytes_by_kind.insert(IssueKind::DefinitelyLost, 750);
        stats.bytes_by_kind.insert(IssueKind::InvalidRead, 250);
        stats.blocks_by_kind.insert(IssueKind::DefinitelyLost, 4);
        stats.blocks_by_kind.insert(IssueKind::InvalidRead, 2);
        stats
    }

    #[test]
    fn test_percentages_empty_on_zero_totals() {
        let stats = Statistics::default();
        assert!(stats.percentage_by_kind().is_empty());
        assert!(stats.bytes_percentage_by_kind().is_empty());
    }

    #[test]
    fn test_percentage_by_kind() {
        let stats = sample_statistics();
        let percentages = stats.percentage_by_kind();
        assert_eq!(percentages[&IssueKind::DefinitelyLost], 50.0);
        assert_eq!(percentages[&IssueKind::InvalidRead], 50.0);

        let bytes = stats.bytes_percentage_by_kind();
        assert_eq!(bytes[&IssueKind::DefinitelyLost], 75.0);
        assert_eq!(bytes[&IssueKind::InvalidRead], 25.0);
    }

    #[test]
    fn test_leak_summary_excludes_invalid_accesses() {
        let stats = sample_statistics();
        let summary = stats.leak_summary();
        assert_eq!(summary.bytes, 750);
        assert_eq!(summary.blocks, 4);
        assert_eq!(summary.issues, 2);
        assert_eq!(summary.percentage_of_total_bytes, 75.0);
    }

    #[test]
    fn test_leak_summary_on_empty_statistics() {
        let summary = Statistics::default().leak_summary();
        assert_eq!(summary, LeakSummary::default());
    }
}
