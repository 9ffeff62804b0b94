//! Post-parse substring filtering of issues by module name

use tracing::debug;

use crate::types::MemoryIssue;

/// Keeps issues whose trace or derived location mentions `needle`,
/// case-insensitively. An empty needle keeps everything. Applied before
/// classification.
pub fn filter_issues(issues: Vec<MemoryIssue>, needle: &str) -> Vec<MemoryIssue> {
    if needle.is_empty() {
        return issues;
    }
    let needle = needle.to_lowercase();
    let before = issues.len();

    let kept: Vec<MemoryIssue> = issues
        .into_iter()
        .filter(|issue| issue_mentions(issue, &needle))
        .collect();

    debug!(before, after = kept.len(), filter = %needle, "applied module filter");
    kept
}

fn issue_mentions(issue: &MemoryIssue, needle: &str) -> bool {
    if let Some(location) = &issue.source_location {
        if location.to_lowercase().contains(needle) {
            return true;
        }
    }
    issue.stack_trace.iter().any(|frame| {
        frame.function_name.to_lowercase().contains(needle)
            || frame.library.to_lowercase().contains(needle)
            || frame
                .source_file
                .as_ref()
                .map_or(false, |file| file.to_lowercase().contains(needle))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IssueKind, StackFrame};

    fn issue_with_frame(function: &str, library: &str, file: Option<&str>) -> MemoryIssue {
        MemoryIssue::new(
            IssueKind::DefinitelyLost,
            8,
            1,
            "1 of 1",
            vec![StackFrame {
                address: "0x1".into(),
                function_name: function.into(),
                library: library.into(),
                source_file: file.map(str::to_string),
                line_number: None,
            }],
            file.map(str::to_string),
            None,
        )
    }

    #[test]
    fn test_empty_needle_keeps_everything() {
        let issues = vec![issue_with_frame("f", "libx.so", None)];
        assert_eq!(filter_issues(issues, "").len(), 1);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let issues = vec![issue_with_frame("alloc_pool", "LibPool.SO", None)];
        assert_eq!(filter_issues(issues.clone(), "libpool").len(), 1);
        assert_eq!(filter_issues(issues, "ALLOC_POOL").len(), 1);
    }

    #[test]
    fn test_matches_source_file_and_location() {
        let issues = vec![issue_with_frame("f", "unknown", Some("widget.c"))];
        assert_eq!(filter_issues(issues, "widget").len(), 1);
    }

    #[test]
    fn test_non_matching_issues_are_dropped() {
        let issues = vec![
            issue_with_frame("keep_me", "liba.so", None),
            issue_with_frame("other", "libb.so", None),
        ];
        let kept = filter_issues(issues, "keep");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].stack_trace[0].function_name, "keep_me");
    }
}
