//! Combines a detector match and an extracted trace into a finished issue

use super::detector::IssueMatch;
use crate::types::{MemoryIssue, StackFrame};

/// Builds a `MemoryIssue` from a detector match and its stack trace,
/// assigning the kind's default severity and the derived primary location
pub fn build_issue(detected: IssueMatch, stack_trace: Vec<StackFrame>) -> MemoryIssue {
    let source_location = derive_source_location(&stack_trace);
    MemoryIssue::new(
        detected.kind,
        detected.bytes,
        detected.blocks,
        detected.loss_record,
        stack_trace,
        source_location,
        None,
    )
}

/// First frame with both file and line wins, formatted "file:line"; else
/// the first frame with only a file; else none
fn derive_source_location(stack_trace: &[StackFrame]) -> Option<String> {
    for frame in stack_trace {
        if let (Some(file), Some(line)) = (&frame.source_file, frame.line_number) {
            return Some(format!("{}:{}", file, line));
        }
    }
    for frame in stack_trace {
        if let Some(file) = &frame.source_file {
            return Some(file.clone());
        }
    }
    None
}
