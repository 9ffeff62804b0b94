//! Immutable value types for detected memory issues

use std::fmt;

use serde::{Deserialize, Serialize};

/// Categories of memory issues detected in Memcheck output
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    DefinitelyLost,
    PossiblyLost,
    StillReachable,
    InvalidRead,
    InvalidWrite,
    UseAfterFree,
    Other,
}

impl IssueKind {
    /// Human-readable category name used in reports
    pub fn display_name(&self) -> &'static str {
        match self {
            IssueKind::DefinitelyLost => "Definitely Lost",
            IssueKind::PossiblyLost => "Possibly Lost",
            IssueKind::StillReachable => "Still Reachable",
            IssueKind::InvalidRead => "Invalid Read",
            IssueKind::InvalidWrite => "Invalid Write",
            IssueKind::UseAfterFree => "Use After Free",
            IssueKind::Other => "Other",
        }
    }

    /// Whether this kind describes an invalid memory access rather than a leak
    pub fn is_invalid_access(&self) -> bool {
        matches!(self, IssueKind::InvalidRead | IssueKind::InvalidWrite)
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Severity levels, ranked ascending from most to least severe.
/// Lower rank sorts first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Severity {
    Critical = 1,
    High = 2,
    Medium = 3,
    Low = 4,
    Info = 5,
}

impl Severity {
    /// Numeric rank used for priority ordering
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Default severity for an issue kind
    pub fn default_for(kind: IssueKind) -> Self {
        match kind {
            IssueKind::DefinitelyLost => Severity::Critical,
            IssueKind::PossiblyLost => Severity::High,
            IssueKind::InvalidRead => Severity::Critical,
            IssueKind::InvalidWrite => Severity::Critical,
            IssueKind::UseAfterFree => Severity::Critical,
            IssueKind::StillReachable => Severity::Low,
            IssueKind::Other => Severity::Medium,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
            Severity::Info => "Info",
        };
        f.write_str(name)
    }
}

/// One call-site in a captured stack trace, ordered from the point of
/// failure outward to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    /// Raw hexadecimal address token from the log
    pub address: String,
    /// Demangled function name, or the unknown sentinel
    pub function_name: String,
    /// Library or object the frame resolved into, or the unknown sentinel
    pub library: String,
    pub source_file: Option<String>,
    /// Never present without `source_file`
    pub line_number: Option<u32>,
}

impl StackFrame {
    /// Sentinel for function names and libraries the log could not resolve
    pub const UNKNOWN: &'static str = "unknown";
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.function_name, self.library)?;
        match (&self.source_file, self.line_number) {
            (Some(file), Some(line)) => write!(f, " ({}:{})", file, line),
            (Some(file), None) => write!(f, " ({})", file),
            _ => Ok(()),
        }
    }
}

/// One detected memory issue with its stack trace and derived location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryIssue {
    pub kind: IssueKind,
    /// Bytes lost, or the access size for invalid reads/writes
    pub bytes: u64,
    /// Blocks lost; fixed to 1 for invalid-access kinds
    pub blocks: u64,
    /// Loss-record identifier, or "N/A" for invalid-access kinds
    pub loss_record: String,
    /// Top-of-stack first, in encounter order; possibly empty
    pub stack_trace: Vec<StackFrame>,
    /// Derived primary location, "file:line" or "file"
    pub source_location: Option<String>,
    pub severity: Severity,
}

impl MemoryIssue {
    /// Builds an issue. Severity follows the kind's default unless an
    /// explicit override is given; `Some` always wins, including `Some` of
    /// the default itself.
    pub fn new(
        kind: IssueKind,
        bytes: u64,
        blocks: u64,
        loss_record: impl Into<String>,
        stack_trace: Vec<StackFrame>,
        source_location: Option<String>,
        severity: Option<Severity>,
    ) -> Self {
        Self {
            kind,
            bytes,
            blocks,
            loss_record: loss_record.into(),
            stack_trace,
            source_location,
            severity: severity.unwrap_or_else(|| Severity::default_for(kind)),
        }
    }

    /// First frame whose function name is known, for report rows
    pub fn primary_function(&self) -> Option<&str> {
        self.stack_trace
            .iter()
            .find(|frame| frame.function_name != StackFrame::UNKNOWN)
            .map(|frame| frame.function_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_severity_table() {
        assert_eq!(
            Severity::default_for(IssueKind::DefinitelyLost),
            Severity::Critical
        );
        assert_eq!(Severity::default_for(IssueKind::PossiblyLost), Severity::High);
        assert_eq!(
            Severity::default_for(IssueKind::StillReachable),
            Severity::Low
        );
        assert_eq!(
            Severity::default_for(IssueKind::InvalidRead),
            Severity::Critical
        );
        assert_eq!(
            Severity::default_for(IssueKind::InvalidWrite),
            Severity::Critical
        );
        assert_eq!(
            Severity::default_for(IssueKind::UseAfterFree),
            Severity::Critical
        );
        assert_eq!(Severity::default_for(IssueKind::Other), Severity::Medium);
    }

    #[test]
    fn test_severity_rank_ordering() {
        assert!(Severity::Critical < Severity::High);
        assert!(Severity::High < Severity::Medium);
        assert!(Severity::Medium < Severity::Low);
        assert!(Severity::Low < Severity::Info);
        assert_eq!(Severity::Critical.rank(), 1);
        assert_eq!(Severity::Info.rank(), 5);
    }

    #[test]
    fn test_explicit_override_wins() {
        let issue = MemoryIssue::new(
            IssueKind::DefinitelyLost,
            32,
            1,
            "1 of 1",
            Vec::new(),
            None,
            Some(Severity::Info),
        );
        assert_eq!(issue.severity, Severity::Info);
    }

    #[test]
    fn test_explicit_default_choice_is_honored() {
        // Picking the kind's own default explicitly must behave the same as
        // picking any other severity, not fall through to table lookup.
        let issue = MemoryIssue::new(
            IssueKind::Other,
            0,
            0,
            "N/A",
            Vec::new(),
            None,
            Some(Severity::Medium),
        );
        assert_eq!(issue.severity, Severity::Medium);
    }

    #[test]
    fn test_frame_display() {
        let frame = StackFrame {
            address: "0x4005BE".into(),
            function_name: "main".into(),
            library: StackFrame::UNKNOWN.into(),
            source_file: Some("test.c".into()),
            line_number: Some(10),
        };
        assert_eq!(frame.to_string(), "main [unknown] (test.c:10)");

        let bare = StackFrame {
            address: "0x400555".into(),
            function_name: StackFrame::UNKNOWN.into(),
            library: "/lib/libc.so.6".into(),
            source_file: None,
            line_number: None,
        };
        assert_eq!(bare.to_string(), "unknown [/lib/libc.so.6]");
    }

    #[test]
    fn test_primary_function_skips_unknown_frames() {
        let issue = MemoryIssue::new(
            IssueKind::InvalidRead,
            4,
            1,
            "N/A",
            vec![
                StackFrame {
                    address: "0x1".into(),
                    function_name: StackFrame::UNKNOWN.into(),
                    library: "/lib/libc.so.6".into(),
                    source_file: None,
                    line_number: None,
                },
                StackFrame {
                    address: "0x2".into(),
                    function_name: "main".into(),
                    library: StackFrame::UNKNOWN.into(),
                    source_file: Some("main.c".into()),
                    line_number: Some(3),
                },
            ],
            Some("main.c:3".into()),
            None,
        );
        assert_eq!(issue.primary_function(), Some("main"));
    }

    #[test]
    fn test_kind_display_names() {
        assert_eq!(IssueKind::DefinitelyLost.to_string(), "Definitely Lost");
        assert_eq!(IssueKind::InvalidWrite.to_string(), "Invalid Write");
        assert!(IssueKind::InvalidRead.is_invalid_access());
        assert!(!IssueKind::StillReachable.is_invalid_access());
    }
}
