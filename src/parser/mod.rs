//! Valgrind Memcheck log parsing
//!
//! Scans a log line by line: the detector recognizes issue-announcement
//! lines, the trace extractor consumes the stack trace that follows, and
//! the builder emits one `MemoryIssue` per announcement. Scanning resumes
//! after the consumed lines.

pub mod builder;
pub mod detector;
pub mod trace;

use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::config::ParserConfig;
use crate::error::{ParseError, Result};
use crate::types::MemoryIssue;

use self::trace::TraceExtractor;

/// Number of leading lines searched for the Memcheck banner
const BANNER_LOOKAHEAD: usize = 50;

lazy_static! {
    static ref BANNER_RE: Regex =
        Regex::new(r"==\d+==\s+Memcheck,").expect("banner pattern is valid");
}

/// Parser for Valgrind Memcheck logs
#[derive(Debug, Clone)]
pub struct LogParser {
    extractor: TraceExtractor,
}

impl LogParser {
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            extractor: TraceExtractor::new(config.max_trace_lines),
        }
    }

    /// Parses a Memcheck log file after validating access and format.
    /// Invalid bytes are replaced rather than rejected.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Vec<MemoryIssue>> {
        let path = path.as_ref();
        validate_file(path)?;

        let bytes = fs::read(path).map_err(|source| ParseError::Unreadable {
            path: path.display().to_string(),
            source,
        })?;
        let content = String::from_utf8_lossy(&bytes);

        self.parse_str(&content)
    }

    /// Parses Memcheck log text already loaded in memory
    pub fn parse_str(&self, content: &str) -> Result<Vec<MemoryIssue>> {
        validate_format(content)?;

        let lines: Vec<&str> = content.lines().collect();
        let mut issues = Vec::new();
        let mut index = 0;

        while index < lines.len() {
            let line = lines[index].trim();
            match detector::detect_issue(line) {
                Some(detected) => {
                    let (frames, consumed) = self.extractor.extract(&lines, index + 1);
                    issues.push(builder::build_issue(detected, frames));
                    index += consumed + 1;
                }
                None => index += 1,
            }
        }

        debug!(count = issues.len(), "finished issue extraction");
        Ok(issues)
    }
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new(&ParserConfig::default())
    }
}

/// Input-access checks performed before any parsing starts
fn validate_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ParseError::Missing(path.display().to_string()).into());
    }
    if !path.is_file() {
        return Err(ParseError::NotAFile(path.display().to_string()).into());
    }

    let metadata = fs::metadata(path).map_err(|source| ParseError::Unreadable {
        path: path.display().to_string(),
        source,
    })?;
    if metadata.len() == 0 {
        return Err(ParseError::Empty(path.display().to_string()).into());
    }

    Ok(())
}

/// Rejects input lacking the Memcheck banner within the lookahead window
fn validate_format(content: &str) -> Result<()> {
    let banner_found = content
        .lines()
        .take(BANNER_LOOKAHEAD)
        .any(|line| BANNER_RE.is_match(line));

    if !banner_found {
        return Err(ParseError::MissingBanner(BANNER_LOOKAHEAD).into());
    }
    Ok(())
}
