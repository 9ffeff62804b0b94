//! Stack-trace extraction from the lines following a detected issue

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::StackFrame;

lazy_static! {
    static ref FRAME_RE: Regex = Regex::new(
        r"(?i)==\d+==\s+(?:at|by)\s+0x[0-9A-F]+:\s*(.+?)(?:\s+\((.+?)\))?$"
    )
    .expect("frame pattern is valid");
    static ref ADDRESS_RE: Regex =
        Regex::new(r"0x[0-9A-Fa-f]+").expect("address pattern is valid");
    static ref FILE_LINE_RE: Regex =
        Regex::new(r"([^:]+):(\d+)$").expect("file-line pattern is valid");
}

/// Extraction state over the lines following a detected issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TraceState {
    Consuming,
    Done,
}

/// Consumes the contiguous run of trace lines after an issue announcement
#[derive(Debug, Clone)]
pub struct TraceExtractor {
    max_trace_lines: usize,
}

impl TraceExtractor {
    pub fn new(max_trace_lines: usize) -> Self {
        Self { max_trace_lines }
    }

    /// Walks the lines from `start`, decomposing each frame line. Returns
    /// the frames plus the total count of consumed lines, so the caller can
    /// skip past the whole trace including undecomposable continuation
    /// lines.
    pub fn extract(&self, lines: &[&str], start: usize) -> (Vec<StackFrame>, usize) {
        let mut frames = Vec::new();
        let mut consumed = 0;
        let mut state = TraceState::Consuming;
        let mut index = start;

        while state == TraceState::Consuming && index < lines.len() {
            let line = lines[index].trim();

            if line.is_empty() || !line.starts_with("==") {
                state = TraceState::Done;
            } else if line.contains("at 0x") || line.contains("by 0x") {
                // Consumed whether or not decomposition succeeds, to keep
                // the scan position correct.
                if let Some(frame) = parse_frame(line) {
                    frames.push(frame);
                }
                consumed += 1;
                index += 1;
                if consumed >= self.max_trace_lines {
                    state = TraceState::Done;
                }
            } else {
                state = TraceState::Done;
            }
        }

        (frames, consumed)
    }
}

/// Decomposes one trace line into a structured frame
pub fn parse_frame(line: &str) -> Option<StackFrame> {
    let caps = FRAME_RE.captures(line)?;
    let function_info = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
    let location_info = caps.get(2).map(|m| m.as_str()).unwrap_or("");

    let address = ADDRESS_RE
        .find(line)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| StackFrame::UNKNOWN.to_string());

    let function_name = if function_info == "???" {
        StackFrame::UNKNOWN.to_string()
    } else {
        function_info.to_string()
    };

    let library = match location_info.strip_prefix("in ") {
        Some(rest) => rest.trim().to_string(),
        None => StackFrame::UNKNOWN.to_string(),
    };

    let (source_file, line_number) = parse_location(location_info);

    Some(StackFrame {
        address,
        function_name,
        library,
        source_file,
        line_number,
    })
}

/// Splits a trailing parenthesized clause into source file and line number.
/// Library clauses ("in ...") carry no source location.
fn parse_location(location_info: &str) -> (Option<String>, Option<u32>) {
    if location_info.is_empty() || location_info.starts_with("in ") {
        return (None, None);
    }

    if let Some(caps) = FILE_LINE_RE.captures(location_info) {
        let file = caps[1].trim().to_string();
        let line = caps[2].parse().ok();
        return (Some(file), line);
    }

    if location_info != "???" {
        return (Some(location_info.to_string()), None);
    }

    (None, None)
}
