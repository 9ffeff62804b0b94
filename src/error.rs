//! Error types and handling for the Valgrind log analyzer

use std::{io, result::Result as StdResult};

use thiserror::Error;

/// Custom result type for analyzer operations
pub type Result<T> = StdResult<T, Error>;

/// Core error type for analyzer operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Report error: {0}")]
    ReportError(#[from] crate::report::ReportError),

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

/// Failures that abort a parse before any issue is extracted.
///
/// Per-line problems are never errors: a line matching no recognizer is
/// skipped and an undecomposable trace line is consumed without a frame.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseError {
    #[error("input file does not exist: {0}")]
    Missing(String),

    #[error("input path is not a regular file: {0}")]
    NotAFile(String),

    #[error("input file is not readable: {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("input file is empty: {0}")]
    Empty(String),

    #[error("not a Valgrind Memcheck log: no Memcheck banner found within the first {0} lines")]
    MissingBanner(usize),
}
