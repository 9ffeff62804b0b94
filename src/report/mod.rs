//! Report generation for classified memory issues

use std::path::PathBuf;

use thiserror::Error;

pub mod generator;

pub use generator::ReportGenerator;

/// Report configuration
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub output_path: PathBuf,
    pub format: ReportFormat,
}

/// Report output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Csv,
    Json,
    PlainText,
    Markdown,
}

/// Report generation errors
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}
