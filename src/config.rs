//! Configuration types and validation for the analyzer

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Parser tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Upper bound on trace lines consumed per issue. Bounds an adversarial
    /// announcement followed by an unbounded run of trace-like lines.
    pub max_trace_lines: usize,
}

/// Global analyzer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub parser: ParserConfig,
    /// Case-insensitive substring applied to traces before classification
    pub module_filter: Option<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_trace_lines: 256,
        }
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.parser.max_trace_lines == 0 {
            return Err(Error::ConfigError(
                "max_trace_lines must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
