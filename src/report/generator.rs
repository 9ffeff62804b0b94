//! Report generator implementation

use std::fs;

use serde::Serialize;
use tracing::info;

use super::{ReportConfig, ReportError, ReportFormat};
use crate::types::{ClassifiedIssues, MemoryIssue, Statistics};

/// Placeholder for rows where no function or location could be resolved
const UNRESOLVED: &str = "Unknown";

/// JSON report envelope: statistics plus the priority-ordered issue list
#[derive(Serialize)]
struct JsonReport<'a> {
    generated: String,
    analyzer_version: &'static str,
    statistics: &'a Statistics,
    issues: &'a [MemoryIssue],
}

/// Renders classified issues into the configured report format
pub struct ReportGenerator;

impl ReportGenerator {
    /// Renders and writes the report to the configured path
    pub fn generate(
        classified: &ClassifiedIssues,
        config: &ReportConfig,
    ) -> Result<(), ReportError> {
        let content = Self::render(classified, config.format)?;
        fs::write(&config.output_path, content)?;
        info!(path = %config.output_path.display(), "report written");
        Ok(())
    }

    /// Renders the report as a string without touching the filesystem
    pub fn render(
        classified: &ClassifiedIssues,
        format: ReportFormat,
    ) -> Result<String, ReportError> {
        match format {
            ReportFormat::Csv => Ok(Self::format_as_csv(classified)),
            ReportFormat::Json => Self::format_as_json(classified),
            ReportFormat::PlainText => Ok(Self::format_as_text(classified)),
            ReportFormat::Markdown => Ok(Self::format_as_markdown(classified)),
        }
    }

    fn format_as_csv(classified: &ClassifiedIssues) -> String {
        let mut content = String::new();
        content.push_str(
            "Issue Type,Severity,Bytes,Blocks,Loss Record,Primary Function,Source Location\n",
        );

        for issue in &classified.all_issues {
            let row = [
                issue.kind.display_name().to_string(),
                issue.severity.to_string(),
                issue.bytes.to_string(),
                issue.blocks.to_string(),
                issue.loss_record.clone(),
                issue.primary_function().unwrap_or(UNRESOLVED).to_string(),
                issue
                    .source_location
                    .as_deref()
                    .unwrap_or(UNRESOLVED)
                    .to_string(),
            ];
            let escaped: Vec<String> = row.iter().map(|field| csv_escape(field)).collect();
            content.push_str(&escaped.join(","));
            content.push('\n');
        }

        content
    }

    fn format_as_json(classified: &ClassifiedIssues) -> Result<String, ReportError> {
        let report = JsonReport {
            generated: chrono::Utc::now().to_rfc3339(),
            analyzer_version: env!("CARGO_PKG_VERSION"),
            statistics: &classified.statistics,
            issues: &classified.all_issues,
        };
        serde_json::to_string_pretty(&report)
            .map_err(|e| ReportError::SerializationError(e.to_string()))
    }

    fn format_as_text(classified: &ClassifiedIssues) -> String {
        let stats = &classified.statistics;
        let mut content = String::new();

        content.push_str("Valgrind Memory Analysis Report\n");
        content.push_str("===============================\n\n");
        content.push_str(&format!("Generated: {}\n", chrono::Utc::now().to_rfc3339()));
        content.push_str(&format!("Total Issues: {}\n", stats.total_issues));
        content.push_str(&format!("Total Bytes Lost: {}\n", stats.total_bytes_lost));
        content.push_str(&format!("Total Blocks Lost: {}\n\n", stats.total_blocks_lost));

        content.push_str("Issues by Kind:\n");
        for (kind, count) in &stats.issues_by_kind {
            let bytes = stats.bytes_by_kind.get(kind).copied().unwrap_or(0);
            let blocks = stats.blocks_by_kind.get(kind).copied().unwrap_or(0);
            content.push_str(&format!(
                "- {}: {} issues, {} bytes, {} blocks\n",
                kind, count, bytes, blocks
            ));
        }

        content.push_str("\nSeverity Distribution:\n");
        for (severity, count) in &stats.severity_distribution {
            content.push_str(&format!("- {}: {}\n", severity, count));
        }

        let leaks = stats.leak_summary();
        content.push_str(&format!(
            "\nLeak Summary: {} bytes in {} blocks across {} issues ({:.1}% of all bytes)\n",
            leaks.bytes, leaks.blocks, leaks.issues, leaks.percentage_of_total_bytes
        ));

        if !stats.top_sources.is_empty() {
            content.push_str("\nTop Sources:\n");
            for (rank, source) in stats.top_sources.iter().enumerate() {
                content.push_str(&format!("{}. {}\n", rank + 1, source));
            }
        }

        content.push_str("\nIssues:\n");
        content.push_str("-------\n");
        for issue in &classified.all_issues {
            content.push_str(&format!(
                "[{}] {} - {} bytes in {} blocks (loss record {}) at {}\n",
                issue.severity,
                issue.kind,
                issue.bytes,
                issue.blocks,
                issue.loss_record,
                issue.source_location.as_deref().unwrap_or(UNRESOLVED)
            ));
        }

        content
    }

    fn format_as_markdown(classified: &ClassifiedIssues) -> String {
        let stats = &classified.statistics;
        let mut md = String::new();

        md.push_str("# Valgrind Memory Analysis Report\n\n");
        md.push_str("## Summary\n\n");
        md.push_str(&format!("- **Generated**: {}\n", chrono::Utc::now().to_rfc3339()));
        md.push_str(&format!("- **Total Issues**: {}\n", stats.total_issues));
        md.push_str(&format!("- **Total Bytes Lost**: {}\n", stats.total_bytes_lost));
        md.push_str(&format!(
            "- **Total Blocks Lost**: {}\n\n",
            stats.total_blocks_lost
        ));

        md.push_str("## Issues by Kind\n\n");
        md.push_str("| Kind | Issues | Bytes | Blocks |\n");
        md.push_str("|------|--------|-------|--------|\n");
        for (kind, count) in &stats.issues_by_kind {
            let bytes = stats.bytes_by_kind.get(kind).copied().unwrap_or(0);
            let blocks = stats.blocks_by_kind.get(kind).copied().unwrap_or(0);
            md.push_str(&format!("| {} | {} | {} | {} |\n", kind, count, bytes, blocks));
        }

        if !stats.top_sources.is_empty() {
            md.push_str("\n## Top Sources\n\n");
            for (rank, source) in stats.top_sources.iter().enumerate() {
                md.push_str(&format!("{}. `{}`\n", rank + 1, source));
            }
        }

        md.push_str("\n## Issues\n\n");
        md.push_str(
            "| Severity | Kind | Bytes | Blocks | Loss Record | Function | Location |\n",
        );
        md.push_str(
            "|----------|------|-------|--------|-------------|----------|----------|\n",
        );
        for issue in &classified.all_issues {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} |\n",
                issue.severity,
                issue.kind,
                issue.bytes,
                issue.blocks,
                issue.loss_record,
                issue.primary_function().unwrap_or(UNRESOLVED),
                issue.source_location.as_deref().unwrap_or(UNRESOLVED)
            ));
        }

        md
    }
}

/// Quotes a CSV field when it carries delimiters, quotes, or newlines
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
