//! Valgrind Memcheck log analyzer - CLI interface
//!
//! Parses a Memcheck log, classifies the detected memory issues, and
//! renders a report in CSV, JSON, plain-text, or Markdown form.

use std::fs;
use std::process;
use std::time::Instant;

use clap::{Arg, ArgAction, Command, ValueEnum};
use tracing::{error, info};

use vgx::{
    classify, filter_issues, AnalyzerConfig, ClassifiedIssues, LogParser, ReportConfig,
    ReportFormat, ReportGenerator,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Comma-separated values (default)
    Csv,
    /// JSON report output
    Json,
    /// Plain text report
    Text,
    /// Markdown report
    Markdown,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => ReportFormat::Csv,
            OutputFormat::Json => ReportFormat::Json,
            OutputFormat::Text => ReportFormat::PlainText,
            OutputFormat::Markdown => ReportFormat::Markdown,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    /// Error messages only
    Error,
    /// Warning and error messages
    Warn,
    /// Info, warning, and error messages (default)
    Info,
    /// Debug and all messages
    Debug,
    /// Trace and all messages (most verbose)
    Trace,
}

fn main() {
    let matches = build_cli().get_matches();

    let log_level = if matches.get_flag("quiet") {
        LogLevel::Error
    } else {
        *matches
            .get_one::<LogLevel>("verbose")
            .unwrap_or(&LogLevel::Info)
    };
    init_logging(log_level);

    let input_path = matches.get_one::<String>("input").unwrap();
    let output_path = matches.get_one::<String>("output");
    let format = *matches
        .get_one::<OutputFormat>("format")
        .unwrap_or(&OutputFormat::Csv);

    // Load configuration, then let CLI arguments override it
    let mut config = match matches.get_one::<String>("config") {
        Some(config_path) => match load_config_file(config_path) {
            Ok(config) => config,
            Err(e) => {
                error!("❌ Failed to load config file: {}", e);
                process::exit(1);
            }
        },
        None => AnalyzerConfig::default(),
    };
    if let Some(needle) = matches.get_one::<String>("filter") {
        config.module_filter = Some(needle.clone());
    }
    if let Err(e) = config.validate() {
        error!("❌ {}", e);
        process::exit(1);
    }

    info!("🔍 Analyzing Valgrind log: {}", input_path);
    let start_time = Instant::now();

    let parser = LogParser::new(&config.parser);
    let mut issues = match parser.parse_file(input_path) {
        Ok(issues) => issues,
        Err(e) => {
            error!("❌ {}", e);
            process::exit(1);
        }
    };

    if issues.is_empty() {
        info!("No memory issues found in the log file.");
        return;
    }
    info!("Found {} memory issues", issues.len());

    if let Some(needle) = &config.module_filter {
        issues = filter_issues(issues, needle);
        info!("{} issues match filter '{}'", issues.len(), needle);
        if issues.is_empty() {
            return;
        }
    }

    let classified = classify(issues);
    display_summary(&classified, start_time.elapsed());

    match output_path {
        Some(output) => {
            let report_config = ReportConfig {
                output_path: output.into(),
                format: format.into(),
            };
            if let Err(e) = ReportGenerator::generate(&classified, &report_config) {
                error!("❌ Failed to generate report: {}", e);
                process::exit(1);
            }
            info!("📋 Report generated: {}", output);
        }
        None => match ReportGenerator::render(&classified, format.into()) {
            Ok(content) => println!("{}", content),
            Err(e) => {
                error!("❌ Failed to render report: {}", e);
                process::exit(1);
            }
        },
    }
}

fn build_cli() -> Command {
    Command::new("vgx")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Analyze Valgrind Memcheck logs and generate classification reports")
        .long_about(
            "Extracts memory issues (leaks, invalid accesses) and their stack traces \
             from Valgrind Memcheck output, classifies them by kind and severity, and \
             renders aggregate statistics as a CSV, JSON, text, or Markdown report.",
        )
        .arg(
            Arg::new("input")
                .value_name("LOG_FILE")
                .help("Path to the Valgrind log file to analyze")
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Report output path (without it the report goes to stdout)"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_parser(clap::value_parser!(OutputFormat))
                .default_value("csv")
                .help("Report output format"),
        )
        .arg(
            Arg::new("filter")
                .long("filter")
                .value_name("SUBSTRING")
                .help("Keep only issues whose trace mentions this substring (case-insensitive)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file (JSON/YAML)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .value_parser(clap::value_parser!(LogLevel))
                .default_value("info")
                .help("Set logging verbosity"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .help("Suppress all output except errors"),
        )
}

fn init_logging(level: LogLevel) {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    let filter_level = match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new(format!("vgx={}", filter_level)))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

fn load_config_file(path: &str) -> Result<AnalyzerConfig, String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {}", e))?;

    // Try JSON first, then YAML
    serde_json::from_str(&content)
        .or_else(|_| serde_yaml::from_str(&content))
        .map_err(|e| format!("Config parsing error: {}", e))
}

fn display_summary(classified: &ClassifiedIssues, duration: std::time::Duration) {
    let stats = &classified.statistics;
    info!("📊 Analysis Summary:");
    info!("   Total Issues: {}", stats.total_issues);
    info!("   Bytes Lost: {}", stats.total_bytes_lost);
    info!("   Blocks Lost: {}", stats.total_blocks_lost);
    info!("   Critical Issues: {}", classified.critical_issues().len());
    info!("   Time: {:.2?}", duration);
}
