//! Output formatting for run summaries
//!
//! Fetch outcomes, transform counts and the effective configuration can be
//! rendered as JSON, YAML or human-readable text. Everything here is written to
//! stdout by the handlers; logs go to stderr.
//!
//! # Example
//!
//! ```ignore
//! use issuecorpus::cli::output::{OutputFormat, OutputFormatter};
//!
//! let formatter = OutputFormatter::new(OutputFormat::Json);
//! let output = formatter.format_fetch(&outcomes)?;
//! println!("{}", output);
//! ```

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::IssueCorpusConfig;
use crate::fetch::FetchOutcome;
use crate::transform::TransformSummary;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

#[derive(Serialize)]
struct FetchReport<'a> {
    projects: &'a [FetchOutcome],
    total_records: u64,
    failed_projects: usize,
}

impl<'a> FetchReport<'a> {
    fn new(outcomes: &'a [FetchOutcome]) -> Self {
        Self {
            projects: outcomes,
            total_records: outcomes.iter().map(|o| o.records).sum(),
            failed_projects: outcomes.iter().filter(|o| o.stop.is_failure()).count(),
        }
    }
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the per-project results of a fetch run
    pub fn format_fetch(&self, outcomes: &[FetchOutcome]) -> Result<String> {
        let report = FetchReport::new(outcomes);
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&report)
                .context("Failed to serialize fetch summary to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(&report).context("Failed to serialize fetch summary to YAML")
            }
            OutputFormat::Human => Ok(self.format_fetch_human(&report)),
        }
    }

    pub fn format_transform(&self, summary: &TransformSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(summary)
                .context("Failed to serialize transform summary to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(summary)
                .context("Failed to serialize transform summary to YAML"),
            OutputFormat::Human => Ok(self.format_transform_human(summary)),
        }
    }

    /// Formats configuration display
    pub fn format_config(&self, config: &IssueCorpusConfig) -> Result<String> {
        let config_map = config.to_display_map();
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&config_map)
                .context("Failed to serialize configuration to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(&config_map)
                .context("Failed to serialize configuration to YAML"),
            OutputFormat::Human => Ok(config.to_string()),
        }
    }

    fn format_fetch_human(&self, report: &FetchReport<'_>) -> String {
        let mut output = String::new();

        output.push_str("Fetch Summary\n");
        output.push_str(RULE);
        output.push_str("\n\n");

        for outcome in report.projects {
            let marker = if outcome.stop.is_failure() { "\u{2717}" } else { "\u{2713}" };
            output.push_str(&format!("{} {}\n", marker, outcome.project));
            output.push_str(&format!(
                "  Offset: {} -> {}\n",
                outcome.start_offset, outcome.next_offset
            ));
            output.push_str(&format!(
                "  Stored: {} issues in {} pages\n",
                outcome.records, outcome.pages
            ));
            output.push_str(&format!("  File: {}\n", outcome.issues_file.display()));
            output.push_str(&format!("  Stopped: {}\n", outcome.stop));
        }

        if report.projects.is_empty() {
            output.push_str("No projects fetched\n");
        }

        output.push('\n');
        output.push_str(&format!("Total: {} issues", report.total_records));
        if report.failed_projects > 0 {
            output.push_str(&format!(
                ", {} project(s) stopped early",
                report.failed_projects
            ));
        }
        output.push('\n');
        output
    }

    fn format_transform_human(&self, summary: &TransformSummary) -> String {
        let mut output = String::new();

        output.push_str("Transform Summary\n");
        output.push_str(RULE);
        output.push_str("\n\n");

        if summary.files.is_empty() {
            output.push_str("No issue files found\n");
        }

        for file in &summary.files {
            output.push_str(&format!(
                "  {:<12} {} records",
                file.project, file.records
            ));
            if file.skipped > 0 {
                output.push_str(&format!(", {} skipped", file.skipped));
            }
            output.push('\n');
        }

        output.push('\n');
        output.push_str(&format!(
            "Wrote {} records to {}",
            summary.records,
            summary.output.display()
        ));
        if summary.skipped > 0 {
            output.push_str(&format!(" ({} lines skipped)", summary.skipped));
        }
        output.push('\n');
        output
    }
}
