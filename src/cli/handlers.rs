//! Subcommand handlers
//!
//! Each handler returns the process exit code: `0` on success, `1` when the run
//! could not be carried out (bad configuration, unreadable state, filesystem
//! failures). A project that stops because of remote or retry failures does not
//! fail the run; it is reported in the summary instead.

use super::commands::{ConfigArgs, FetchArgs, TransformArgs};
use super::output::{OutputFormat, OutputFormatter};
use crate::config::IssueCorpusConfig;
use crate::fetch::{Fetcher, HttpTransport};
use crate::transform::Transformer;
use anyhow::{Context, Result};
use tracing::{error, info, warn};

pub fn handle_fetch(args: &FetchArgs) -> i32 {
    match run_fetch(args, IssueCorpusConfig::default()) {
        Ok(()) => 0,
        Err(e) => {
            error!("Fetch failed: {:#}", e);
            1
        }
    }
}

pub fn handle_transform(args: &TransformArgs) -> i32 {
    match run_transform(args, IssueCorpusConfig::default()) {
        Ok(()) => 0,
        Err(e) => {
            error!("Transform failed: {:#}", e);
            1
        }
    }
}

pub fn handle_config(args: &ConfigArgs) -> i32 {
    let config = IssueCorpusConfig::default();
    let formatter = OutputFormatter::new(OutputFormat::from(args.format));

    match formatter.format_config(&config) {
        Ok(output) => {
            print!("{}", ensure_trailing_newline(output));
            if let Err(e) = config.validate() {
                warn!("{}", e);
            }
            0
        }
        Err(e) => {
            error!("Failed to format configuration: {:#}", e);
            1
        }
    }
}

fn run_fetch(args: &FetchArgs, config: IssueCorpusConfig) -> Result<()> {
    config.validate().context("Invalid configuration")?;

    let transport = HttpTransport::new(config.api_url.clone(), config.fetch.request_timeout)
        .context("Failed to create HTTP client")?;
    let fetcher = Fetcher::new(transport, config.layout(), config.fetch.clone());

    info!(
        "Fetching {} project(s) from {} (max {} issues each)",
        args.projects.len(),
        config.api_url,
        args.max_issues
    );

    let outcomes = fetcher
        .fetch_all(&args.projects, args.max_issues)
        .context("Fetch run aborted")?;

    for outcome in outcomes.iter().filter(|o| o.stop.is_failure()) {
        warn!("{} stopped early: {}", outcome.project, outcome.stop);
    }

    let output = OutputFormatter::new(OutputFormat::from(args.format)).format_fetch(&outcomes)?;
    print!("{}", ensure_trailing_newline(output));
    Ok(())
}

fn run_transform(args: &TransformArgs, config: IssueCorpusConfig) -> Result<()> {
    let layout = config.layout();
    let input_dir = args
        .in_folder
        .clone()
        .unwrap_or_else(|| layout.data_dir().to_path_buf());
    let output_path = args
        .out
        .clone()
        .unwrap_or_else(|| layout.default_corpus_path());

    info!(
        "Transforming issues from {} into {}",
        input_dir.display(),
        output_path.display()
    );

    let summary = Transformer::default()
        .transform_dir(&input_dir, &output_path)
        .context("Transform run aborted")?;

    let output =
        OutputFormatter::new(OutputFormat::from(args.format)).format_transform(&summary)?;
    print!("{}", ensure_trailing_newline(output));
    Ok(())
}

fn ensure_trailing_newline(mut output: String) -> String {
    if !output.ends_with('\n') {
        output.push('\n');
    }
    output
}
