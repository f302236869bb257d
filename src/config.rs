//! Configuration management for issuecorpus
//!
//! Settings are loaded from environment variables with sensible defaults. Paging,
//! retry and pacing parameters are fixed properties of the tool and live in
//! [`FetchSettings`]; they are passed into the fetcher as a value rather than
//! read from globals.
//!
//! # Environment Variables
//!
//! - `ISSUECORPUS_API_URL`: search endpoint - default: Apache JIRA `/rest/api/latest/search`
//! - `ISSUECORPUS_DATA_DIR`: issue files and corpus directory - default: "data"
//! - `ISSUECORPUS_CHECKPOINT_DIR`: checkpoint directory - default: "."
//! - `ISSUECORPUS_LOG_LEVEL`: logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use issuecorpus::IssueCorpusConfig;
//!
//! let config = IssueCorpusConfig::default();
//! config.validate().expect("Invalid configuration");
//! println!("{}", config);
//! ```

use crate::layout::DataLayout;
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://issues.apache.org/jira/rest/api/latest/search";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_CHECKPOINT_DIR: &str = ".";
const DEFAULT_LOG_LEVEL: &str = "info";

const PAGE_SIZE: u64 = 50;
const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_UNIT: Duration = Duration::from_secs(2);
const PAGE_DELAY: Duration = Duration::from_secs(2);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const ISSUE_FIELDS: [&str; 5] = ["summary", "description", "created", "updated", "comment"];

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Paging, retry and pacing parameters of the fetch loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Issues requested per page; the offset advances by this much per page
    pub page_size: u64,

    /// Attempts per page before the project is abandoned
    pub max_attempts: u32,

    /// Backoff after failed attempt `n` is `backoff_unit * n`
    pub backoff_unit: Duration,

    /// Pause after each successfully stored page
    pub page_delay: Duration,

    pub request_timeout: Duration,

    /// Issue fields requested from the search endpoint
    pub fields: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            max_attempts: MAX_ATTEMPTS,
            backoff_unit: BACKOFF_UNIT,
            page_delay: PAGE_DELAY,
            request_timeout: REQUEST_TIMEOUT,
            fields: ISSUE_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Main configuration structure for issuecorpus
#[derive(Debug, Clone)]
pub struct IssueCorpusConfig {
    /// Search endpoint receiving POSTed queries
    pub api_url: String,

    /// Directory holding `<project>_issues.jsonl` files and the default corpus
    pub data_dir: PathBuf,

    /// Directory holding `checkpoint_<PROJECT>.json` files
    pub checkpoint_dir: PathBuf,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    pub fetch: FetchSettings,
}

impl Default for IssueCorpusConfig {
    /// Loads configuration from `ISSUECORPUS_*` environment variables
    fn default() -> Self {
        let api_url = env::var("ISSUECORPUS_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let data_dir = env::var("ISSUECORPUS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));

        let checkpoint_dir = env::var("ISSUECORPUS_CHECKPOINT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CHECKPOINT_DIR));

        let log_level = env::var("ISSUECORPUS_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            api_url,
            data_dir,
            checkpoint_dir,
            log_level,
            fetch: FetchSettings::default(),
        }
    }
}

impl IssueCorpusConfig {
    /// Validates the configuration
    ///
    /// Checks that the endpoint is an http(s) URL and the log level is known.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationFailed(format!(
                "API URL must start with http:// or https://, got '{}'",
                self.api_url
            )));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn layout(&self) -> DataLayout {
        DataLayout::new(&self.data_dir, &self.checkpoint_dir)
    }

    /// Converts configuration to a display map for output formatting
    pub fn to_display_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();

        map.insert("api_url".to_string(), self.api_url.clone());
        map.insert("data_dir".to_string(), self.data_dir.display().to_string());
        map.insert(
            "checkpoint_dir".to_string(),
            self.checkpoint_dir.display().to_string(),
        );
        map.insert("log_level".to_string(), self.log_level.clone());
        map.insert("page_size".to_string(), self.fetch.page_size.to_string());
        map.insert(
            "max_attempts".to_string(),
            self.fetch.max_attempts.to_string(),
        );
        map.insert(
            "backoff_unit_secs".to_string(),
            self.fetch.backoff_unit.as_secs().to_string(),
        );
        map.insert(
            "page_delay_secs".to_string(),
            self.fetch.page_delay.as_secs().to_string(),
        );
        map.insert(
            "request_timeout_secs".to_string(),
            self.fetch.request_timeout.as_secs().to_string(),
        );
        map.insert("fields".to_string(), self.fetch.fields.join(","));

        map
    }
}

impl fmt::Display for IssueCorpusConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "issuecorpus Configuration:")?;
        writeln!(f, "  API URL: {}", self.api_url)?;
        writeln!(f, "  Data Dir: {}", self.data_dir.display())?;
        writeln!(f, "  Checkpoint Dir: {}", self.checkpoint_dir.display())?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Page Size: {}", self.fetch.page_size)?;
        writeln!(f, "  Max Attempts: {}", self.fetch.max_attempts)?;
        writeln!(f, "  Backoff Unit: {}s", self.fetch.backoff_unit.as_secs())?;
        writeln!(f, "  Page Delay: {}s", self.fetch.page_delay.as_secs())?;
        writeln!(f, "  Request Timeout: {}s", self.fetch.request_timeout.as_secs())?;
        writeln!(f, "  Fields: {}", self.fetch.fields.join(", "))?;
        Ok(())
    }
}
