//! issuecorpus - resumable issue-tracker harvester and training-corpus builder
//!
//! The crate has two stages. The fetch stage pages through an issue tracker's
//! search API for a set of projects, appends every issue to a per-project JSONL
//! file and records a checkpoint after each page so an interrupted run resumes
//! where it stopped. The transform stage reads those files and writes a single
//! corpus file of flat records, each carrying derived prompt strings.
//!
//! # Example Usage
//!
//! ```no_run
//! use issuecorpus::{Fetcher, HttpTransport, IssueCorpusConfig, ProjectKey, Transformer};
//!
//! fn run() -> anyhow::Result<()> {
//!     let config = IssueCorpusConfig::default();
//!     let transport = HttpTransport::new(config.api_url.clone(), config.fetch.request_timeout)?;
//!     let fetcher = Fetcher::new(transport, config.layout(), config.fetch.clone());
//!
//!     let projects = vec![ProjectKey::parse("SPARK")?];
//!     for outcome in fetcher.fetch_all(&projects, 200)? {
//!         println!("{}: {} issues ({})", outcome.project, outcome.records, outcome.stop);
//!     }
//!
//!     let layout = config.layout();
//!     Transformer::default().transform_dir(layout.data_dir(), &layout.default_corpus_path())?;
//!     Ok(())
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`fetch`]: search requests, retry, transport and the paging loop
//! - [`checkpoint`]: per-project resume offsets
//! - [`transform`]: normalization and derived prompts
//! - [`layout`]: file naming for issue, checkpoint and corpus files

pub mod checkpoint;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod layout;
pub mod project;
pub mod transform;
pub mod util;

pub use checkpoint::{CheckpointError, CheckpointStore};
pub use config::{ConfigError, FetchSettings, IssueCorpusConfig};
pub use fetch::{
    FetchError, FetchOutcome, Fetcher, HttpTransport, RetryPolicy, SearchTransport, StopReason,
    TransportError,
};
pub use layout::DataLayout;
pub use project::{ProjectKey, ProjectKeyError};
pub use transform::{NormalizedRecord, PromptSet, PromptTemplate, TransformSummary, Transformer};
pub use util::{config_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_issuecorpus() {
        assert_eq!(NAME, "issuecorpus");
    }
}
