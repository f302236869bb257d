//! Fetch error types
//!
//! Transport failures are per-attempt and always retryable. `FetchError` only
//! covers local state (issue files, checkpoints) and aborts the whole run.

use crate::checkpoint::CheckpointError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single search attempt
#[derive(Debug, Error)]
pub enum TransportError {
    /// The endpoint answered with something other than HTTP 200
    #[error("HTTP {status}: {body_preview}")]
    Status { status: u16, body_preview: String },

    /// The request never produced a response (DNS, connect, timeout, body read)
    #[error("Network error: {message}")]
    Network { message: String },

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {message}")]
    Client { message: String },
}

/// Errors that abort a fetch run
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    #[error("Failed to append issues to {path}: {source}")]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
