//! Fetch stage: paged search requests persisted to per-project issue files
//!
//! - [`transport`]: one-shot HTTP search call behind the [`SearchTransport`] trait
//! - [`retry`]: linear-backoff retry around a single call
//! - [`sink`]: append-only JSONL issue files
//! - [`fetcher`]: the checkpointed pagination loop

pub mod error;
pub mod fetcher;
pub mod retry;
pub mod sink;
pub mod transport;
pub mod types;

pub use error::{FetchError, TransportError};
pub use fetcher::{FetchOutcome, Fetcher, StopReason};
pub use retry::RetryPolicy;
pub use sink::IssueSink;
pub use transport::{HttpTransport, SearchTransport};
pub use types::{SearchRequest, SearchResponse};
