//! Resumable paginated fetch loop
//!
//! For one project the loop resumes at the saved checkpoint, requests pages of
//! `page_size` issues newest first, appends every page to the project's issue
//! file and then advances the checkpoint. It stops when the ceiling is reached,
//! when the remote has no more issues, when the remote reports an error, or
//! when a page request fails after all retries.
//!
//! The append and the checkpoint save are two separate writes. A crash between
//! them re-fetches that page on the next run; crash-free runs never duplicate
//! or skip a page.

use super::error::FetchError;
use super::retry::RetryPolicy;
use super::sink::IssueSink;
use super::transport::SearchTransport;
use super::types::{SearchRequest, SearchResponse};
use crate::checkpoint::CheckpointStore;
use crate::config::FetchSettings;
use crate::layout::DataLayout;
use crate::project::ProjectKey;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::thread;
use tracing::{debug, info, warn};

/// Why the loop for a project ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum StopReason {
    /// The next offset is at or beyond the ceiling
    CeilingReached,
    /// The remote returned an empty page
    NoMoreIssues,
    /// The remote answered with `errorMessages`
    RemoteError(Vec<String>),
    /// Every attempt for a page failed
    RequestFailed,
    /// HTTP 200 whose body is not a search response
    MalformedResponse(String),
}

impl StopReason {
    /// Whether the project ended because of a failure rather than completion
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            StopReason::RemoteError(_) | StopReason::RequestFailed | StopReason::MalformedResponse(_)
        )
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::CeilingReached => write!(f, "ceiling reached"),
            StopReason::NoMoreIssues => write!(f, "no more issues"),
            StopReason::RemoteError(messages) => {
                write!(f, "remote error: {}", messages.join("; "))
            }
            StopReason::RequestFailed => write!(f, "request failed after retries"),
            StopReason::MalformedResponse(detail) => write!(f, "malformed response: {}", detail),
        }
    }
}

/// Result of running the loop for one project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchOutcome {
    pub project: String,
    pub start_offset: u64,
    pub next_offset: u64,
    pub pages: u64,
    pub records: u64,
    pub issues_file: PathBuf,
    pub stop: StopReason,
}

pub struct Fetcher<T> {
    transport: T,
    layout: DataLayout,
    checkpoints: CheckpointStore,
    settings: FetchSettings,
    retry: RetryPolicy,
}

impl<T: SearchTransport> Fetcher<T> {
    pub fn new(transport: T, layout: DataLayout, settings: FetchSettings) -> Self {
        let checkpoints = CheckpointStore::new(layout.checkpoint_dir());
        let retry = RetryPolicy::new(settings.max_attempts, settings.backoff_unit);

        Self {
            transport,
            layout,
            checkpoints,
            settings,
            retry,
        }
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    pub fn checkpoints(&self) -> &CheckpointStore {
        &self.checkpoints
    }

    /// Fetches pages for `project` until the ceiling or a stop condition
    ///
    /// Remote and network failures end this project only and are reported in
    /// the returned [`StopReason`]. Local write failures abort with an error.
    pub fn fetch_project(
        &self,
        project: &ProjectKey,
        ceiling: u64,
    ) -> Result<FetchOutcome, FetchError> {
        let page_size = self.settings.page_size;
        let sink = IssueSink::new(self.layout.issues_path(project));

        let start_offset = self.checkpoints.load(project)?;
        let mut offset = start_offset;
        let mut pages = 0u64;
        let mut records = 0u64;

        if start_offset > 0 {
            info!("Resuming {} at offset {}", project, start_offset);
        }

        let stop = loop {
            if offset >= ceiling {
                break StopReason::CeilingReached;
            }

            let request = SearchRequest::page(project, offset, page_size, &self.settings.fields);
            info!(
                "Fetching {} issues {} - {}",
                project,
                offset,
                offset + page_size
            );

            let Some(body) = self.retry.run(|_| self.transport.search(&request)) else {
                warn!("Failed to fetch {}. Stopping this project.", project);
                break StopReason::RequestFailed;
            };

            let response = match SearchResponse::parse(&body) {
                Ok(response) => response,
                Err(e) => {
                    warn!("Unreadable search response for {}: {}", project, e);
                    break StopReason::MalformedResponse(e.to_string());
                }
            };

            if let Some(messages) = response.error_messages {
                warn!("Error for {}: {:?}", project, messages);
                break StopReason::RemoteError(messages);
            }

            let issues = response.issues.unwrap_or_default();
            if issues.is_empty() {
                info!("No more issues found for {}.", project);
                break StopReason::NoMoreIssues;
            }

            let written = sink.append(&issues)?;
            records += written as u64;
            pages += 1;

            offset += page_size;
            self.checkpoints.save(project, offset)?;
            debug!(
                "{}: wrote {} issues, checkpoint now {}",
                project, written, offset
            );

            thread::sleep(self.settings.page_delay);
        };

        info!(
            "Done fetching {} issues for {} ({})",
            records, project, stop
        );

        Ok(FetchOutcome {
            project: project.to_string(),
            start_offset,
            next_offset: offset,
            pages,
            records,
            issues_file: sink.path().to_path_buf(),
            stop,
        })
    }

    /// Runs [`fetch_project`](Self::fetch_project) for each project in order
    pub fn fetch_all(
        &self,
        projects: &[ProjectKey],
        ceiling: u64,
    ) -> Result<Vec<FetchOutcome>, FetchError> {
        projects
            .iter()
            .map(|project| self.fetch_project(project, ceiling))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::error::TransportError;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Transport that replays queued results and records every request
    #[derive(Default)]
    struct ScriptedTransport {
        responses: RefCell<VecDeque<Result<String, TransportError>>>,
        requests: RefCell<Vec<SearchRequest>>,
    }

    impl ScriptedTransport {
        fn push_ok(&self, body: serde_json::Value) -> &Self {
            self.responses.borrow_mut().push_back(Ok(body.to_string()));
            self
        }

        fn push_raw(&self, body: &str) -> &Self {
            self.responses.borrow_mut().push_back(Ok(body.to_string()));
            self
        }

        fn push_status(&self, status: u16) -> &Self {
            self.responses
                .borrow_mut()
                .push_back(Err(TransportError::Status {
                    status,
                    body_preview: String::new(),
                }));
            self
        }

        fn start_offsets(&self) -> Vec<u64> {
            self.requests.borrow().iter().map(|r| r.start_at).collect()
        }

        fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl SearchTransport for ScriptedTransport {
        fn search(&self, request: &SearchRequest) -> Result<String, TransportError> {
            self.requests.borrow_mut().push(request.clone());
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(json!({ "issues": [] }).to_string()))
        }
    }

    fn settings(page_size: u64) -> FetchSettings {
        FetchSettings {
            page_size,
            max_attempts: 3,
            backoff_unit: Duration::ZERO,
            page_delay: Duration::ZERO,
            ..FetchSettings::default()
        }
    }

    fn page(keys: &[&str]) -> serde_json::Value {
        let issues: Vec<_> = keys.iter().map(|k| json!({ "key": k })).collect();
        json!({ "startAt": 0, "issues": issues })
    }

    fn key(s: &str) -> ProjectKey {
        ProjectKey::parse(s).unwrap()
    }

    fn line_count(path: &std::path::Path) -> usize {
        fs::read_to_string(path)
            .map(|c| c.lines().count())
            .unwrap_or(0)
    }

    #[test]
    fn test_zero_ceiling_makes_no_requests() {
        let dir = TempDir::new().unwrap();
        let transport = ScriptedTransport::default();
        let fetcher = Fetcher::new(&transport, DataLayout::new(dir.path(), dir.path()), settings(50));

        let outcome = fetcher.fetch_project(&key("HADOOP"), 0).unwrap();

        assert_eq!(transport.request_count(), 0);
        assert_eq!(outcome.stop, StopReason::CeilingReached);
        assert_eq!(outcome.records, 0);
        assert!(!outcome.issues_file.exists());
    }

    #[test]
    fn test_fetches_until_ceiling_and_saves_checkpoint() {
        let dir = TempDir::new().unwrap();
        let transport = ScriptedTransport::default();
        transport.push_ok(page(&["H-4", "H-3"])).push_ok(page(&["H-2", "H-1"]));
        let fetcher = Fetcher::new(&transport, DataLayout::new(dir.path(), dir.path()), settings(2));

        let outcome = fetcher.fetch_project(&key("HADOOP"), 4).unwrap();

        assert_eq!(transport.start_offsets(), vec![0, 2]);
        assert_eq!(outcome.stop, StopReason::CeilingReached);
        assert_eq!(outcome.pages, 2);
        assert_eq!(outcome.records, 4);
        assert_eq!(outcome.next_offset, 4);
        assert_eq!(fetcher.checkpoints().load(&key("HADOOP")).unwrap(), 4);
        assert_eq!(line_count(&dir.path().join("hadoop_issues.jsonl")), 4);
    }

    #[test]
    fn test_requests_use_newest_first_query_and_field_list() {
        let dir = TempDir::new().unwrap();
        let transport = ScriptedTransport::default();
        transport.push_ok(page(&["S-1"]));
        let fetcher = Fetcher::new(&transport, DataLayout::new(dir.path(), dir.path()), settings(50));

        fetcher.fetch_project(&key("SPARK"), 50).unwrap();

        let requests = transport.requests.borrow();
        assert_eq!(requests[0].jql, "project=SPARK ORDER BY created DESC");
        assert_eq!(requests[0].max_results, 50);
        assert_eq!(
            requests[0].fields,
            vec!["summary", "description", "created", "updated", "comment"]
        );
    }

    #[test]
    fn test_resumes_from_saved_checkpoint() {
        let dir = TempDir::new().unwrap();
        let layout = DataLayout::new(dir.path(), dir.path());
        CheckpointStore::new(dir.path())
            .save(&key("HIVE"), 100)
            .unwrap();

        let transport = ScriptedTransport::default();
        transport.push_ok(page(&["V-1"])).push_ok(page(&["V-2"]));
        let fetcher = Fetcher::new(&transport, layout, settings(50));

        let outcome = fetcher.fetch_project(&key("HIVE"), 200).unwrap();

        assert_eq!(transport.start_offsets(), vec![100, 150]);
        assert_eq!(outcome.start_offset, 100);
        assert_eq!(outcome.next_offset, 200);
    }

    #[test]
    fn test_repeated_runs_continue_where_previous_run_stopped() {
        let dir = TempDir::new().unwrap();

        let first = ScriptedTransport::default();
        first.push_ok(page(&["A-4", "A-3"]));
        Fetcher::new(&first, DataLayout::new(dir.path(), dir.path()), settings(2))
            .fetch_project(&key("A"), 2)
            .unwrap();

        let second = ScriptedTransport::default();
        second.push_ok(page(&["A-2", "A-1"]));
        let outcome = Fetcher::new(&second, DataLayout::new(dir.path(), dir.path()), settings(2))
            .fetch_project(&key("A"), 4)
            .unwrap();

        assert_eq!(second.start_offsets(), vec![2]);
        assert_eq!(outcome.next_offset, 4);
        assert_eq!(line_count(&dir.path().join("a_issues.jsonl")), 4);
    }

    #[test]
    fn test_empty_page_stops_without_advancing_checkpoint() {
        let dir = TempDir::new().unwrap();
        let transport = ScriptedTransport::default();
        transport
            .push_ok(page(&["H-1"]))
            .push_ok(json!({ "issues": [] }));
        let fetcher = Fetcher::new(&transport, DataLayout::new(dir.path(), dir.path()), settings(50));

        let outcome = fetcher.fetch_project(&key("HADOOP"), 1000).unwrap();

        assert_eq!(outcome.stop, StopReason::NoMoreIssues);
        assert_eq!(outcome.next_offset, 50);
        assert_eq!(fetcher.checkpoints().load(&key("HADOOP")).unwrap(), 50);
    }

    #[test]
    fn test_missing_issues_field_counts_as_empty() {
        let dir = TempDir::new().unwrap();
        let transport = ScriptedTransport::default();
        transport.push_ok(json!({ "startAt": 0, "total": 0 }));
        let fetcher = Fetcher::new(&transport, DataLayout::new(dir.path(), dir.path()), settings(50));

        let outcome = fetcher.fetch_project(&key("HADOOP"), 100).unwrap();
        assert_eq!(outcome.stop, StopReason::NoMoreIssues);
    }

    #[test]
    fn test_error_messages_stop_without_writing() {
        let dir = TempDir::new().unwrap();
        let transport = ScriptedTransport::default();
        transport.push_ok(json!({
            "errorMessages": ["The value 'NOPE' does not exist for the field 'project'."],
            "issues": [{ "key": "NOPE-1" }],
        }));
        let fetcher = Fetcher::new(&transport, DataLayout::new(dir.path(), dir.path()), settings(50));

        let outcome = fetcher.fetch_project(&key("NOPE"), 100).unwrap();

        assert!(matches!(outcome.stop, StopReason::RemoteError(ref m) if m.len() == 1));
        assert!(outcome.stop.is_failure());
        assert_eq!(outcome.records, 0);
        assert_eq!(transport.request_count(), 1);
        assert!(!dir.path().join("nope_issues.jsonl").exists());
        assert_eq!(fetcher.checkpoints().load(&key("NOPE")).unwrap(), 0);
    }

    #[test]
    fn test_exhausted_retries_stop_project() {
        let dir = TempDir::new().unwrap();
        let transport = ScriptedTransport::default();
        transport
            .push_ok(page(&["H-1"]))
            .push_status(500)
            .push_status(502)
            .push_status(429);
        let fetcher = Fetcher::new(&transport, DataLayout::new(dir.path(), dir.path()), settings(50));

        let outcome = fetcher.fetch_project(&key("HADOOP"), 1000).unwrap();

        assert_eq!(outcome.stop, StopReason::RequestFailed);
        assert_eq!(transport.request_count(), 4);
        assert_eq!(outcome.next_offset, 50);
        assert_eq!(fetcher.checkpoints().load(&key("HADOOP")).unwrap(), 50);
    }

    #[test]
    fn test_transient_failure_is_retried_with_same_offset() {
        let dir = TempDir::new().unwrap();
        let transport = ScriptedTransport::default();
        transport.push_status(503).push_ok(page(&["H-1"]));
        let fetcher = Fetcher::new(&transport, DataLayout::new(dir.path(), dir.path()), settings(50));

        let outcome = fetcher.fetch_project(&key("HADOOP"), 50).unwrap();

        assert_eq!(transport.start_offsets(), vec![0, 0]);
        assert_eq!(outcome.records, 1);
        assert_eq!(outcome.stop, StopReason::CeilingReached);
    }

    #[test]
    fn test_malformed_body_stops_project() {
        let dir = TempDir::new().unwrap();
        let transport = ScriptedTransport::default();
        transport.push_raw("<html>maintenance</html>");
        let fetcher = Fetcher::new(&transport, DataLayout::new(dir.path(), dir.path()), settings(50));

        let outcome = fetcher.fetch_project(&key("HADOOP"), 100).unwrap();

        assert!(matches!(outcome.stop, StopReason::MalformedResponse(_)));
        assert_eq!(transport.request_count(), 1);
    }

    #[test]
    fn test_last_page_may_overshoot_ceiling() {
        let dir = TempDir::new().unwrap();
        let transport = ScriptedTransport::default();
        transport.push_ok(page(&["H-1"])).push_ok(page(&["H-2"]));
        let fetcher = Fetcher::new(&transport, DataLayout::new(dir.path(), dir.path()), settings(50));

        let outcome = fetcher.fetch_project(&key("HADOOP"), 60).unwrap();

        assert_eq!(transport.start_offsets(), vec![0, 50]);
        assert_eq!(outcome.next_offset, 100);
    }

    #[test]
    fn test_offset_advances_by_page_size_on_short_page() {
        let dir = TempDir::new().unwrap();
        let transport = ScriptedTransport::default();
        transport.push_ok(page(&["H-1"]));
        let fetcher = Fetcher::new(&transport, DataLayout::new(dir.path(), dir.path()), settings(50));

        let outcome = fetcher.fetch_project(&key("HADOOP"), 50).unwrap();

        assert_eq!(outcome.records, 1);
        assert_eq!(outcome.next_offset, 50);
    }

    #[test]
    fn test_fetch_all_isolates_project_failures() {
        let dir = TempDir::new().unwrap();
        let transport = ScriptedTransport::default();
        transport
            .push_ok(json!({ "errorMessages": ["unknown project"] }))
            .push_ok(page(&["HIVE-1"]));
        let fetcher = Fetcher::new(&transport, DataLayout::new(dir.path(), dir.path()), settings(50));

        let outcomes = fetcher
            .fetch_all(&[key("BROKEN"), key("HIVE")], 50)
            .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(matches!(outcomes[0].stop, StopReason::RemoteError(_)));
        assert_eq!(outcomes[1].stop, StopReason::CeilingReached);
        assert_eq!(outcomes[1].records, 1);
    }

    #[test]
    fn test_stop_reason_display() {
        assert_eq!(StopReason::CeilingReached.to_string(), "ceiling reached");
        assert_eq!(
            StopReason::RemoteError(vec!["a".into(), "b".into()]).to_string(),
            "remote error: a; b"
        );
        assert!(!StopReason::NoMoreIssues.is_failure());
    }
}
