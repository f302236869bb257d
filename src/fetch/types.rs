//! Search API request and response payloads

use crate::project::ProjectKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of one paged search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub jql: String,
    pub start_at: u64,
    pub max_results: u64,
    pub fields: Vec<String>,
}

impl SearchRequest {
    /// Builds the newest-first page request for `project` starting at `start_at`
    pub fn page(project: &ProjectKey, start_at: u64, max_results: u64, fields: &[String]) -> Self {
        Self {
            jql: newest_first_query(project),
            start_at,
            max_results,
            fields: fields.to_vec(),
        }
    }
}

/// Query selecting every issue of `project`, newest first
pub fn newest_first_query(project: &ProjectKey) -> String {
    format!("project={} ORDER BY created DESC", project)
}

/// Decoded search response
///
/// Issues are kept as opaque JSON so the fetcher stores exactly what the
/// remote returned.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub issues: Option<Vec<Value>>,

    #[serde(default)]
    pub error_messages: Option<Vec<String>>,
}

impl SearchResponse {
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let project = ProjectKey::parse("HADOOP").unwrap();
        let fields = vec!["summary".to_string(), "comment".to_string()];
        let request = SearchRequest::page(&project, 50, 50, &fields);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "jql": "project=HADOOP ORDER BY created DESC",
                "startAt": 50,
                "maxResults": 50,
                "fields": ["summary", "comment"],
            })
        );
    }

    #[test]
    fn test_parse_issues() {
        let response =
            SearchResponse::parse(r#"{"startAt":0,"total":2,"issues":[{"key":"A-1"},{"key":"A-2"}]}"#)
                .unwrap();
        assert_eq!(response.issues.unwrap().len(), 2);
        assert!(response.error_messages.is_none());
    }

    #[test]
    fn test_parse_error_messages() {
        let response =
            SearchResponse::parse(r#"{"errorMessages":["The value 'NOPE' does not exist"],"errors":{}}"#)
                .unwrap();
        assert!(response.issues.is_none());
        assert_eq!(response.error_messages.unwrap().len(), 1);
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(SearchResponse::parse("[1, 2, 3]").is_err());
        assert!(SearchResponse::parse("<html>").is_err());
    }
}
