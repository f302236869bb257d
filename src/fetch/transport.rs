//! Search transport
//!
//! [`SearchTransport`] performs exactly one search attempt and hands back the
//! raw response body. Retrying and decoding live in the fetcher, so tests can
//! swap in a scripted transport without touching the network.

use super::error::TransportError;
use super::types::SearchRequest;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Maximum number of body characters kept in a status error
const BODY_PREVIEW_CHARS: usize = 100;

/// One-shot search call against the remote endpoint
pub trait SearchTransport {
    /// Sends `request` once and returns the body of an HTTP 200 response
    fn search(&self, request: &SearchRequest) -> Result<String, TransportError>;
}

impl<T: SearchTransport + ?Sized> SearchTransport for &T {
    fn search(&self, request: &SearchRequest) -> Result<String, TransportError> {
        (**self).search(request)
    }
}

/// Blocking HTTP transport that POSTs JSON search requests
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: String,
    http_client: Client,
}

impl HttpTransport {
    /// Creates a transport for `endpoint` with the given request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Client {
                message: e.to_string(),
            })?;

        Ok(Self {
            endpoint: endpoint.into(),
            http_client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SearchTransport for HttpTransport {
    fn search(&self, request: &SearchRequest) -> Result<String, TransportError> {
        debug!(
            "POST {} startAt={} maxResults={}",
            self.endpoint, request.start_at, request.max_results
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .map_err(|e| TransportError::Network {
                message: describe_reqwest_error(&e),
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| TransportError::Network {
            message: format!("Failed to read response body: {}", e),
        })?;

        if status != StatusCode::OK {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body_preview: preview(&body),
            });
        }

        Ok(body)
    }
}

fn describe_reqwest_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("Request timed out: {}", e)
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        format!("Request failed: {}", e)
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let body = "é".repeat(150);
        let short = preview(&body);
        assert_eq!(short.chars().count(), BODY_PREVIEW_CHARS);
    }

    #[test]
    fn test_preview_keeps_short_bodies() {
        assert_eq!(preview("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_new_transport() {
        let transport =
            HttpTransport::new("http://localhost:9/search", Duration::from_secs(1)).unwrap();
        assert_eq!(transport.endpoint(), "http://localhost:9/search");
    }
}
