//! HTTP client for the remote RAG API
//!
//! One POST per tool invocation, no retries, no shared connection pool. A
//! fresh client is built for each call and dropped on every exit path, so
//! the configured timeout always applies to exactly one request.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::error;

/// Request body for both chat endpoints. Exactly these two fields.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

/// Response body shared by both chat endpoints.
///
/// The API makes no schema promises beyond field names: every field may be
/// absent, and absent reads as empty/zero. `language` is only ever set by
/// the universal endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RagResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub sql: Option<String>,
    #[serde(default)]
    pub markdown: Option<String>,
    #[serde(default)]
    pub needs_clarification: Option<String>,
    #[serde(default)]
    pub chunks_count: u64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl RagResponse {
    /// `answer`, treating an empty string as absent
    pub fn answer_text(&self) -> Option<&str> {
        non_empty(&self.answer)
    }

    /// `sql`, treating an empty string as absent
    pub fn sql_text(&self) -> Option<&str> {
        non_empty(&self.sql)
    }

    /// `markdown`, treating an empty string as absent
    pub fn markdown_text(&self) -> Option<&str> {
        non_empty(&self.markdown)
    }

    /// `needs_clarification`, treating an empty string as absent
    pub fn clarification_text(&self) -> Option<&str> {
        non_empty(&self.needs_clarification)
    }

    /// Language reported by the universal endpoint, `"unknown"` when absent
    pub fn language_or_unknown(&self) -> &str {
        non_empty(&self.language).unwrap_or("unknown")
    }

    /// Remote-reported failure message, preferring `error` over `message`
    pub fn failure_message(&self) -> Option<&str> {
        non_empty(&self.error).or_else(|| non_empty(&self.message))
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Classified failure of a single RAG API call.
#[derive(Debug, Error)]
pub enum RagCallError {
    #[error("cannot reach {url}")]
    Connect { url: String },

    #[error("no response within {timeout_secs} seconds")]
    Timeout { timeout_secs: f64 },

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Other(String),
}

impl RagCallError {
    /// User-facing text for the tool result.
    ///
    /// Deliberately less detailed than the stderr log: the caller gets a
    /// remediation hint, the operator gets the full picture on stderr.
    pub fn user_text(&self) -> String {
        match self {
            RagCallError::Connect { url } => format!(
                "Connection Error: Cannot reach RAG API at {}\n\n\
                 Please make sure the RAG API server is running and \
                 listening on that address, then try again.",
                url
            ),
            RagCallError::Timeout { timeout_secs } => format!(
                "Request Timeout: The RAG API did not respond within {} seconds.\n\n\
                 Try simplifying your question or increasing REQUEST_TIMEOUT.",
                timeout_secs
            ),
            RagCallError::Status { status, body } => {
                format!("HTTP Error {}: {}", status, body)
            }
            RagCallError::Other(message) => format!("Unexpected Error: {}", message),
        }
    }
}

/// POST `request` to `url` and await exactly one response.
pub async fn post_chat(
    url: &str,
    timeout: Duration,
    request: &ChatRequest,
) -> Result<RagResponse, RagCallError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| RagCallError::Other(e.to_string()))?;

    let response = match client.post(url).json(request).send().await {
        Ok(response) => response,
        Err(e) => return Err(classify_send_error(e, url, timeout)),
    };

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!("RAG API returned HTTP {} from {}", status.as_u16(), url);
        return Err(RagCallError::Status {
            status: status.as_u16(),
            body,
        });
    }

    match response.json::<RagResponse>().await {
        Ok(data) => Ok(data),
        Err(e) if e.is_timeout() => {
            error!("RAG API timed out reading response from {}", url);
            Err(RagCallError::Timeout {
                timeout_secs: timeout.as_secs_f64(),
            })
        }
        Err(e) => {
            error!("Failed to decode RAG API response from {}: {}", url, e);
            Err(RagCallError::Other(e.to_string()))
        }
    }
}

fn classify_send_error(e: reqwest::Error, url: &str, timeout: Duration) -> RagCallError {
    if e.is_timeout() {
        error!("RAG API timed out after {:?}: {}", timeout, url);
        RagCallError::Timeout {
            timeout_secs: timeout.as_secs_f64(),
        }
    } else if e.is_connect() {
        error!("Connection error to {}: {}", url, e);
        RagCallError::Connect {
            url: url.to_string(),
        }
    } else {
        error!("RAG API request to {} failed: {}", url, e);
        RagCallError::Other(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_request_serializes_exactly_two_fields() {
        let request = ChatRequest {
            session_id: "s-1".to_string(),
            message: "hi".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({"session_id": "s-1", "message": "hi"}));
    }

    #[test]
    fn test_response_defaults_when_fields_absent() {
        let data: RagResponse = serde_json::from_str("{}").unwrap();
        assert!(!data.ok);
        assert_eq!(data.chunks_count, 0);
        assert!(data.answer_text().is_none());
        assert!(data.failure_message().is_none());
        assert_eq!(data.language_or_unknown(), "unknown");
    }

    #[test]
    fn test_empty_strings_read_as_absent() {
        let data: RagResponse =
            serde_json::from_value(json!({"ok": true, "answer": "", "sql": ""})).unwrap();
        assert!(data.answer_text().is_none());
        assert!(data.sql_text().is_none());
    }

    #[test]
    fn test_failure_message_prefers_error_over_message() {
        let data: RagResponse =
            serde_json::from_value(json!({"error": "boom", "message": "other"})).unwrap();
        assert_eq!(data.failure_message(), Some("boom"));

        let data: RagResponse =
            serde_json::from_value(json!({"error": "", "message": "fallback"})).unwrap();
        assert_eq!(data.failure_message(), Some("fallback"));
    }

    #[test]
    fn test_user_text_names_the_failure() {
        let text = RagCallError::Connect {
            url: "http://localhost:8900/api/chat/rag".to_string(),
        }
        .user_text();
        assert!(text.contains("http://localhost:8900/api/chat/rag"));
        assert!(text.contains("running"));

        let text = RagCallError::Timeout { timeout_secs: 0.2 }.user_text();
        assert!(text.contains("0.2"));
        assert!(text.contains("REQUEST_TIMEOUT"));

        let text = RagCallError::Status {
            status: 503,
            body: "unavailable".to_string(),
        }
        .user_text();
        assert!(text.contains("503"));
        assert!(text.contains("unavailable"));
    }
}
