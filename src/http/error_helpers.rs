//! Error classification for HTTP responses and reqwest failures.
//!
//! Every failure of the transport layer goes through this module exactly
//! once, so the rest of the crate only ever sees a [`LiveHintError`].

use crate::errors::LiveHintError;
use reqwest::Response;
use std::time::Duration;
use tracing::warn;

/// Maximum characters to include from error body in context messages
const ERROR_BODY_PREVIEW_LENGTH: usize = 200;

/// Checks if an HTTP response is successful, returning it if so or an
/// [`LiveHintError::Http`] otherwise.
///
/// # Errors
///
/// Returns an error with status code, reason phrase and body preview on
/// non-success status.
pub async fn check_response(response: Response, label: &str) -> Result<Response, LiveHintError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        let error = read_error_with_context(response).await;
        warn!("{label} failed: {error}");
        Err(error)
    }
}

/// Reads an error response body and creates a [`LiveHintError::Http`].
///
/// If the body cannot be read, the body preview describes the read failure
/// instead; the status is what matters.
pub async fn read_error_with_context(response: Response) -> LiveHintError {
    let status = response.status();
    let reason = status.canonical_reason().unwrap_or("Unknown Status").to_string();

    let body = response
        .text()
        .await
        .unwrap_or_else(|e| format!("Failed to read error body: {}", e));

    LiveHintError::Http {
        status_code: status.as_u16(),
        reason,
        body: truncate_for_context(&body, ERROR_BODY_PREVIEW_LENGTH),
    }
}

/// Maps a reqwest failure onto the error taxonomy and logs one diagnostic line.
///
/// Checked in priority order: timeout, connection, request, then the
/// catch-all. Status codes never reach here; [`check_response`] owns them.
pub fn classify_reqwest_error(
    error: reqwest::Error,
    label: &str,
    timeout: Option<Duration>,
) -> LiveHintError {
    let classified = if error.is_timeout() {
        match timeout {
            Some(t) => LiveHintError::Timeout(format!("{label} after {t:?}: {error}")),
            None => LiveHintError::Timeout(format!("{label}: {error}")),
        }
    } else if error.is_connect() {
        LiveHintError::Connection(format!("{label}: {error}"))
    } else if error.is_builder()
        || error.is_request()
        || error.is_body()
        || error.is_decode()
        || error.is_redirect()
    {
        LiveHintError::Request(format!("{label}: {error}"))
    } else {
        LiveHintError::Unexpected(format!("{label}: {error}"))
    };

    warn!("{label} failed: {classified}");
    classified
}

/// Formats JSON parsing context by including a preview of the raw JSON.
pub fn format_json_parse_error(json_str: &str, error: &serde_json::Error) -> String {
    let preview = truncate_for_context(json_str, ERROR_BODY_PREVIEW_LENGTH);
    format!("JSON parse error: {} | Context: {}", error, preview)
}

/// Truncates a string to specified length, adding "..." if truncated.
///
/// Uses character-boundary-aware slicing to prevent panics on multi-byte UTF-8 characters.
pub fn truncate_for_context(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let truncate_at = s
            .char_indices()
            .take_while(|(i, c)| i + c.len_utf8() <= max_len)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &s[..truncate_at])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_context_short_string() {
        assert_eq!(truncate_for_context("Short", 100), "Short");
    }

    #[test]
    fn test_truncate_for_context_long_string() {
        let long_str = "a".repeat(300);
        let result = truncate_for_context(&long_str, 200);
        assert_eq!(result.len(), 203); // 200 + "..."
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_truncate_for_context_utf8_boundary() {
        // 198 + 4 = 202 bytes; the emoji must not be split
        let emoji_str = "x".repeat(198) + "🎉";
        let result = truncate_for_context(&emoji_str, 200);
        assert_eq!(result.len(), 201);
        assert!(!result.contains("🎉"));
    }

    #[test]
    fn test_format_json_parse_error() {
        let json = r#"{"invalid": }"#;
        let err = serde_json::from_str::<serde_json::Value>(json).unwrap_err();
        let result = format_json_parse_error(json, &err);

        assert!(result.contains("JSON parse error"));
        assert!(result.contains(r#"{"invalid": }"#));
    }

    #[tokio::test]
    async fn test_classify_builder_error_as_request() {
        let err = reqwest::Client::new()
            .get("not a url")
            .send()
            .await
            .unwrap_err();
        let classified = classify_reqwest_error(err, "GET /api/problem-info", None);
        assert!(
            matches!(classified, LiveHintError::Request(_)),
            "got {classified:?}"
        );
    }

    #[tokio::test]
    async fn test_classify_refused_connection() {
        // Bind then drop to get a port with nothing listening on it.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = reqwest::Client::new()
            .get(format!("http://{addr}/api/problem-info"))
            .send()
            .await
            .unwrap_err();
        let classified = classify_reqwest_error(err, "GET /api/problem-info", None);
        assert!(
            matches!(classified, LiveHintError::Connection(_)),
            "got {classified:?}"
        );
    }
}
