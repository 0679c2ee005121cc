//! Endpoint error types.

use thiserror::Error;

/// Format an error response body for display, extracting the message from JSON if present.
///
/// Handles common patterns:
/// - `{"error": {"message": "..."}}` → extracts message
/// - `{"detail": "..."}` → extracts detail (FastAPI services)
/// - Plain text bodies → returned trimmed
#[must_use]
pub fn format_error_body(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return "(empty body)".to_string();
    }

    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body)
        && let Some(msg) = extract_error_message(&json)
    {
        return msg;
    }

    body.to_string()
}

/// Extract user-friendly message from JSON error response.
fn extract_error_message(json: &serde_json::Value) -> Option<String> {
    // {"error": {"message": "...", "code": "..."}}
    // {"error": "..."}
    // {"message": "..."}
    // {"detail": "..."}
    if let Some(error_obj) = json.get("error") {
        if let Some(msg) = error_obj.get("message").and_then(|v| v.as_str()) {
            return Some(match error_obj.get("code").and_then(|v| v.as_str()) {
                Some(code) => format!("{msg} (code: {code})"),
                None => msg.to_string(),
            });
        }

        if let Some(msg) = error_obj.as_str() {
            return Some(msg.to_string());
        }
    }

    ["message", "detail"]
        .iter()
        .find_map(|key| json.get(*key)?.as_str().map(String::from))
}

/// Failure of a single endpoint call.
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("HTTP {status}: {}", format_error_body(body))]
    Status { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse response: {message}")]
    Decode { message: String, body: String },

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Invalid endpoint URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to build request: {0}")]
    Payload(String),
}

impl EndpointError {
    /// HTTP status code, if the server answered with a non-success status.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_nested_error() {
        let body = r#"{"error":{"message":"Model not loaded","code":"model_missing"}}"#;
        assert_eq!(
            format_error_body(body),
            "Model not loaded (code: model_missing)"
        );
    }

    #[test]
    fn test_format_simple_error() {
        assert_eq!(format_error_body(r#"{"error":"Invalid audio"}"#), "Invalid audio");
    }

    #[test]
    fn test_format_top_level_message() {
        assert_eq!(
            format_error_body(r#"{"message":"Something went wrong"}"#),
            "Something went wrong"
        );
    }

    #[test]
    fn test_format_fastapi_detail() {
        assert_eq!(format_error_body(r#"{"detail":"Not Found"}"#), "Not Found");
    }

    #[test]
    fn test_format_plain_text() {
        assert_eq!(
            format_error_body("Internal Server Error\n"),
            "Internal Server Error"
        );
    }

    #[test]
    fn test_format_empty_body() {
        assert_eq!(format_error_body("  "), "(empty body)");
    }

    #[test]
    fn test_status_display() {
        let err = EndpointError::Status {
            status: 503,
            body: r#"{"detail":"busy"}"#.into(),
        };
        assert_eq!(err.to_string(), "HTTP 503: busy");
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn test_status_absent_for_decode() {
        let err = EndpointError::Decode {
            message: "expected value".into(),
            body: "oops".into(),
        };
        assert_eq!(err.status(), None);
    }
}
