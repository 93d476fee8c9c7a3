//! Tracker error types
//!
//! Every failure a project operation can report. Errors are passed through
//! from the connection untouched; nothing here retries or recovers.

use reqwest::StatusCode;

/// Errors surfaced by tracker operations
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// The request could not be composed (bad base URL, path or header)
    #[error("invalid request {path}: {reason}")]
    Request { path: String, reason: String },

    /// Connectivity, TLS or timeout failure
    #[error("failed to send request: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API request failed: {status}{}", format_detail(.code, .message))]
    Api {
        status: StatusCode,
        code: Option<String>,
        message: Option<String>,
    },

    /// The response body did not match the expected shape
    #[error("failed to parse response JSON: {0}")]
    Decode(#[source] serde_json::Error),

    /// A request payload could not be serialized
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

impl TrackerError {
    /// Remote status code, when the API rejected the request
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            TrackerError::Api { status, .. } => Some(*status),
            TrackerError::Transport(err) => err.status(),
            _ => None,
        }
    }
}

fn format_detail(code: &Option<String>, message: &Option<String>) -> String {
    match (code, message) {
        (Some(code), Some(message)) => format!(" ({code}: {message})"),
        (Some(code), None) => format!(" ({code})"),
        (None, Some(message)) => format!(" ({message})"),
        (None, None) => String::new(),
    }
}

pub type Result<T, E = TrackerError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_includes_code_and_message() {
        let err = TrackerError::Api {
            status: StatusCode::NOT_FOUND,
            code: Some("unfound_resource".to_string()),
            message: Some("The object you tried to access could not be found.".to_string()),
        };

        let text = err.to_string();
        assert!(text.starts_with("API request failed: 404 Not Found"));
        assert!(text.contains("unfound_resource"));
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_api_error_display_without_detail() {
        let err = TrackerError::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: None,
            message: None,
        };
        assert_eq!(err.to_string(), "API request failed: 500 Internal Server Error");
    }

    #[test]
    fn test_non_remote_errors_have_no_status() {
        let err = TrackerError::Request {
            path: "/projects/1".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert!(err.status().is_none());
    }
}
