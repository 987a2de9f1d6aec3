//! Error types for management API calls.
//!
//! Errors are classified by where the call failed so callers can branch on
//! the kind instead of inspecting message text.

use super::content_types::ContentType;
use reqwest::StatusCode;
use thiserror::Error;

/// Result alias for management API calls
pub type KontentResult<T> = Result<T, KontentError>;

/// Errors returned by [`KontentClient`](super::client::KontentClient) operations.
#[derive(Debug, Error)]
pub enum KontentError {
    /// The request could not be sent or the response could not be read
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body is not JSON of the expected shape
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The service answered 404 for the requested resource
    #[error("resource not found (status 404){}", body_suffix(.body))]
    NotFound {
        /// Raw response body, if it could be read
        body: Option<String>,
    },

    /// The service answered with any other non-success status
    #[error("API request failed with status {}{}", .status.as_u16(), body_suffix(.body))]
    Api {
        /// HTTP status returned by the service
        status: StatusCode,
        /// Raw response body, if it could be read
        body: Option<String>,
    },

    /// Delete succeeded during an update but the recreate failed.
    ///
    /// The remote object identified by `old_id` no longer exists and no
    /// replacement was created.
    #[error("content type {old_id} was deleted but could not be recreated: {source}")]
    PartialUpdate {
        /// Identity of the deleted content type
        old_id: String,
        /// Definition that failed to be recreated
        attempted: Box<ContentType>,
        /// Failure returned by the create call
        #[source]
        source: Box<KontentError>,
    },

    /// Input rejected locally before any request was sent
    #[error("validation failed: {0}")]
    Validation(String),

    /// Client configuration is unusable
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl KontentError {
    /// Build an error for a non-success status.
    pub(crate) fn from_status(status: StatusCode, body: Option<String>) -> Self {
        if status == StatusCode::NOT_FOUND {
            Self::NotFound { body }
        } else {
            Self::Api { status, body }
        }
    }

    /// Whether the remote resource is absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            Self::PartialUpdate { source, .. } => source.status(),
            _ => None,
        }
    }
}

fn body_suffix(body: &Option<String>) -> String {
    match body.as_deref() {
        Some(b) if !b.is_empty() => format!(" - {}", b),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_carries_status_and_body() {
        let err = KontentError::from_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            Some("internal error".to_string()),
        );
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("internal error"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_api_error_without_body() {
        let err = KontentError::from_status(StatusCode::BAD_REQUEST, None);
        assert_eq!(err.to_string(), "API request failed with status 400");
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_404_is_not_found_kind() {
        let err = KontentError::from_status(StatusCode::NOT_FOUND, Some("gone".to_string()));
        assert!(err.is_not_found());
        assert!(err.to_string().contains("404"));
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_partial_update_reports_old_id_and_cause() {
        let err = KontentError::PartialUpdate {
            old_id: "old-1".to_string(),
            attempted: Box::new(ContentType::new("Article", "article", Vec::new())),
            source: Box::new(KontentError::from_status(
                StatusCode::BAD_REQUEST,
                Some("bad element".to_string()),
            )),
        };
        let msg = err.to_string();
        assert!(msg.contains("old-1"));
        assert!(msg.contains("bad element"));
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }
}
