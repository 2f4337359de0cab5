//! Error types for the logsys API client.
//!
//! Two kinds of failure exist: transport failures, which collapse into a
//! single [`Error::Unavailable`] variant, and application failures, which
//! carry the server-supplied `error` string and HTTP status.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// The main error type for client operations.
#[derive(Error, Debug)]
pub enum Error {
    // === API Errors ===
    /// The server rejected the request with a non-2xx status.
    ///
    /// `message` is the `error` field of the JSON error body, or a
    /// synthesized fallback when the body had none.
    #[error("{message}")]
    Api {
        /// The HTTP status of the response.
        status: StatusCode,
        /// The server-supplied error message.
        message: String,
    },

    /// The request never produced an HTTP response.
    ///
    /// Connection refusals, DNS failures, and timeouts all normalize to
    /// this variant.
    #[error("network error or API is unavailable")]
    Unavailable,

    /// The server responded with a 2xx status but the body was not what
    /// the operation required.
    #[error("unexpected response from server: {0}")]
    InvalidResponse(String),

    // === Session Errors ===
    /// No session is active.
    #[error("not logged in (run `logview login <username>` first)")]
    NotLoggedIn,

    /// Failed to read the session file.
    #[error("failed to read session file at {path}: {source}")]
    SessionRead {
        /// Path to the session file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the session file.
    #[error("failed to write session file at {path}: {source}")]
    SessionWrite {
        /// Path to the session file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an API error from a status and server message.
    #[must_use]
    pub fn api(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an API error with the fallback message for a body that
    /// carried no usable `error` field.
    #[must_use]
    pub fn api_fallback(status: StatusCode) -> Self {
        Self::Api {
            status,
            message: format!("request failed with status {status}"),
        }
    }

    /// Create an invalid response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error is a 401 from the server.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Api {
                status: StatusCode::UNAUTHORIZED,
                ..
            }
        )
    }

    /// Check if this error indicates no session is active.
    #[must_use]
    pub fn is_not_logged_in(&self) -> bool {
        matches!(self, Self::NotLoggedIn)
    }

    /// The server-supplied message, if this is an API error.
    #[must_use]
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_is_server_message() {
        let err = Error::api(StatusCode::BAD_REQUEST, "Project name is required");
        assert_eq!(err.to_string(), "Project name is required");
    }

    #[test]
    fn test_api_fallback_mentions_status() {
        let err = Error::api_fallback(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_unavailable_display() {
        assert_eq!(
            Error::Unavailable.to_string(),
            "network error or API is unavailable"
        );
    }

    #[test]
    fn test_is_unauthorized() {
        assert!(Error::api(StatusCode::UNAUTHORIZED, "Unauthorized").is_unauthorized());
        assert!(!Error::api(StatusCode::FORBIDDEN, "Forbidden").is_unauthorized());
        assert!(!Error::Unavailable.is_unauthorized());
    }

    #[test]
    fn test_is_not_logged_in() {
        assert!(Error::NotLoggedIn.is_not_logged_in());
        assert!(!Error::Unavailable.is_not_logged_in());
    }

    #[test]
    fn test_api_message() {
        let err = Error::api(StatusCode::CONFLICT, "duplicate project");
        assert_eq!(err.api_message(), Some("duplicate project"));
        assert_eq!(Error::Unavailable.api_message(), None);
    }

    #[test]
    fn test_not_logged_in_names_the_login_command() {
        assert!(Error::NotLoggedIn.to_string().contains("logview login"));
    }

    #[test]
    fn test_invalid_response_display() {
        let err = Error::invalid_response("empty body from apikey endpoint");
        assert!(err.to_string().contains("apikey"));
    }

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_session_read_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::SessionRead {
            path: PathBuf::from("/home/user/.local/share/logview/session.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("session.json"));
        assert!(msg.contains("access denied"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
