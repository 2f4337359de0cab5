//! Error types for the `logview` binary.
//!
//! API and session failures are defined in `logview-client` and wrapped
//! transparently; this module adds the errors the command-line surface
//! can produce on its own.

use thiserror::Error;

/// The main error type for `logview` operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Command Errors ===
    /// The given project id matches no project on the server.
    #[error("no project with id '{0}' (run `logview project list`)")]
    UnknownProject(String),

    /// Clipboard access failed.
    #[error("clipboard error: {0}")]
    Clipboard(String),

    // === Wrapped Errors ===
    /// An API or session error from the client library.
    #[error(transparent)]
    Client(#[from] logview_client::Error),

    /// JSON output could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for `logview` operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a clipboard error.
    #[must_use]
    pub fn clipboard(message: impl Into<String>) -> Self {
        Self::Clipboard(message.into())
    }

    /// Check if this error means no session is active.
    #[must_use]
    pub fn is_not_logged_in(&self) -> bool {
        matches!(self, Self::Client(err) if err.is_not_logged_in())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_project_display() {
        let err = Error::UnknownProject("p9".to_string());
        let msg = err.to_string();
        assert!(msg.contains("p9"));
        assert!(msg.contains("logview project list"));
    }

    #[test]
    fn test_clipboard_error_display() {
        let err = Error::clipboard("no display server");
        assert_eq!(err.to_string(), "clipboard error: no display server");
    }

    #[test]
    fn test_client_error_is_transparent() {
        let err: Error = logview_client::Error::Unavailable.into();
        assert_eq!(err.to_string(), "network error or API is unavailable");
    }

    #[test]
    fn test_is_not_logged_in() {
        let err: Error = logview_client::Error::NotLoggedIn.into();
        assert!(err.is_not_logged_in());
        assert!(!Error::clipboard("x").is_not_logged_in());
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "timeout_secs must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }
}
