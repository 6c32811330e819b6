//! Error types module
//!
//! Every failure the console can hit is a `ConsoleError`. Pages never match on
//! variants to decide what to show: they display `client_message()` inline and
//! let the user retry or navigate away. The variants exist for logging and for
//! the handful of callers that need to tell client-side validation apart from
//! backend failures.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected errors such as validation failures
    Debug,
    /// Backend refused the request
    Warn,
    /// Transport or decoding failures
    Error,
}

/// Describes how an error should be presented to the user and logged.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "TRANSPORT_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether trying again later may succeed
    fn is_recoverable(&self) -> bool;

    /// Human-readable message shown on the page
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// The request never produced a response (connection refused, DNS, timeout).
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-2xx response whose body carried a structured error message.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Non-2xx response without a usable body; `message` is the operation's
    /// generic failure text.
    #[error("HTTP error ({status}): {message}")]
    Http { status: u16, message: String },

    /// 2xx response whose body did not match the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Rejected before any request was sent.
    #[error("{0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;

impl From<io::Error> for ConsoleError {
    fn from(err: io::Error) -> Self {
        ConsoleError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        ConsoleError::Decode(format!("JSON parsing error: {}", err))
    }
}

/// Static metadata for each variant: (error_code, recoverable, log_level).
fn console_error_static_metadata(err: &ConsoleError) -> (&'static str, bool, LogLevel) {
    match err {
        ConsoleError::Transport(_) => ("TRANSPORT_ERROR", true, LogLevel::Error),
        ConsoleError::Api { status, .. } | ConsoleError::Http { status, .. } => {
            let code = if err.is_api_with_body() {
                "API_ERROR"
            } else {
                "HTTP_ERROR"
            };
            (code, *status >= 500, LogLevel::Warn)
        }
        ConsoleError::Decode(_) => ("DECODE_ERROR", false, LogLevel::Error),
        ConsoleError::Validation(_) => ("VALIDATION_ERROR", false, LogLevel::Debug),
        ConsoleError::Io(_) => ("IO_ERROR", false, LogLevel::Warn),
        ConsoleError::Config(_) => ("CONFIG_ERROR", false, LogLevel::Error),
    }
}

impl ConsoleError {
    fn is_api_with_body(&self) -> bool {
        matches!(self, ConsoleError::Api { .. })
    }

    /// HTTP status for response-backed errors.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ConsoleError::Api { status, .. } | ConsoleError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ConsoleError::Validation(_))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ConsoleError::Validation(message.into())
    }
}

impl ErrorMetadata for ConsoleError {
    fn error_code(&self) -> &'static str {
        console_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        console_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        console_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            ConsoleError::Transport(ref msg) => format!("Network error: {}", msg),
            ConsoleError::Api { ref message, .. } => message.clone(),
            ConsoleError::Http { ref message, .. } => message.clone(),
            ConsoleError::Decode(_) => "Unexpected response from server".to_string(),
            ConsoleError::Validation(ref msg) => msg.clone(),
            ConsoleError::Io(ref msg) => msg.clone(),
            ConsoleError::Config(ref msg) => msg.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_api() {
        let err = ConsoleError::Api {
            status: 413,
            message: "File too large".to_string(),
        };
        assert_eq!(err.error_code(), "API_ERROR");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "File too large");
        assert_eq!(err.http_status(), Some(413));
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_error_metadata_http_server_side() {
        let err = ConsoleError::Http {
            status: 502,
            message: "Failed to fetch assets".to_string(),
        };
        assert_eq!(err.error_code(), "HTTP_ERROR");
        assert!(err.is_recoverable());
        assert_eq!(err.client_message(), "Failed to fetch assets");
    }

    #[test]
    fn test_error_metadata_validation() {
        let err = ConsoleError::validation("Please select a file to upload");
        assert!(err.is_validation());
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.client_message(), "Please select a file to upload");
        assert_eq!(err.to_string(), "Please select a file to upload");
        assert_eq!(err.log_level(), LogLevel::Debug);
        assert_eq!(err.http_status(), None);
    }

    #[test]
    fn test_error_metadata_decode_hides_details() {
        let err: ConsoleError = serde_json::from_str::<u32>("\"x\"").unwrap_err().into();
        assert_eq!(err.error_code(), "DECODE_ERROR");
        assert_eq!(err.client_message(), "Unexpected response from server");
        assert!(err.to_string().contains("JSON parsing error"));
    }
}
