//! Error types for url-scan

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown when a failure carries no usable text
pub const GENERIC_SCAN_ERROR: &str = "An error occurred while scanning the URL";

/// Errors that can occur while scanning a URL
#[derive(Debug, Error)]
pub enum Error {
    /// Input was empty after trimming
    #[error("Please enter a URL to scan")]
    EmptyInput,

    /// The scan service answered but reported a failure in its `error` field
    #[error("{0}")]
    ServiceReported(String),

    /// Invalid scan service URL provided
    #[error("invalid service URL: {0}")]
    InvalidServiceUrl(String),

    /// Failed to create HTTP client
    #[error("failed to create HTTP client: {0}")]
    HttpClient(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpRequest(String),

    /// HTTP response error status
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),

    /// Response body could not be read as a scan response
    #[error("malformed scan response: {0}")]
    MalformedResponse(String),

    /// Invalid output format specified
    #[error("invalid output format: '{0}' (valid: human, json, none)")]
    InvalidOutputFormat(String),

    /// Output operation failed
    #[error("output failed: {0}")]
    OutputFailed(#[source] std::io::Error),

    /// Reading terminal input failed
    #[error("failed to read input: {0}")]
    ReadInput(#[source] std::io::Error),

    /// JSON serialization failed
    #[error("JSON serialization failed")]
    SerializationFailed(#[from] serde_json::Error),
}

/// How a scan failure is classified for the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Local validation failure, never reached the network
    EmptyInput,
    /// The service signalled a domain-level failure
    ServiceReported,
    /// Network failure, bad status, or unreadable body
    Transport,
    /// Terminal input or output failure
    Terminal,
}

impl Error {
    /// Classify this error
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::EmptyInput => ErrorClass::EmptyInput,
            Self::ServiceReported(_) => ErrorClass::ServiceReported,
            Self::InvalidServiceUrl(_)
            | Self::HttpClient(_)
            | Self::HttpRequest(_)
            | Self::HttpStatus(_)
            | Self::MalformedResponse(_) => ErrorClass::Transport,
            Self::InvalidOutputFormat(_)
            | Self::OutputFailed(_)
            | Self::ReadInput(_)
            | Self::SerializationFailed(_) => ErrorClass::Terminal,
        }
    }

    /// Message to show in the error panel, never empty
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_SCAN_ERROR.to_string()
        } else {
            message
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_message_is_literal() {
        assert_eq!(Error::EmptyInput.to_string(), "Please enter a URL to scan");
        assert_eq!(Error::EmptyInput.class(), ErrorClass::EmptyInput);
    }

    #[test]
    fn service_message_is_verbatim() {
        let err = Error::ServiceReported("invalid url".to_string());
        assert_eq!(err.user_message(), "invalid url");
        assert_eq!(err.class(), ErrorClass::ServiceReported);
    }

    #[test]
    fn blank_message_falls_back() {
        let err = Error::ServiceReported("  ".to_string());
        assert_eq!(err.user_message(), GENERIC_SCAN_ERROR);
    }

    #[test]
    fn transport_errors_classified() {
        assert_eq!(Error::HttpStatus(502).class(), ErrorClass::Transport);
        assert_eq!(
            Error::MalformedResponse("eof".into()).class(),
            ErrorClass::Transport
        );
        assert_eq!(Error::HttpRequest("refused".into()).class(), ErrorClass::Transport);
    }
}
