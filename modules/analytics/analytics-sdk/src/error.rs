//! Error types for the analytics SDK

use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Error type for analytics API operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// Authorization precondition failed
    ///
    /// Returned by the auth gate before any request is sent
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Connection error
    ///
    /// Returned when the network connection to the analytics API fails
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request timeout
    ///
    /// Returned when a request exceeds the configured timeout
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Request could not be built or sent for another reason
    #[error("Request error: {0}")]
    Request(String),

    /// Non-2xx response
    ///
    /// Carries the decoded JSON error body
    #[error("API error {status}: {failure}")]
    Api {
        /// HTTP status code
        status: StatusCode,

        /// Error body returned by the API
        failure: ApiFailure,
    },

    /// Invalid response
    ///
    /// Returned when a 2xx body cannot be decoded into the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    ///
    /// Returned when client configuration is invalid
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Check if error is a connection error
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Check if error is a timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Check if error came from the auth gate
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Check if error is an API error response
    #[must_use]
    pub const fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// Get HTTP status code if this is an API error
    #[must_use]
    pub const fn http_status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Error body if this is an API error
    #[must_use]
    pub const fn failure(&self) -> Option<&ApiFailure> {
        match self {
            Self::Api { failure, .. } => Some(failure),
            _ => None,
        }
    }

    /// Human readable messages for an error state view
    ///
    /// API errors yield their `detail` messages; any other error yields its
    /// display string.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Api { failure, .. } if !failure.messages().is_empty() => failure.messages(),
            other => vec![other.to_string()],
        }
    }
}

/// JSON error body of a non-2xx response
///
/// Validation failures carry a list of `{loc, msg, type}` entries, other
/// failures a plain `detail` string. Unknown fields are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApiFailure {
    /// `detail` member of the body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<FailureDetail>,

    /// Remaining members of the body
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// `detail` member of an error body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FailureDetail {
    /// Plain message
    Message(String),
    /// Field validation errors
    Validation(Vec<ValidationError>),
}

/// One field validation error
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationError {
    /// Location of the offending field
    #[serde(default)]
    pub loc: Vec<serde_json::Value>,
    /// Message
    #[serde(default)]
    pub msg: String,
    /// Error kind
    #[serde(default, rename = "type")]
    pub kind: String,
}

impl ApiFailure {
    /// Wrap a non-JSON error body
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let text = text.trim();
        Self {
            detail: (!text.is_empty()).then(|| FailureDetail::Message(text.to_owned())),
            extra: serde_json::Map::new(),
        }
    }

    /// Decode an error body, falling back to its text
    #[must_use]
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body)
            .unwrap_or_else(|_| Self::from_text(&String::from_utf8_lossy(body)))
    }

    /// Messages to show to the user
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match &self.detail {
            Some(FailureDetail::Message(msg)) => vec![msg.clone()],
            Some(FailureDetail::Validation(errors)) => {
                errors.iter().map(|e| e.msg.clone()).collect()
            }
            None => Vec::new(),
        }
    }
}

impl std::fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages = self.messages();
        if messages.is_empty() {
            f.write_str("no details")
        } else {
            f.write_str(&messages.join("; "))
        }
    }
}

/// Result type alias for analytics API operations
pub type Result<T> = std::result::Result<T, ClientError>;
