//! Error types for the holiday client
//!
//! Every failure that leaves the pipeline has been normalized into one of these
//! variants; raw transport errors never reach callers.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Message of transport errors where no response was received
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";
/// Message of transport errors caused by the call timeout
pub const TIMEOUT_MESSAGE: &str = "Request timed out.";
pub(crate) const FALLBACK_MESSAGE: &str = "An error occurred";

/// Errors that can occur when using the holiday client
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response reached the client (connection failure, timeout)
    #[error("{message}")]
    Transport {
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// The API answered with a non-2xx status
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message from the error payload, or the status reason
        message: String,
        /// Machine-readable code from the error payload
        code: Option<String>,
        /// Structured details from the error payload
        details: Option<serde_json::Value>,
        timestamp: DateTime<Utc>,
    },

    /// A successful response carried a body of the wrong shape
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The request was rejected before being sent
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The call was cancelled through a `CancelHandle`
    #[error("Request cancelled")]
    Cancelled,

    /// Local file access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Optional error payload returned by the API on failures
#[derive(Debug, Default, serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
    code: Option<String>,
    details: Option<serde_json::Value>,
}

impl ClientError {
    /// Create a transport error stamped with the current time
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
            code: None,
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Build an API error from a failed response's status and raw body
    ///
    /// The body is read as `{message?, code?, details?}`; anything else falls
    /// back to the status reason.
    pub fn from_response(status: reqwest::StatusCode, body: &[u8]) -> Self {
        let payload: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
        let message = payload
            .message
            .filter(|m| !m.is_empty())
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());

        Self::Api {
            status: status.as_u16(),
            message,
            code: payload.code,
            details: payload.details,
            timestamp: Utc::now(),
        }
    }

    /// HTTP status of the failure; 0 when no response was received
    pub fn status(&self) -> u16 {
        match self {
            Self::Api { status, .. } => *status,
            _ => 0,
        }
    }

    /// Human-readable message, without the variant prefix
    pub fn message(&self) -> String {
        match self {
            Self::Transport { message, .. } | Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// When the error was captured, for normalized transport and API errors
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Transport { timestamp, .. } | Self::Api { timestamp, .. } => Some(*timestamp),
            _ => None,
        }
    }

    /// Check if this error is a transport-level failure
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if the session was rejected (401)
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status >= 500)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        tracing::debug!("transport failure: {}", err);
        if err.is_timeout() {
            Self::transport(TIMEOUT_MESSAGE)
        } else if err.is_builder() {
            Self::Validation(err.to_string())
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::transport(NETWORK_ERROR_MESSAGE)
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
