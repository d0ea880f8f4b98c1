//! Error types
//!
//! Every fallible call in this crate returns [`Result`]. Errors fall into four
//! kinds (see [`ErrorKind`]) and none of them is retried internally: the
//! caller decides whether an error is worth another attempt.

use serde_json::Value;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised while talking to the API.
#[derive(Debug, Error)]
pub enum Error {
    /// A `{param}` placeholder in the operation path had no value.
    #[error("missing required argument `{param}` for {resource}.{operation}")]
    MissingArgument {
        resource: String,
        operation: String,
        param: String,
    },

    /// The resource does not declare the requested operation.
    #[error("{resource} does not support `{operation}`")]
    UnsupportedOperation { resource: String, operation: String },

    /// No definition is registered under this key.
    #[error("unknown resource `{0}`")]
    UnknownResource(String),

    /// Invalid client configuration (bad base URL, malformed definition).
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The API answered with a non-2xx status.
    #[error("API request failed: {status}")]
    Api { status: u16, body: Value },

    /// The request never produced an HTTP response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response did not fit the declared shape.
    #[error("cannot hydrate {resource}: {reason}")]
    Hydration { resource: String, reason: String },
}

/// Network-level failures reported by a [`Transport`](crate::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("transport error: {0}")]
    Other(String),
}

/// Coarse classification used to branch on errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any request was sent.
    Validation,
    Api,
    Transport,
    Hydration,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingArgument { .. }
            | Error::UnsupportedOperation { .. }
            | Error::UnknownResource(_)
            | Error::Configuration(_) => ErrorKind::Validation,
            Error::Api { .. } => ErrorKind::Api,
            Error::Transport(_) => ErrorKind::Transport,
            Error::Hydration { .. } => ErrorKind::Hydration,
        }
    }

    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parsed error payload of an API error.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Error::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Short message suitable for end users.
    ///
    /// Security: never echoes the vendor payload, which may contain
    /// customer data.
    pub fn user_message(&self) -> String {
        match self {
            Error::Api { status, .. } => match status {
                400 | 422 => "Invalid request. Check your parameters.".to_string(),
                401 => "Authentication failed. Check your account token and secret key.".to_string(),
                403 => "Permission denied for this account.".to_string(),
                404 => "Resource not found.".to_string(),
                409 => "Resource conflict. The resource may already exist.".to_string(),
                429 => "Rate limit exceeded. Please try again later.".to_string(),
                500..=599 => "ChartMogul service temporarily unavailable. Please try again.".to_string(),
                _ => "Request failed.".to_string(),
            },
            Error::Transport(_) => {
                "Request failed. Check your network connection and try again.".to_string()
            },
            other => {
                let text = other.to_string();
                let sanitized: String = text
                    .chars()
                    .filter(|c| c.is_ascii_graphic() || *c == ' ')
                    .take(80)
                    .collect();
                if sanitized.len() < text.len() {
                    format!("{}...", sanitized)
                } else {
                    sanitized
                }
            },
        }
    }
}
