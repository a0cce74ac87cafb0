//! Error types for the content API client.
//!
//! # Design
//! The `Display` output of every variant is the exact message shown to the
//! user. Repositories turn an `ApiError` into `RequestState::Error` through
//! `to_string()`, so the typed taxonomy never crosses the repository
//! boundary. Transport, decode and serialization failures all render as
//! `Network error: <cause>`.

use thiserror::Error;

use crate::http::status_description;

const UNKNOWN_CAUSE: &str = "Unknown error occurred";

/// Errors returned by service `parse_*` and request methods.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server returned 401.
    #[error("Unauthorized: Invalid API token")]
    Unauthorized,

    /// The server returned 404. Carries the full resource-specific message.
    #[error("{0}")]
    NotFound(String),

    /// The server returned 400 for a write operation.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The server returned 500 for a list fetch.
    #[error("Server error: Please try again later")]
    ServerError,

    /// Any other status outside the operation's success set.
    #[error("HTTP {status}: {description}")]
    Http { status: u16, description: String },

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("Network error: {0}")]
    Decode(String),

    /// The request payload could not be encoded.
    #[error("Network error: {0}")]
    Serialization(String),
}

impl ApiError {
    pub fn http(status: u16) -> Self {
        ApiError::Http {
            status,
            description: status_description(status).to_string(),
        }
    }

    pub fn transport(cause: impl Into<String>) -> Self {
        ApiError::Transport(non_empty_cause(cause.into()))
    }

    pub fn decode(cause: impl Into<String>) -> Self {
        ApiError::Decode(non_empty_cause(cause.into()))
    }

    pub fn serialization(cause: impl Into<String>) -> Self {
        ApiError::Serialization(non_empty_cause(cause.into()))
    }
}

fn non_empty_cause(cause: String) -> String {
    if cause.trim().is_empty() {
        UNKNOWN_CAUSE.to_string()
    } else {
        cause
    }
}
