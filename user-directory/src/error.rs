//! Error types for the user directory API

use serde_json::{Map, Value};
use thiserror::Error;

/// Errors returned by a [`UserApi`](crate::api::UserApi) implementation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UserApiError {
    /// The request never produced a response (connect, timeout, TLS)
    #[error("Request failed: {0}")]
    Request(String),

    /// The response body could not be decoded
    #[error("Response parsing failed: {0}")]
    Decode(String),

    /// 401 - missing or invalid credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 403 - authenticated but not allowed
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 404 - the user does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// 422 - the form was rejected
    #[error("Validation failed: {message}")]
    Validation {
        /// Summary message
        message: String,
        /// Per-field messages as sent by the server
        errors: Map<String, Value>,
    },

    /// Any other non-success status
    #[error("API error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },
}

impl UserApiError {
    /// HTTP status the error came from, if any
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Request(_) | Self::Decode(_) => None,
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::Validation { .. } => Some(422),
            Self::Status { status, .. } => Some(*status),
        }
    }

    /// Build an error from a non-success status and the backend's JSON body
    ///
    /// The backend answers with `{"message": "..."}`, plus an `errors`
    /// map on validation failures. Bodies that are not JSON are used as
    /// the message verbatim. An empty body falls back to the status code.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<Map<String, Value>> = serde_json::from_str(body).ok();

        let message = parsed
            .as_ref()
            .and_then(|map| map.get("message"))
            .and_then(Value::as_str)
            .map_or_else(|| body.trim().to_string(), str::to_string);
        let message = if message.is_empty() {
            format!("request failed with status {status}")
        } else {
            message
        };

        match status {
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            422 => {
                let errors = parsed
                    .and_then(|mut map| map.remove("errors"))
                    .and_then(|errors| match errors {
                        Value::Object(errors) => Some(errors),
                        _ => None,
                    })
                    .unwrap_or_default();
                Self::Validation { message, errors }
            },
            status => Self::Status { status, message },
        }
    }
}

/// Convenience alias for API results
pub type Result<T> = std::result::Result<T, UserApiError>;
