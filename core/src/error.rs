//! Error types for the item API client.
//!
//! # Design
//! The server answers client mistakes with 400 and an `{error}` body, so
//! that case gets its own `Validation` variant carrying the server's message.
//! All other unexpected statuses land in `HttpError` with the raw status and
//! body for debugging.

use std::fmt;

/// Errors returned by `ItemClient` build and parse methods.
#[derive(Debug)]
pub enum ApiError {
    /// The server rejected the request with 400.
    Validation(String),

    /// The server returned an unexpected status other than 400.
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    DeserializationError(String),

    /// The request payload could not be serialized.
    SerializationError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "rejected: {msg}"),
            ApiError::HttpError { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// The host could not complete a round-trip at all (connection refused,
/// reset, DNS failure).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError(pub String);

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport failed: {}", self.0)
    }
}

impl std::error::Error for TransportError {}
