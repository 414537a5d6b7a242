//! Error types for the events API client.
//!
//! # Design
//! Every failure carries a fieldless [`ErrorKind`] tag so callers (and the
//! fallback policy) can branch on the category without matching payloads.
//! `Validation` is the only variant with a structured field map; forms show
//! those messages next to the offending inputs. Connectivity failures
//! (`Timeout`, `NetworkUnreachable`) are the only kinds the fallback policy
//! absorbs.

use std::collections::BTreeMap;

use thiserror::Error;

/// Errors returned by the client's build/parse methods and domain operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404, or the demo dataset has no such record.
    #[error("resource not found")]
    NotFound,

    /// The server returned a 5xx status.
    #[error("server error (HTTP {status}): {body}")]
    ServerError { status: u16, body: String },

    /// The client-side deadline elapsed before a response arrived.
    #[error("request timed out")]
    Timeout,

    /// No response was received at all.
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    /// Field-level rejections, keyed by field name.
    #[error("validation failed: {}", summarize(fields))]
    Validation { fields: BTreeMap<String, Vec<String>> },

    /// Anything else, with the server's message when one was provided.
    #[error("{message}")]
    Other { status: Option<u16>, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

/// Classification tag for an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    ServerError,
    Timeout,
    NetworkUnreachable,
    Validation,
    Other,
}

impl ErrorKind {
    /// Text shown to the user when an operation fails with this kind.
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "The requested item could not be found.",
            ErrorKind::ServerError => "The server encountered an error. Please try again later.",
            ErrorKind::Timeout => "The request timed out. Please try again.",
            ErrorKind::NetworkUnreachable => {
                "Unable to reach the server. Please check your connection."
            }
            ErrorKind::Validation => "Please correct the highlighted fields.",
            ErrorKind::Other => "Something went wrong. Please try again.",
        }
    }

    /// `true` for failures where no usable answer came back from the server.
    pub fn is_connectivity(self) -> bool {
        matches!(self, ErrorKind::Timeout | ErrorKind::NetworkUnreachable)
    }
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotFound => ErrorKind::NotFound,
            ApiError::ServerError { .. } => ErrorKind::ServerError,
            ApiError::Timeout => ErrorKind::Timeout,
            ApiError::NetworkUnreachable(_) => ErrorKind::NetworkUnreachable,
            ApiError::Validation { .. } => ErrorKind::Validation,
            ApiError::Other { .. }
            | ApiError::DeserializationError(_)
            | ApiError::SerializationError(_) => ErrorKind::Other,
        }
    }

    /// Field messages for `Validation` errors; `None` for every other kind.
    pub fn fields(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        match self {
            ApiError::Validation { fields } => Some(fields),
            _ => None,
        }
    }

    pub fn user_message(&self) -> &'static str {
        self.kind().user_message()
    }
}

fn summarize(fields: &BTreeMap<String, Vec<String>>) -> String {
    fields
        .iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join(" ")))
        .collect::<Vec<_>>()
        .join("; ")
}
