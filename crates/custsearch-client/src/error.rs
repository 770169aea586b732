//! Classified transport failures.
//!
//! Every raw failure is mapped to a [`TransportError`] before it leaves the
//! transport layer. The classification decides retry eligibility
//! ([`TransportError::is_transient`]) and the message a user sees
//! ([`TransportError::user_message`]).

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("connection failed: {0}")]
    Connect(String),
    /// 5xx, 408 and 429.
    #[error("server unavailable (status {status})")]
    Server { status: u16 },
    #[error("bad request")]
    BadRequest,
    #[error("search endpoint not found")]
    NotFound,
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed response body: {0}")]
    Decode(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => TransportError::BadRequest,
            404 => TransportError::NotFound,
            408 | 429 | 500..=599 => TransportError::Server { status },
            other => TransportError::Status(other),
        }
    }

    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TransportError::Timeout(_) | TransportError::Connect(_) | TransportError::Server { .. }
        )
    }

    /// Human-readable message for the UI. Never exposes the raw fault.
    pub fn user_message(&self) -> String {
        match self {
            TransportError::Timeout(_) => {
                "The search request timed out. Please try again.".to_string()
            }
            TransportError::Connect(_) => {
                "Unable to connect to the server. Please check if the API is running.".to_string()
            }
            TransportError::BadRequest | TransportError::InvalidRequest(_) => {
                "Invalid search request. Please check your search terms.".to_string()
            }
            TransportError::NotFound => "Search service not found.".to_string(),
            TransportError::Server { status: 500 } => {
                "Server error occurred. Please try again later.".to_string()
            }
            TransportError::Server { status } | TransportError::Status(status) => {
                format!("Server returned error code {status}")
            }
            TransportError::Decode(_) => {
                "The server sent an unexpected response.".to_string()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
