/*
[INPUT]:  Error sources (HTTP status, transport, serialization, validation, WebSocket)
[OUTPUT]: Structured error type shared by every client in the crate
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

use crate::http::endpoint::{Endpoint, Service};

/// Main error type for the Dritan SDK
#[derive(Error, Debug)]
pub enum DritanError {
    /// Remote service answered with a non-success status
    #[error("{service} request failed ({status}): {body}")]
    Request {
        service: Service,
        status: u16,
        body: String,
    },

    /// Input rejected before any request was made
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Endpoint is not part of this client's capability set
    #[error("Endpoint not enabled for this client: {0}")]
    Unsupported(Endpoint),

    /// HTTP transport failed (connect, DNS, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failure reported by a custom transport implementation
    #[error("Transport error: {0}")]
    Transport(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Base64 payload could not be decoded
    #[error("Base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    /// WebSocket error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DritanError {
    /// Build a request error, falling back to the status reason when the body is empty
    pub fn request_failed(service: Service, status: u16, body: &str) -> Self {
        let body = if body.is_empty() {
            StatusCode::from_u16(status)
                .ok()
                .and_then(|code| code.canonical_reason())
                .unwrap_or_default()
                .to_string()
        } else {
            body.to_string()
        };
        DritanError::Request {
            service,
            status,
            body,
        }
    }

    /// HTTP status carried by a request error
    pub fn status(&self) -> Option<u16> {
        match self {
            DritanError::Request { status, .. } => Some(*status),
            DritanError::Http(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, DritanError::Validation(_))
    }

    /// Network-level failure rather than a server answer
    pub fn is_transport(&self) -> bool {
        matches!(self, DritanError::Http(_) | DritanError::Transport(_))
    }
}

/// Result type alias for Dritan operations
pub type Result<T> = std::result::Result<T, DritanError>;
