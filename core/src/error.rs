//! Error types for the resource API client.
//!
//! # Design
//! HTTP status codes are never errors here: a 404 or 500 comes back as an
//! ordinary `ApiResponse` for the caller to assert on. Only failures below the
//! application layer, JSON decoding in the convenience methods, and use of a
//! closed client surface as `ApiError`.

use thiserror::Error;

/// Errors returned by `ApiClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout, or a failed body read.
    /// The underlying `ureq` error is carried untouched.
    #[error("transport error: {0}")]
    Transport(#[from] ureq::Error),

    /// The response body could not be decoded as the requested JSON type.
    #[error("failed to decode response body as JSON: {0}")]
    Decode(#[source] serde_json::Error),

    /// The JSON payload could not be serialized.
    #[error("failed to encode request payload as JSON: {0}")]
    Encode(#[source] serde_json::Error),

    /// The client was closed before the call was made.
    #[error("client has been closed")]
    Closed,
}

impl ApiError {
    /// True for failures that happened below the HTTP layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    /// True when the connection attempt or the read exceeded the timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            ApiError::Transport(ureq::Error::Timeout(_)) => true,
            ApiError::Transport(ureq::Error::Io(e)) => {
                matches!(e.kind(), std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock)
            }
            _ => false,
        }
    }
}
