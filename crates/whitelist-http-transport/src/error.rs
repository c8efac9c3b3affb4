//! Error types for the HTTP transport.

use admission_gate::TRANSPORT_ERROR_NO_STATUS;
use thiserror::Error;

/// Ways a whitelist GET can fail.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Whitelist endpoint returned {status}: {message}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The response body, for debugging.
        message: String,
    },

    /// The request did not complete within the configured budget.
    #[error("Whitelist request timed out")]
    Timeout,

    /// No response was received at all.
    #[error("Whitelist request failed: {0}")]
    Connection(#[source] reqwest::Error),
}

impl TransportError {
    /// Classify a reqwest error from sending a request or reading its body.
    pub fn from_request(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if let Some(status) = err.status() {
            TransportError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            TransportError::Connection(err)
        }
    }

    /// Code reported through `RestCallback::on_error`.
    pub fn code(&self) -> u16 {
        match self {
            TransportError::Status { status, .. } => *status,
            _ => TRANSPORT_ERROR_NO_STATUS,
        }
    }
}

/// Result type alias using TransportError.
pub type TransportResult<T> = Result<T, TransportError>;
