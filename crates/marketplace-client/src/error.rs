//! Error types for the marketplace client.

use thiserror::Error;

use crate::navigation::Screen;

/// Errors that can occur when talking to the marketplace API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server answered with a non-2xx status.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// An authenticated call was made without a session token.
    #[error("Not signed in")]
    NotSignedIn,

    /// The requested screen cannot be reached from the current one.
    #[error("Cannot navigate from {from:?} to {to:?}")]
    Navigation { from: Screen, to: Screen },

    /// Sign-up attempted before the draft was complete.
    #[error("Incomplete sign-up: {0}")]
    IncompleteDraft(&'static str),
}

impl ClientError {
    /// Whether the failure happened at the network layer (no response).
    pub fn is_network(&self) -> bool {
        match self {
            ClientError::Http(err) => err.is_connect() || err.is_timeout() || err.is_request(),
            _ => false,
        }
    }

    /// HTTP status, when the server responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
