//! Error types for marketplace operations.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors that can occur in marketplace services.
#[derive(Debug, Error)]
pub enum MarketError {
    /// Missing, malformed or unknown bearer token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Rejected input.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Key-value store failure.
    #[error("store error: {0}")]
    Store(String),

    /// Backing database failure.
    #[error("database error: {0}")]
    Database(#[from] database::DatabaseError),

    /// Password hashing or a stored credential failed.
    #[error("credential error: {0}")]
    Credential(String),

    /// A stored document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MarketError {
    /// Shorthand for a missing record.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        MarketError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

/// Result type for marketplace operations.
pub type Result<T> = std::result::Result<T, MarketError>;
