//! Error types for storage operations

use larder_domain::CollaboratorError;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Document body could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Tenant already exists
    #[error("Tenant already exists: {0}")]
    TenantExists(String),

    /// A thread panicked while holding the connection
    #[error("Connection lock poisoned")]
    LockPoisoned,
}

impl From<StoreError> for CollaboratorError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::TenantExists(name) => CollaboratorError::AlreadyExists(name),
            StoreError::Serialization(e) => CollaboratorError::InvalidData(e.to_string()),
            StoreError::InvalidData(msg) => CollaboratorError::InvalidData(msg),
            other => CollaboratorError::Unavailable(other.to_string()),
        }
    }
}
