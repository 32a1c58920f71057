//! Error type shared by every collaborator contract

use thiserror::Error;

/// Failure reported by an external collaborator
///
/// The lifecycle core only distinguishes `NotFound` and `AlreadyExists`; every
/// other variant is opaque to it and surfaces as a dependency failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    /// Requested entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Entity already exists and the operation required it not to
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Stored or supplied data could not be interpreted
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Backend could not be reached or refused the operation
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CollaboratorError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            CollaboratorError::NotFound(e.to_string())
        } else {
            CollaboratorError::Io(e.to_string())
        }
    }
}

impl From<serde_json::Error> for CollaboratorError {
    fn from(e: serde_json::Error) -> Self {
        CollaboratorError::InvalidData(e.to_string())
    }
}
