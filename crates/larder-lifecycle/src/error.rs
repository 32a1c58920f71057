//! Error types for lifecycle operations

use larder_domain::CollaboratorError;
use thiserror::Error;

/// Result type alias for lifecycle operations
pub type Result<T> = std::result::Result<T, LifecycleError>;

/// Errors surfaced by the orchestrator and the environment resolver
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// Missing or malformed required argument
    #[error("Validation error: {0}")]
    Validation(String),

    /// Tenant, user or environment absent where presence was required
    #[error("Not found: {0}")]
    NotFound(String),

    /// Name collision, or a mutation disallowed on a synced tenant
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Caller lacks the privilege the operation requires
    #[error("Not authorized: {0}")]
    Authorization(String),

    /// A collaborator call failed
    #[error("{operation} failed for tenant \"{tenant}\": {source}")]
    Dependency {
        /// Operation that was running
        operation: &'static str,
        /// Tenant it was running against
        tenant: String,
        /// Underlying collaborator failure
        #[source]
        source: CollaboratorError,
    },
}

/// Coarse classification for callers mapping errors to responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`LifecycleError::Validation`]
    Validation,
    /// See [`LifecycleError::NotFound`]
    NotFound,
    /// See [`LifecycleError::Conflict`]
    Conflict,
    /// See [`LifecycleError::Authorization`]
    Authorization,
    /// See [`LifecycleError::Dependency`]
    Dependency,
}

impl LifecycleError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LifecycleError::Validation(_) => ErrorKind::Validation,
            LifecycleError::NotFound(_) => ErrorKind::NotFound,
            LifecycleError::Conflict(_) => ErrorKind::Conflict,
            LifecycleError::Authorization(_) => ErrorKind::Authorization,
            LifecycleError::Dependency { .. } => ErrorKind::Dependency,
        }
    }

    /// Wrap a collaborator failure with its operation and tenant
    pub(crate) fn dependency(
        operation: &'static str,
        tenant: &str,
    ) -> impl FnOnce(CollaboratorError) -> LifecycleError {
        let tenant = tenant.to_string();
        move |source| LifecycleError::Dependency {
            operation,
            tenant,
            source,
        }
    }
}
