//! Larder Domain Layer
//!
//! Core vocabulary of the multi-tenant content platform: tenants (projects),
//! environments, the partition naming scheme that ties them together, and the
//! trait contracts for every external collaborator the lifecycle core talks to.
//!
//! ## Key Concepts
//!
//! - **Tenant**: an isolated logical database, identified by its name
//! - **Environment**: a named slice of a tenant's partitions (`<env>.<collection>`)
//! - **Settings record**: a document in the `settings` partition tagged with `usedBy`
//! - **Backup reference**: an opaque, timestamp-identified snapshot
//!
//! ## Architecture
//!
//! - Pure value types and naming rules only
//! - Infrastructure implementations live in `larder-store`
//! - Orchestration lives in `larder-lifecycle`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backup;
pub mod document;
pub mod error;
pub mod naming;
pub mod tenant;
pub mod traits;
pub mod user;

// Re-exports for convenience
pub use backup::BackupRef;
pub use document::{Document, Filter, InsertOptions};
pub use error::CollaboratorError;
pub use naming::{EnvironmentName, PartitionName, TenantName};
pub use tenant::{CreatedTenant, Tenant};
pub use user::User;
