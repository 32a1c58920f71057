//! Trait definitions for external collaborators
//!
//! These traits define the boundaries between the lifecycle core and
//! infrastructure. Implementations live in `larder-store`; tests substitute
//! their own doubles.

use crate::{BackupRef, CollaboratorError, Document, Filter, InsertOptions, User};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Result type for collaborator calls
pub type CollabResult<T> = Result<T, CollaboratorError>;

/// A partition as reported by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionInfo {
    /// Partition name
    pub name: String,
}

/// Per-tenant document database
///
/// Inserting into a tenant or partition that does not exist creates it.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List every tenant database
    async fn list_tenants(&self) -> CollabResult<Vec<String>>;

    /// Whether a tenant database exists
    async fn tenant_exists(&self, tenant: &str) -> CollabResult<bool>;

    /// Atomically create a tenant seeded with one document
    ///
    /// # Errors
    /// `AlreadyExists` if the tenant is already present.
    async fn create_tenant(&self, tenant: &str, partition: &str, doc: Document) -> CollabResult<()>;

    /// Find documents in a partition
    async fn find_documents(
        &self,
        tenant: &str,
        partition: &str,
        filter: &Filter,
    ) -> CollabResult<Vec<Document>>;

    /// Insert a document
    ///
    /// With `upsert`, the document is its own identity filter: a matching
    /// document is overwritten instead of duplicated.
    async fn insert_document(
        &self,
        tenant: &str,
        partition: &str,
        doc: Document,
        options: InsertOptions,
    ) -> CollabResult<()>;

    /// Remove every document matching a filter, returning how many went
    async fn remove_documents(
        &self,
        tenant: &str,
        partition: &str,
        filter: &Filter,
    ) -> CollabResult<usize>;

    /// Atomically remove every document matching a filter and insert `doc`
    ///
    /// Either both happen or neither does.
    async fn replace_documents(
        &self,
        tenant: &str,
        partition: &str,
        filter: &Filter,
        doc: Document,
    ) -> CollabResult<()>;

    /// List the partitions of a tenant
    async fn list_partitions(&self, tenant: &str) -> CollabResult<Vec<PartitionInfo>>;

    /// Drop a partition and all its documents
    async fn drop_partition(&self, tenant: &str, partition: &str) -> CollabResult<()>;

    /// Drop a tenant's entire database
    async fn drop_tenant_database(&self, tenant: &str) -> CollabResult<()>;

    /// Atomically replace a tenant's whole content, creating it if absent
    ///
    /// Every listed partition exists afterwards, including empty ones.
    async fn replace_tenant(
        &self,
        tenant: &str,
        partitions: BTreeMap<String, Vec<Document>>,
    ) -> CollabResult<()>;
}

/// Snapshot storage for tenants
#[async_trait]
pub trait BackupService: Send + Sync {
    /// Snapshot a tenant
    async fn create_backup(&self, tenant: &str) -> CollabResult<BackupRef>;

    /// List a tenant's snapshots, oldest first
    async fn list_backups(&self, tenant: &str) -> CollabResult<Vec<BackupRef>>;

    /// Replace a tenant's content with a snapshot
    async fn restore_backup(&self, tenant: &str, backup: &BackupRef) -> CollabResult<()>;

    /// Delete a snapshot
    async fn delete_backup(&self, tenant: &str, backup: &BackupRef) -> CollabResult<()>;
}

/// Kind of resource a remote sync source can override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ResourceKind {
    /// The tenant's environment list
    Environments,
}

impl ResourceKind {
    /// Wire name of the resource
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Environments => "environments",
        }
    }
}

/// Remote source that may supersede local data
#[async_trait]
pub trait SyncOverride: Send + Sync {
    /// Fetch an overriding resource, or `None` when no override applies
    async fn get_override_resource(
        &self,
        tenant: &str,
        environment: Option<&str>,
        kind: ResourceKind,
    ) -> CollabResult<Option<Value>>;
}

/// Policy-aware access to settings records
///
/// `environment = None` addresses the tenant-level record.
#[async_trait]
pub trait SettingsService: Send + Sync {
    /// Read a settings record, or one section of it when `key` is given
    async fn get_settings(
        &self,
        tenant: &str,
        environment: Option<&str>,
        key: Option<&str>,
    ) -> CollabResult<Value>;

    /// Write a settings record, or one section of it when `key` is given
    async fn set_settings(
        &self,
        tenant: &str,
        environment: Option<&str>,
        key: Option<&str>,
        value: Value,
        upsert: bool,
    ) -> CollabResult<()>;
}

/// User and authorization records
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up a user
    ///
    /// # Errors
    /// `NotFound` if no user has this id.
    async fn get_user_by_id(&self, id: &str) -> CollabResult<User>;

    /// Users scoped to a tenant
    async fn users_for_tenant(&self, tenant: &str) -> CollabResult<Vec<User>>;
}
