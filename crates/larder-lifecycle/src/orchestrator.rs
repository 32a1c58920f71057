//! Tenant and environment lifecycle
//!
//! The orchestrator owns no state. Every operation is a strict sequence of
//! collaborator calls in which each step gates the next: admission check,
//! policy read, backup, then the storage mutation. A failure anywhere aborts
//! the rest, so a destructive call never runs after a failed backup or
//! authorization step.

use crate::error::{LifecycleError, Result};
use crate::resolver::EnvironmentResolver;
use futures::future::try_join_all;
use larder_domain::naming::{SETTINGS_PARTITION, USED_BY_FIELD};
use larder_domain::tenant::default_settings;
use larder_domain::traits::{BackupService, DocumentStore, SettingsService, SyncOverride, UserDirectory};
use larder_domain::{
    BackupRef, CollaboratorError, CreatedTenant, EnvironmentName, Filter, PartitionName, Tenant,
    TenantName, User,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// Everything the orchestrator talks to
#[derive(Clone)]
pub struct Collaborators {
    /// Per-tenant document database
    pub store: Arc<dyn DocumentStore>,
    /// Snapshot storage
    pub backups: Arc<dyn BackupService>,
    /// Remote source of authoritative environment lists
    pub sync: Arc<dyn SyncOverride>,
    /// Settings records
    pub settings: Arc<dyn SettingsService>,
    /// Users and their privileges
    pub users: Arc<dyn UserDirectory>,
}

/// Stateless coordinator for creating, inspecting and destroying tenants and
/// their environments
///
/// # Examples
///
/// ```no_run
/// use larder_lifecycle::{Collaborators, Orchestrator};
/// # async fn demo(collaborators: Collaborators) -> larder_lifecycle::Result<()> {
/// let orchestrator = Orchestrator::new(collaborators);
///
/// let created = orchestrator.create_tenant("acme", "admin").await?;
/// let envs = orchestrator.environments(&created.id).await?;
/// assert_eq!(envs, vec!["live"]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Orchestrator {
    store: Arc<dyn DocumentStore>,
    backups: Arc<dyn BackupService>,
    settings: Arc<dyn SettingsService>,
    users: Arc<dyn UserDirectory>,
    resolver: EnvironmentResolver,
}

impl Orchestrator {
    /// Create an orchestrator over its collaborators
    pub fn new(collaborators: Collaborators) -> Self {
        let resolver = EnvironmentResolver::new(collaborators.store.clone(), collaborators.sync);
        Self {
            store: collaborators.store,
            backups: collaborators.backups,
            settings: collaborators.settings,
            users: collaborators.users,
            resolver,
        }
    }

    /// The environment resolver used by this orchestrator
    pub fn resolver(&self) -> &EnvironmentResolver {
        &self.resolver
    }

    /// List every tenant
    pub async fn list_tenants(&self) -> Result<Vec<String>> {
        self.store
            .list_tenants()
            .await
            .map_err(LifecycleError::dependency("list tenants", "*"))
    }

    /// Whether a tenant exists
    pub async fn tenant_exists(&self, name: &str) -> Result<bool> {
        self.store
            .tenant_exists(name)
            .await
            .map_err(LifecycleError::dependency("check tenant", name))
    }

    /// Admission gate for every tenant-scoped operation
    ///
    /// # Errors
    /// `Validation` for a malformed name, `NotFound` if the tenant is absent.
    pub async fn check_tenant(&self, name: &str) -> Result<()> {
        TenantName::parse(name).map_err(LifecycleError::Validation)?;

        if !self.tenant_exists(name).await? {
            return Err(LifecycleError::NotFound(format!(
                "Project \"{}\" could not be found",
                name
            )));
        }

        Ok(())
    }

    /// Assemble a read-only snapshot of a tenant
    ///
    /// Settings, users, backups and environments are fetched concurrently;
    /// the first failure fails the whole read.
    pub async fn get_tenant(&self, id: &str) -> Result<Tenant> {
        self.check_tenant(id).await?;

        let (settings, users, backups, environments) = tokio::try_join!(
            async {
                self.settings
                    .get_settings(id, None, None)
                    .await
                    .map_err(LifecycleError::dependency("read settings", id))
            },
            async {
                self.users
                    .users_for_tenant(id)
                    .await
                    .map_err(LifecycleError::dependency("list users", id))
            },
            async {
                self.backups
                    .list_backups(id)
                    .await
                    .map_err(LifecycleError::dependency("list backups", id))
            },
            self.resolver.resolve(id),
        )?;

        Ok(Tenant {
            id: id.to_string(),
            settings,
            environments,
            backups,
            users,
        })
    }

    /// Create a tenant on behalf of an administrator
    ///
    /// Writes the default tenant-level settings record as the tenant's first
    /// document. Environments are not registered here; the first resolution
    /// bootstraps `"live"`.
    ///
    /// # Errors
    /// - `Validation` if either argument is empty or the name is malformed
    /// - `Authorization` if the user is unknown or not an administrator
    /// - `Conflict` if the tenant exists, including when a concurrent create
    ///   wins the race at the store
    pub async fn create_tenant(&self, name: &str, requesting_user: &str) -> Result<CreatedTenant> {
        if name.is_empty() || requesting_user.is_empty() {
            return Err(LifecycleError::Validation(format!(
                "Projects cannot be created without a name and user id specified. Provided \"{}\" and \"{}\"",
                name, requesting_user
            )));
        }
        TenantName::parse(name).map_err(LifecycleError::Validation)?;

        self.authorize_admin(requesting_user, "create projects", name)
            .await?;

        if self.tenant_exists(name).await? {
            return Err(already_exists(name));
        }

        let settings = default_settings(name);
        self.store
            .create_tenant(name, SETTINGS_PARTITION, settings.clone())
            .await
            .map_err(|e| match e {
                CollaboratorError::AlreadyExists(_) => already_exists(name),
                other => LifecycleError::dependency("create tenant", name)(other),
            })?;

        tracing::info!("Created project \"{}\" for user \"{}\"", name, requesting_user);
        Ok(CreatedTenant {
            id: name.to_string(),
            settings,
        })
    }

    /// Delete a tenant, optionally snapshotting it first
    ///
    /// The database is only dropped once a requested backup has completed.
    pub async fn delete_tenant(&self, id: &str, make_backup: bool) -> Result<()> {
        self.check_tenant(id).await?;

        if make_backup {
            let backup = self
                .backups
                .create_backup(id)
                .await
                .map_err(LifecycleError::dependency("create backup", id))?;
            tracing::info!("Backed up project \"{}\" as {} before deletion", id, backup);
        } else {
            tracing::warn!("Deleting project \"{}\" without a backup", id);
        }

        self.store
            .drop_tenant_database(id)
            .await
            .map_err(LifecycleError::dependency("drop tenant database", id))?;

        tracing::info!("Deleted project \"{}\"", id);
        Ok(())
    }

    /// Register an environment
    ///
    /// # Errors
    /// `Conflict` if the tenant is sync-enabled; its environments are then
    /// owned by the remote source.
    pub async fn add_environment(&self, tenant: &str, environment: &str) -> Result<String> {
        EnvironmentName::parse(environment).map_err(LifecycleError::Validation)?;
        self.check_tenant(tenant).await?;

        if self.is_synced(tenant).await? {
            return Err(LifecycleError::Conflict(format!(
                "Cannot add environments to synced project \"{}\"",
                tenant
            )));
        }

        tracing::info!("Adding environment \"{}\" to project \"{}\"", environment, tenant);

        self.settings
            .set_settings(tenant, Some(environment), None, json!({}), true)
            .await
            .map_err(LifecycleError::dependency("register environment", tenant))?;

        Ok(environment.to_string())
    }

    /// Delete an environment with all its partitions and its registration
    ///
    /// Always backs the tenant up first. Deleting an environment that has no
    /// partitions and no registration succeeds without effect.
    pub async fn delete_environment(&self, tenant: &str, environment: &str) -> Result<()> {
        EnvironmentName::parse(environment).map_err(LifecycleError::Validation)?;
        self.check_tenant(tenant).await?;

        if self.is_synced(tenant).await? {
            return Err(LifecycleError::Conflict(format!(
                "Cannot delete environments from synced project \"{}\"",
                tenant
            )));
        }

        tracing::info!(
            "Deleting environment \"{}\" from project \"{}\"",
            environment,
            tenant
        );

        let backup = self
            .backups
            .create_backup(tenant)
            .await
            .map_err(LifecycleError::dependency("create backup", tenant))?;
        tracing::debug!("Backed up project \"{}\" as {}", tenant, backup);

        let doomed: Vec<String> = self
            .store
            .list_partitions(tenant)
            .await
            .map_err(LifecycleError::dependency("list partitions", tenant))?
            .into_iter()
            .map(|partition| partition.name)
            .filter(|name| PartitionName::belongs_to(name, environment))
            .collect();

        try_join_all(doomed.iter().map(|name| async move {
            tracing::debug!("Dropping partition \"{}\" of project \"{}\"", name, tenant);
            self.store.drop_partition(tenant, name).await
        }))
        .await
        .map_err(LifecycleError::dependency("drop partition", tenant))?;

        // Registration records are removed with the raw store call; the
        // settings service has no notion of deleting an owner.
        self.store
            .remove_documents(
                tenant,
                SETTINGS_PARTITION,
                &Filter::eq(USED_BY_FIELD, environment),
            )
            .await
            .map_err(LifecycleError::dependency("remove environment settings", tenant))?;

        tracing::info!(
            "Deleted environment \"{}\" from project \"{}\" ({} partitions dropped)",
            environment,
            tenant,
            doomed.len()
        );
        Ok(())
    }

    /// Resolve the environments of a tenant
    pub async fn environments(&self, tenant: &str) -> Result<Vec<String>> {
        self.check_tenant(tenant).await?;
        self.resolver.resolve(tenant).await
    }

    /// Whether an environment is among the tenant's resolved environments
    pub async fn environment_exists(&self, tenant: &str, environment: &str) -> Result<bool> {
        Ok(self
            .environments(tenant)
            .await?
            .iter()
            .any(|name| name == environment))
    }

    /// Snapshot a tenant
    pub async fn create_backup(&self, tenant: &str) -> Result<BackupRef> {
        self.check_tenant(tenant).await?;
        self.backups
            .create_backup(tenant)
            .await
            .map_err(LifecycleError::dependency("create backup", tenant))
    }

    /// List a tenant's snapshots
    pub async fn list_backups(&self, tenant: &str) -> Result<Vec<BackupRef>> {
        self.check_tenant(tenant).await?;
        self.backups
            .list_backups(tenant)
            .await
            .map_err(LifecycleError::dependency("list backups", tenant))
    }

    /// Replace a tenant's content with a snapshot (administrators only)
    pub async fn restore_backup(
        &self,
        tenant: &str,
        backup: &BackupRef,
        requesting_user: &str,
    ) -> Result<()> {
        self.authorize_admin(requesting_user, "restore backups", tenant)
            .await?;
        self.check_tenant(tenant).await?;

        self.backups
            .restore_backup(tenant, backup)
            .await
            .map_err(|e| backup_error("restore backup", tenant, backup, e))?;

        tracing::info!("Restored project \"{}\" to backup {}", tenant, backup);
        Ok(())
    }

    /// Delete a snapshot (administrators only)
    pub async fn delete_backup(
        &self,
        tenant: &str,
        backup: &BackupRef,
        requesting_user: &str,
    ) -> Result<()> {
        self.authorize_admin(requesting_user, "delete backups", tenant)
            .await?;
        self.check_tenant(tenant).await?;

        self.backups
            .delete_backup(tenant, backup)
            .await
            .map_err(|e| backup_error("delete backup", tenant, backup, e))
    }

    /// Resolve a user and require the administrator flag
    async fn authorize_admin(&self, user_id: &str, action: &str, tenant: &str) -> Result<User> {
        let user = self
            .users
            .get_user_by_id(user_id)
            .await
            .map_err(|e| match e {
                CollaboratorError::NotFound(_) => {
                    LifecycleError::Authorization(format!("User \"{}\" does not exist", user_id))
                }
                other => LifecycleError::dependency("resolve user", tenant)(other),
            })?;

        if !user.is_admin {
            return Err(LifecycleError::Authorization(format!(
                "Only admins can {}",
                action
            )));
        }

        Ok(user)
    }

    /// Whether the tenant's environments are owned by a remote source
    ///
    /// Either the tenant-level `sync.enabled` flag is set or the sync
    /// override answers with an environment list.
    async fn is_synced(&self, tenant: &str) -> Result<bool> {
        let sync = self
            .settings
            .get_settings(tenant, None, Some("sync"))
            .await
            .map_err(LifecycleError::dependency("read sync settings", tenant))?;

        if sync.get("enabled").and_then(Value::as_bool).unwrap_or(false) {
            return Ok(true);
        }

        self.resolver.is_overridden(tenant).await
    }
}

fn already_exists(name: &str) -> LifecycleError {
    LifecycleError::Conflict(format!("A project by name \"{}\" already exists", name))
}

fn backup_error(
    operation: &'static str,
    tenant: &str,
    backup: &BackupRef,
    e: CollaboratorError,
) -> LifecycleError {
    match e {
        CollaboratorError::NotFound(_) => LifecycleError::NotFound(format!(
            "Backup {} of project \"{}\" could not be found",
            backup, tenant
        )),
        other => LifecycleError::dependency(operation, tenant)(other),
    }
}
