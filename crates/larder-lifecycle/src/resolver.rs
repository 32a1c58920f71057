//! Environment resolution
//!
//! Decides which environments a tenant has, in three tiers:
//!
//! 1. a remote sync override, when one answers with a list of names;
//! 2. otherwise every distinct `usedBy` of the local settings records,
//!    minus the `"project"` sentinel;
//! 3. otherwise bootstrap a `"live"` registration and report only that.
//!
//! The bootstrap write goes straight to the [`DocumentStore`]. Going through
//! the settings service instead would make environment existence depend on
//! settings semantics, which in turn depend on environment existence. This is
//! the only place that raw write is used for settings records.

use crate::error::{LifecycleError, Result};
use larder_domain::document::used_by;
use larder_domain::naming::{DEFAULT_ENVIRONMENT, PROJECT_SENTINEL, SETTINGS_PARTITION, USED_BY_FIELD};
use larder_domain::traits::{DocumentStore, ResourceKind, SyncOverride};
use larder_domain::{Document, Filter, InsertOptions};
use serde_json::Value;
use std::sync::Arc;

/// Resolves the authoritative environment list of a tenant
#[derive(Clone)]
pub struct EnvironmentResolver {
    store: Arc<dyn DocumentStore>,
    sync: Arc<dyn SyncOverride>,
}

impl EnvironmentResolver {
    /// Create a resolver over a store and a sync override source
    pub fn new(store: Arc<dyn DocumentStore>, sync: Arc<dyn SyncOverride>) -> Self {
        Self { store, sync }
    }

    /// Resolve the environments of a tenant
    ///
    /// Never returns an empty list unless the sync override itself supplies
    /// one. Refuses unknown tenants so the bootstrap write cannot create a
    /// tenant as a side effect.
    pub async fn resolve(&self, tenant: &str) -> Result<Vec<String>> {
        let exists = self
            .store
            .tenant_exists(tenant)
            .await
            .map_err(LifecycleError::dependency("check tenant", tenant))?;
        if !exists {
            return Err(LifecycleError::NotFound(format!(
                "Project \"{}\" could not be found",
                tenant
            )));
        }

        if let Some(remote) = self.remote_environments(tenant).await? {
            tracing::debug!(
                "Using {} remote environments for tenant \"{}\"",
                remote.len(),
                tenant
            );
            return Ok(remote);
        }

        let local = self.local_environments(tenant).await?;
        if !local.is_empty() {
            return Ok(local);
        }

        self.bootstrap(tenant).await
    }

    /// Whether a remote sync source owns the tenant's environment list
    pub async fn is_overridden(&self, tenant: &str) -> Result<bool> {
        Ok(self.remote_environments(tenant).await?.is_some())
    }

    /// Ask the sync override for a list; anything but an array of strings
    /// counts as no override
    async fn remote_environments(&self, tenant: &str) -> Result<Option<Vec<String>>> {
        let value = self
            .sync
            .get_override_resource(tenant, None, ResourceKind::Environments)
            .await
            .map_err(LifecycleError::dependency("fetch remote environments", tenant))?;

        let Some(value) = value else {
            return Ok(None);
        };

        let names = match &value {
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>(),
            _ => None,
        };

        if names.is_none() {
            tracing::warn!(
                "Ignoring malformed remote environment list for tenant \"{}\": {}",
                tenant,
                value
            );
        }

        Ok(names)
    }

    /// Distinct `usedBy` values of the local settings records, first-seen order
    async fn local_environments(&self, tenant: &str) -> Result<Vec<String>> {
        let records = self
            .store
            .find_documents(tenant, SETTINGS_PARTITION, &Filter::all())
            .await
            .map_err(LifecycleError::dependency("read settings records", tenant))?;

        let mut names: Vec<String> = Vec::new();
        for name in records.iter().filter_map(used_by) {
            if name == PROJECT_SENTINEL || names.iter().any(|n| n == name) {
                continue;
            }
            names.push(name.to_string());
        }

        Ok(names)
    }

    async fn bootstrap(&self, tenant: &str) -> Result<Vec<String>> {
        tracing::info!(
            "Tenant \"{}\" has no environments, registering \"{}\"",
            tenant,
            DEFAULT_ENVIRONMENT
        );

        let mut record = Document::new();
        record.insert(
            USED_BY_FIELD.to_string(),
            Value::String(DEFAULT_ENVIRONMENT.to_string()),
        );

        self.store
            .insert_document(tenant, SETTINGS_PARTITION, record, InsertOptions::upsert())
            .await
            .map_err(LifecycleError::dependency("register default environment", tenant))?;

        Ok(vec![DEFAULT_ENVIRONMENT.to_string()])
    }
}
