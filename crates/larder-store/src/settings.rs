//! Settings records on top of a document store

use async_trait::async_trait;
use larder_domain::naming::{PROJECT_SENTINEL, SETTINGS_PARTITION, USED_BY_FIELD};
use larder_domain::traits::{CollabResult, DocumentStore, SettingsService};
use larder_domain::{CollaboratorError, Document, Filter};
use serde_json::Value;
use std::sync::Arc;

/// [`SettingsService`] storing one record per owner in the `settings` partition
///
/// The owner is an environment name, or the `"project"` sentinel for the
/// tenant-level record. Callers never see the `usedBy` tag itself.
pub struct DocumentSettings {
    store: Arc<dyn DocumentStore>,
}

impl DocumentSettings {
    /// Create a settings service over a store
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn owner(environment: Option<&str>) -> &str {
        environment.unwrap_or(PROJECT_SENTINEL)
    }

    async fn load(&self, tenant: &str, owner: &str) -> CollabResult<Option<Document>> {
        let records = self
            .store
            .find_documents(tenant, SETTINGS_PARTITION, &Filter::eq(USED_BY_FIELD, owner))
            .await?;
        Ok(records.into_iter().next())
    }
}

#[async_trait]
impl SettingsService for DocumentSettings {
    async fn get_settings(
        &self,
        tenant: &str,
        environment: Option<&str>,
        key: Option<&str>,
    ) -> CollabResult<Value> {
        let mut record = self
            .load(tenant, Self::owner(environment))
            .await?
            .unwrap_or_default();
        record.remove(USED_BY_FIELD);

        Ok(match key {
            Some(key) => record
                .remove(key)
                .unwrap_or_else(|| Value::Object(Document::new())),
            None => Value::Object(record),
        })
    }

    async fn set_settings(
        &self,
        tenant: &str,
        environment: Option<&str>,
        key: Option<&str>,
        value: Value,
        upsert: bool,
    ) -> CollabResult<()> {
        let owner = Self::owner(environment);

        let mut record = match self.load(tenant, owner).await? {
            Some(record) => record,
            None if upsert => Document::new(),
            None => {
                return Err(CollaboratorError::NotFound(format!(
                    "Settings for \"{}\" in tenant \"{}\"",
                    owner, tenant
                )))
            }
        };

        match key {
            Some(key) => {
                record.insert(key.to_string(), value);
            }
            None => match value {
                Value::Object(map) => record = map,
                other => {
                    return Err(CollaboratorError::InvalidData(format!(
                        "Settings must be an object, got {}",
                        other
                    )))
                }
            },
        }
        record.insert(USED_BY_FIELD.to_string(), Value::String(owner.to_string()));

        self.store
            .replace_documents(
                tenant,
                SETTINGS_PARTITION,
                &Filter::eq(USED_BY_FIELD, owner),
                record,
            )
            .await
    }
}
