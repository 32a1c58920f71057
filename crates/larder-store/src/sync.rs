//! Statically configured sync overrides

use async_trait::async_trait;
use larder_domain::traits::{CollabResult, ResourceKind, SyncOverride};
use serde_json::Value;
use std::collections::HashMap;

/// [`SyncOverride`] answering from a fixed tenant-to-environments map
///
/// Stands in for a remote sync source: a tenant listed here has its
/// environment list dictated by the map, regardless of local records.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredSyncOverride {
    environments: HashMap<String, Vec<String>>,
}

impl ConfiguredSyncOverride {
    /// Create an override from a tenant-to-environments map
    pub fn new(environments: HashMap<String, Vec<String>>) -> Self {
        Self { environments }
    }

    /// Override that never applies
    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SyncOverride for ConfiguredSyncOverride {
    async fn get_override_resource(
        &self,
        tenant: &str,
        environment: Option<&str>,
        kind: ResourceKind,
    ) -> CollabResult<Option<Value>> {
        if environment.is_some() || kind != ResourceKind::Environments {
            return Ok(None);
        }

        Ok(self
            .environments
            .get(tenant)
            .map(|envs| Value::from(envs.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_configured_tenant_is_overridden() {
        let mut map = HashMap::new();
        map.insert("acme".to_string(), vec!["staging".to_string(), "prod".to_string()]);
        let sync = ConfiguredSyncOverride::new(map);

        let value = sync
            .get_override_resource("acme", None, ResourceKind::Environments)
            .await
            .unwrap();
        assert_eq!(value, Some(json!(["staging", "prod"])));
    }

    #[tokio::test]
    async fn test_unknown_tenant_has_no_override() {
        let sync = ConfiguredSyncOverride::empty();
        let value = sync
            .get_override_resource("acme", None, ResourceKind::Environments)
            .await
            .unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_environment_scoped_request_has_no_override() {
        let mut map = HashMap::new();
        map.insert("acme".to_string(), vec!["live".to_string()]);
        let sync = ConfiguredSyncOverride::new(map);

        let value = sync
            .get_override_resource("acme", Some("live"), ResourceKind::Environments)
            .await
            .unwrap();
        assert_eq!(value, None);
    }
}
