//! Wiring of the concrete collaborators behind the orchestrator.

use crate::config::Config;
use crate::error::Result;
use larder_domain::traits::DocumentStore;
use larder_lifecycle::{Collaborators, Orchestrator};
use larder_store::{
    ConfiguredSyncOverride, ConfiguredUserDirectory, DocumentSettings, FsBackupStore,
    SqliteDocumentStore,
};
use std::fs;
use std::sync::Arc;

/// Open storage as configured and build an orchestrator over it.
pub fn build_orchestrator(config: &Config) -> Result<Orchestrator> {
    if let Some(parent) = config.storage.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    tracing::debug!(
        "Opening database {} with backups in {}",
        config.storage.database_path.display(),
        config.storage.backup_dir.display()
    );

    let store: Arc<dyn DocumentStore> =
        Arc::new(SqliteDocumentStore::new(&config.storage.database_path)?);

    Ok(Orchestrator::new(Collaborators {
        store: store.clone(),
        backups: Arc::new(FsBackupStore::new(&config.storage.backup_dir, store.clone())),
        sync: Arc::new(ConfiguredSyncOverride::new(config.sync.clone())),
        settings: Arc::new(DocumentSettings::new(store)),
        users: Arc::new(ConfiguredUserDirectory::new(config.users.clone())),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_lifecycle::ErrorKind;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_orchestrator_over_configured_storage() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::parse(
            r#"
[[users]]
id = "root"
username = "root"
is_admin = true

[sync]
acme = ["prod"]
"#,
        )
        .unwrap();
        config.storage.database_path = dir.path().join("data").join("larder.db");
        config.storage.backup_dir = dir.path().join("backups");

        let orchestrator = build_orchestrator(&config).unwrap();
        orchestrator.create_tenant("acme", "root").await.unwrap();
        orchestrator.create_tenant("globex", "root").await.unwrap();

        assert_eq!(orchestrator.environments("acme").await.unwrap(), vec!["prod"]);
        assert_eq!(orchestrator.environments("globex").await.unwrap(), vec!["live"]);

        // Configured sync owns the environment list
        let err = orchestrator.add_environment("acme", "staging").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        let err = orchestrator.delete_environment("acme", "prod").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(!orchestrator.environment_exists("acme", "staging").await.unwrap());
        assert!(orchestrator.list_backups("acme").await.unwrap().is_empty());

        orchestrator.add_environment("globex", "staging").await.unwrap();
        assert!(orchestrator.environment_exists("globex", "staging").await.unwrap());

        let backup = orchestrator.create_backup("globex").await.unwrap();
        assert!(dir
            .path()
            .join("backups")
            .join("globex")
            .join(format!("{}.json", backup))
            .exists());
    }
}
