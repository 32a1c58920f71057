//! Filesystem snapshots of tenant databases

use crate::now_millis;
use async_trait::async_trait;
use larder_domain::traits::{BackupService, CollabResult, DocumentStore};
use larder_domain::{BackupRef, CollaboratorError, Document, Filter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// On-disk snapshot format
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    tenant: String,
    timestamp: u64,
    partitions: BTreeMap<String, Vec<Document>>,
}

/// [`BackupService`] writing `<root>/<tenant>/<timestamp>.json`
pub struct FsBackupStore {
    root: PathBuf,
    store: Arc<dyn DocumentStore>,
}

impl FsBackupStore {
    /// Create a backup store rooted at a directory
    ///
    /// The directory is created on first backup.
    pub fn new<P: AsRef<Path>>(root: P, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            store,
        }
    }

    fn tenant_dir(&self, tenant: &str) -> PathBuf {
        self.root.join(tenant)
    }

    fn backup_path(&self, tenant: &str, backup: &BackupRef) -> PathBuf {
        self.tenant_dir(tenant).join(format!("{}.json", backup.timestamp))
    }

    /// Claim a file for a new snapshot, bumping the timestamp on collision
    async fn reserve(&self, tenant: &str) -> CollabResult<(BackupRef, fs::File)> {
        let mut backup = BackupRef::new(now_millis());
        loop {
            let path = self.backup_path(tenant, &backup);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((backup, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => backup.timestamp += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn read_snapshot(&self, tenant: &str, backup: &BackupRef) -> CollabResult<Snapshot> {
        let path = self.backup_path(tenant, backup);
        let contents = fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                CollaboratorError::NotFound(format!("Backup {} of tenant \"{}\"", backup, tenant))
            } else {
                e.into()
            }
        })?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[async_trait]
impl BackupService for FsBackupStore {
    async fn create_backup(&self, tenant: &str) -> CollabResult<BackupRef> {
        let mut partitions = BTreeMap::new();
        for partition in self.store.list_partitions(tenant).await? {
            let docs = self
                .store
                .find_documents(tenant, &partition.name, &Filter::all())
                .await?;
            partitions.insert(partition.name, docs);
        }

        fs::create_dir_all(self.tenant_dir(tenant)).await?;
        let (backup, mut file) = self.reserve(tenant).await?;

        let snapshot = Snapshot {
            tenant: tenant.to_string(),
            timestamp: backup.timestamp,
            partitions,
        };
        let body = serde_json::to_vec_pretty(&snapshot)?;
        file.write_all(&body).await?;
        file.flush().await?;

        tracing::info!(
            "Created backup {} of tenant \"{}\" ({} partitions)",
            backup,
            tenant,
            snapshot.partitions.len()
        );
        Ok(backup)
    }

    async fn list_backups(&self, tenant: &str) -> CollabResult<Vec<BackupRef>> {
        let mut entries = match fs::read_dir(self.tenant_dir(tenant)).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut backups = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(backup) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<BackupRef>().ok())
            {
                backups.push(backup);
            }
        }

        backups.sort();
        Ok(backups)
    }

    async fn restore_backup(&self, tenant: &str, backup: &BackupRef) -> CollabResult<()> {
        let snapshot = self.read_snapshot(tenant, backup).await?;
        if snapshot.tenant != tenant {
            return Err(CollaboratorError::InvalidData(format!(
                "Backup {} belongs to tenant \"{}\", not \"{}\"",
                backup, snapshot.tenant, tenant
            )));
        }

        let partitions = snapshot.partitions.len();
        self.store.replace_tenant(tenant, snapshot.partitions).await?;

        tracing::info!(
            "Restored tenant \"{}\" from backup {} ({} partitions)",
            tenant,
            backup,
            partitions
        );
        Ok(())
    }

    async fn delete_backup(&self, tenant: &str, backup: &BackupRef) -> CollabResult<()> {
        match fs::remove_file(self.backup_path(tenant, backup)).await {
            Ok(()) => {
                tracing::info!("Deleted backup {} of tenant \"{}\"", backup, tenant);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(CollaboratorError::NotFound(
                format!("Backup {} of tenant \"{}\"", backup, tenant),
            )),
            Err(e) => Err(e.into()),
        }
    }
}
