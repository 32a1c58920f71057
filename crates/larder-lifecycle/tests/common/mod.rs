//! Recording test doubles shared by the lifecycle tests

#![allow(dead_code)]

use async_trait::async_trait;
use larder_domain::traits::{
    BackupService, CollabResult, DocumentStore, PartitionInfo, ResourceKind, SyncOverride,
};
use larder_domain::{BackupRef, CollaboratorError, Document, Filter, InsertOptions, User};
use larder_lifecycle::{Collaborators, Orchestrator};
use larder_store::{ConfiguredUserDirectory, DocumentSettings, MemoryDocumentStore};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub const ADMIN: &str = "admin-1";
pub const EDITOR: &str = "editor-1";

/// Ordered log of collaborator calls, e.g. `"drop_partition:acme:dev.content"`
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn record(&self, call: String) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.calls().iter().position(|c| c.starts_with(prefix))
    }
}

const MUTATING: [&str; 7] = [
    "create_tenant",
    "insert_document",
    "remove_documents",
    "replace_documents",
    "drop_partition",
    "drop_tenant_database",
    "replace_tenant",
];

/// In-memory store that records every call before delegating
pub struct RecordingStore {
    pub inner: MemoryDocumentStore,
    log: CallLog,
}

impl RecordingStore {
    pub fn mutating_calls(&self) -> Vec<String> {
        self.log
            .calls()
            .into_iter()
            .filter(|c| MUTATING.iter().any(|m| c.starts_with(m)))
            .collect()
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    async fn list_tenants(&self) -> CollabResult<Vec<String>> {
        self.log.record("list_tenants".into());
        self.inner.list_tenants().await
    }

    async fn tenant_exists(&self, tenant: &str) -> CollabResult<bool> {
        self.log.record(format!("tenant_exists:{}", tenant));
        self.inner.tenant_exists(tenant).await
    }

    async fn create_tenant(&self, tenant: &str, partition: &str, doc: Document) -> CollabResult<()> {
        self.log.record(format!("create_tenant:{}", tenant));
        self.inner.create_tenant(tenant, partition, doc).await
    }

    async fn find_documents(
        &self,
        tenant: &str,
        partition: &str,
        filter: &Filter,
    ) -> CollabResult<Vec<Document>> {
        self.log.record(format!("find_documents:{}:{}", tenant, partition));
        self.inner.find_documents(tenant, partition, filter).await
    }

    async fn insert_document(
        &self,
        tenant: &str,
        partition: &str,
        doc: Document,
        options: InsertOptions,
    ) -> CollabResult<()> {
        self.log.record(format!("insert_document:{}:{}", tenant, partition));
        self.inner.insert_document(tenant, partition, doc, options).await
    }

    async fn remove_documents(
        &self,
        tenant: &str,
        partition: &str,
        filter: &Filter,
    ) -> CollabResult<usize> {
        self.log.record(format!("remove_documents:{}:{}", tenant, partition));
        self.inner.remove_documents(tenant, partition, filter).await
    }

    async fn replace_documents(
        &self,
        tenant: &str,
        partition: &str,
        filter: &Filter,
        doc: Document,
    ) -> CollabResult<()> {
        self.log.record(format!("replace_documents:{}:{}", tenant, partition));
        self.inner.replace_documents(tenant, partition, filter, doc).await
    }

    async fn list_partitions(&self, tenant: &str) -> CollabResult<Vec<PartitionInfo>> {
        self.log.record(format!("list_partitions:{}", tenant));
        self.inner.list_partitions(tenant).await
    }

    async fn drop_partition(&self, tenant: &str, partition: &str) -> CollabResult<()> {
        self.log.record(format!("drop_partition:{}:{}", tenant, partition));
        self.inner.drop_partition(tenant, partition).await
    }

    async fn drop_tenant_database(&self, tenant: &str) -> CollabResult<()> {
        self.log.record(format!("drop_tenant_database:{}", tenant));
        self.inner.drop_tenant_database(tenant).await
    }

    async fn replace_tenant(
        &self,
        tenant: &str,
        partitions: BTreeMap<String, Vec<Document>>,
    ) -> CollabResult<()> {
        self.log.record(format!("replace_tenant:{}", tenant));
        self.inner.replace_tenant(tenant, partitions).await
    }
}

/// Backup double with failure injection
pub struct RecordingBackups {
    log: CallLog,
    next: AtomicU64,
    created: Mutex<Vec<BackupRef>>,
    pub fail_create: AtomicBool,
    pub fail_list: AtomicBool,
}

#[async_trait]
impl BackupService for RecordingBackups {
    async fn create_backup(&self, tenant: &str) -> CollabResult<BackupRef> {
        self.log.record(format!("create_backup:{}", tenant));
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(CollaboratorError::Unavailable("backup volume offline".into()));
        }
        let backup = BackupRef::new(self.next.fetch_add(1, Ordering::SeqCst));
        self.created.lock().unwrap().push(backup);
        Ok(backup)
    }

    async fn list_backups(&self, tenant: &str) -> CollabResult<Vec<BackupRef>> {
        self.log.record(format!("list_backups:{}", tenant));
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(CollaboratorError::Unavailable("backup volume offline".into()));
        }
        Ok(self.created.lock().unwrap().clone())
    }

    async fn restore_backup(&self, tenant: &str, backup: &BackupRef) -> CollabResult<()> {
        self.log.record(format!("restore_backup:{}:{}", tenant, backup));
        if self.created.lock().unwrap().contains(backup) {
            Ok(())
        } else {
            Err(CollaboratorError::NotFound(backup.to_string()))
        }
    }

    async fn delete_backup(&self, tenant: &str, backup: &BackupRef) -> CollabResult<()> {
        self.log.record(format!("delete_backup:{}:{}", tenant, backup));
        let mut created = self.created.lock().unwrap();
        let before = created.len();
        created.retain(|b| b != backup);
        if created.len() == before {
            Err(CollaboratorError::NotFound(backup.to_string()))
        } else {
            Ok(())
        }
    }
}

/// Sync override answering every environments request with a fixed value
pub struct FixedOverride(pub Option<Value>);

#[async_trait]
impl SyncOverride for FixedOverride {
    async fn get_override_resource(
        &self,
        _tenant: &str,
        _environment: Option<&str>,
        kind: ResourceKind,
    ) -> CollabResult<Option<Value>> {
        match kind {
            ResourceKind::Environments => Ok(self.0.clone()),
            _ => Ok(None),
        }
    }
}

pub struct Harness {
    pub orchestrator: Orchestrator,
    pub store: Arc<RecordingStore>,
    pub backups: Arc<RecordingBackups>,
    pub log: CallLog,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_override(None)
    }

    pub fn with_override(value: Option<Value>) -> Self {
        let log = CallLog::default();
        let store = Arc::new(RecordingStore {
            inner: MemoryDocumentStore::new(),
            log: log.clone(),
        });
        let backups = Arc::new(RecordingBackups {
            log: log.clone(),
            next: AtomicU64::new(1),
            created: Mutex::new(Vec::new()),
            fail_create: AtomicBool::new(false),
            fail_list: AtomicBool::new(false),
        });
        let users = ConfiguredUserDirectory::new(vec![
            User {
                id: ADMIN.to_string(),
                username: "admin".to_string(),
                is_admin: true,
                projects: vec!["acme".to_string()],
            },
            User {
                id: EDITOR.to_string(),
                username: "editor".to_string(),
                is_admin: false,
                projects: vec!["acme".to_string()],
            },
        ]);

        let orchestrator = Orchestrator::new(Collaborators {
            store: store.clone(),
            backups: backups.clone(),
            sync: Arc::new(FixedOverride(value)),
            settings: Arc::new(DocumentSettings::new(store.clone())),
            users: Arc::new(users),
        });

        Self {
            orchestrator,
            store,
            backups,
            log,
        }
    }

    /// Insert a document without recording the call
    pub async fn seed(&self, tenant: &str, partition: &str, doc: Value) {
        let doc = doc.as_object().cloned().expect("seed documents are objects");
        self.store
            .inner
            .insert_document(tenant, partition, doc, InsertOptions::insert())
            .await
            .unwrap();
    }

    pub fn fail_backups(&self) {
        self.backups.fail_create.store(true, Ordering::SeqCst);
    }
}
