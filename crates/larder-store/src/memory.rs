//! In-memory document store (for testing and scratch runs)

use async_trait::async_trait;
use larder_domain::traits::{CollabResult, DocumentStore, PartitionInfo};
use larder_domain::{CollaboratorError, Document, Filter, InsertOptions};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

type Partitions = BTreeMap<String, Vec<Document>>;

/// In-memory [`DocumentStore`] with the same semantics as the SQLite store
#[derive(Default)]
pub struct MemoryDocumentStore {
    tenants: RwLock<BTreeMap<String, Partitions>>,
}

impl MemoryDocumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> CollabResult<RwLockReadGuard<'_, BTreeMap<String, Partitions>>> {
        self.tenants
            .read()
            .map_err(|_| CollaboratorError::Unavailable("memory store lock poisoned".into()))
    }

    fn write(&self) -> CollabResult<RwLockWriteGuard<'_, BTreeMap<String, Partitions>>> {
        self.tenants
            .write()
            .map_err(|_| CollaboratorError::Unavailable("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list_tenants(&self) -> CollabResult<Vec<String>> {
        Ok(self.read()?.keys().cloned().collect())
    }

    async fn tenant_exists(&self, tenant: &str) -> CollabResult<bool> {
        Ok(self.read()?.contains_key(tenant))
    }

    async fn create_tenant(&self, tenant: &str, partition: &str, doc: Document) -> CollabResult<()> {
        let mut tenants = self.write()?;
        if tenants.contains_key(tenant) {
            return Err(CollaboratorError::AlreadyExists(tenant.to_string()));
        }

        let mut partitions = Partitions::new();
        partitions.insert(partition.to_string(), vec![doc]);
        tenants.insert(tenant.to_string(), partitions);
        Ok(())
    }

    async fn find_documents(
        &self,
        tenant: &str,
        partition: &str,
        filter: &Filter,
    ) -> CollabResult<Vec<Document>> {
        let tenants = self.read()?;
        Ok(tenants
            .get(tenant)
            .and_then(|partitions| partitions.get(partition))
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default())
    }

    async fn insert_document(
        &self,
        tenant: &str,
        partition: &str,
        doc: Document,
        options: InsertOptions,
    ) -> CollabResult<()> {
        let mut tenants = self.write()?;
        let docs = tenants
            .entry(tenant.to_string())
            .or_default()
            .entry(partition.to_string())
            .or_default();

        if options.upsert {
            let identity = Filter::from_document(&doc);
            if let Some(existing) = docs.iter_mut().find(|d| identity.matches(d)) {
                *existing = doc;
                return Ok(());
            }
        }

        docs.push(doc);
        Ok(())
    }

    async fn remove_documents(
        &self,
        tenant: &str,
        partition: &str,
        filter: &Filter,
    ) -> CollabResult<usize> {
        let mut tenants = self.write()?;
        let Some(docs) = tenants
            .get_mut(tenant)
            .and_then(|partitions| partitions.get_mut(partition))
        else {
            return Ok(0);
        };

        let before = docs.len();
        docs.retain(|d| !filter.matches(d));
        Ok(before - docs.len())
    }

    async fn replace_documents(
        &self,
        tenant: &str,
        partition: &str,
        filter: &Filter,
        doc: Document,
    ) -> CollabResult<()> {
        let mut tenants = self.write()?;
        let docs = tenants
            .entry(tenant.to_string())
            .or_default()
            .entry(partition.to_string())
            .or_default();
        docs.retain(|d| !filter.matches(d));
        docs.push(doc);
        Ok(())
    }

    async fn list_partitions(&self, tenant: &str) -> CollabResult<Vec<PartitionInfo>> {
        let tenants = self.read()?;
        Ok(tenants
            .get(tenant)
            .map(|partitions| {
                partitions
                    .keys()
                    .map(|name| PartitionInfo { name: name.clone() })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn drop_partition(&self, tenant: &str, partition: &str) -> CollabResult<()> {
        if let Some(partitions) = self.write()?.get_mut(tenant) {
            partitions.remove(partition);
        }
        Ok(())
    }

    async fn drop_tenant_database(&self, tenant: &str) -> CollabResult<()> {
        self.write()?.remove(tenant);
        Ok(())
    }

    async fn replace_tenant(
        &self,
        tenant: &str,
        partitions: BTreeMap<String, Vec<Document>>,
    ) -> CollabResult<()> {
        self.write()?.insert(tenant.to_string(), partitions);
        Ok(())
    }
}
