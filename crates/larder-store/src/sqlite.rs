//! SQLite-backed document store

use crate::{now_millis, StoreError};
use async_trait::async_trait;
use larder_domain::traits::{CollabResult, DocumentStore, PartitionInfo};
use larder_domain::{Document, Filter, InsertOptions};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite-based implementation of [`DocumentStore`]
///
/// Every tenant is a row in `tenants`; its partitions and JSON documents hang
/// off it with cascading foreign keys, so dropping a tenant or a partition is
/// a single delete.
///
/// # Thread Safety
///
/// The connection sits behind a mutex. Calls are short and never hold the
/// lock across an await point.
pub struct SqliteDocumentStore {
    conn: Mutex<Connection>,
}

impl SqliteDocumentStore {
    /// Create a new store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use larder_store::SqliteDocumentStore;
    ///
    /// let store = SqliteDocumentStore::new("larder.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Make sure the tenant and partition rows exist
    fn ensure_partition(conn: &Connection, tenant: &str, partition: &str) -> Result<(), StoreError> {
        conn.execute(
            "INSERT OR IGNORE INTO tenants (name, created_at) VALUES (?1, ?2)",
            params![tenant, now_millis() as i64],
        )?;
        conn.execute(
            "INSERT OR IGNORE INTO partitions (tenant, name) VALUES (?1, ?2)",
            params![tenant, partition],
        )?;
        Ok(())
    }

    /// Load every document of a partition with its row id
    fn load_documents(
        conn: &Connection,
        tenant: &str,
        partition: &str,
    ) -> Result<Vec<(i64, Document)>, StoreError> {
        let mut stmt = conn.prepare(
            "SELECT id, body FROM documents WHERE tenant = ?1 AND partition = ?2 ORDER BY id",
        )?;

        let rows = stmt
            .query_map(params![tenant, partition], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, body)| Ok((id, serde_json::from_str::<Document>(&body)?)))
            .collect()
    }

    fn insert_row(
        conn: &Connection,
        tenant: &str,
        partition: &str,
        doc: &Document,
    ) -> Result<(), StoreError> {
        conn.execute(
            "INSERT INTO documents (tenant, partition, body) VALUES (?1, ?2, ?3)",
            params![tenant, partition, serde_json::to_string(doc)?],
        )?;
        Ok(())
    }
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    matches!(e, rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation)
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn list_tenants(&self) -> CollabResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT name FROM tenants ORDER BY name")
            .map_err(StoreError::from)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
            .map_err(StoreError::from)?;
        Ok(names)
    }

    async fn tenant_exists(&self, tenant: &str) -> CollabResult<bool> {
        let conn = self.lock()?;
        let exists = conn
            .query_row(
                "SELECT 1 FROM tenants WHERE name = ?1",
                params![tenant],
                |_| Ok(true),
            )
            .optional()
            .map_err(StoreError::from)?
            .unwrap_or(false);
        Ok(exists)
    }

    async fn create_tenant(&self, tenant: &str, partition: &str, doc: Document) -> CollabResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(StoreError::from)?;

        // The primary key is the uniqueness guarantee; a concurrent creator
        // loses here rather than at the existence pre-check.
        if let Err(e) = tx.execute(
            "INSERT INTO tenants (name, created_at) VALUES (?1, ?2)",
            params![tenant, now_millis() as i64],
        ) {
            if is_constraint_violation(&e) {
                return Err(StoreError::TenantExists(tenant.to_string()).into());
            }
            return Err(StoreError::from(e).into());
        }

        Self::ensure_partition(&tx, tenant, partition)?;
        Self::insert_row(&tx, tenant, partition, &doc)?;
        tx.commit().map_err(StoreError::from)?;
        Ok(())
    }

    async fn find_documents(
        &self,
        tenant: &str,
        partition: &str,
        filter: &Filter,
    ) -> CollabResult<Vec<Document>> {
        let conn = self.lock()?;
        let docs = Self::load_documents(&conn, tenant, partition)?;
        Ok(docs
            .into_iter()
            .map(|(_, doc)| doc)
            .filter(|doc| filter.matches(doc))
            .collect())
    }

    async fn insert_document(
        &self,
        tenant: &str,
        partition: &str,
        doc: Document,
        options: InsertOptions,
    ) -> CollabResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(StoreError::from)?;
        Self::ensure_partition(&tx, tenant, partition)?;

        let existing = if options.upsert {
            let identity = Filter::from_document(&doc);
            Self::load_documents(&tx, tenant, partition)?
                .into_iter()
                .find(|(_, d)| identity.matches(d))
                .map(|(id, _)| id)
        } else {
            None
        };

        match existing {
            Some(id) => {
                let body = serde_json::to_string(&doc).map_err(StoreError::from)?;
                tx.execute(
                    "UPDATE documents SET body = ?1 WHERE id = ?2",
                    params![body, id],
                )
                .map_err(StoreError::from)?;
            }
            None => Self::insert_row(&tx, tenant, partition, &doc)?,
        }

        tx.commit().map_err(StoreError::from)?;
        Ok(())
    }

    async fn remove_documents(
        &self,
        tenant: &str,
        partition: &str,
        filter: &Filter,
    ) -> CollabResult<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(StoreError::from)?;

        let ids: Vec<i64> = Self::load_documents(&tx, tenant, partition)?
            .into_iter()
            .filter(|(_, doc)| filter.matches(doc))
            .map(|(id, _)| id)
            .collect();

        for id in &ids {
            tx.execute("DELETE FROM documents WHERE id = ?1", params![id])
                .map_err(StoreError::from)?;
        }

        tx.commit().map_err(StoreError::from)?;
        Ok(ids.len())
    }

    async fn replace_documents(
        &self,
        tenant: &str,
        partition: &str,
        filter: &Filter,
        doc: Document,
    ) -> CollabResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(StoreError::from)?;
        Self::ensure_partition(&tx, tenant, partition)?;

        for (id, existing) in Self::load_documents(&tx, tenant, partition)? {
            if filter.matches(&existing) {
                tx.execute("DELETE FROM documents WHERE id = ?1", params![id])
                    .map_err(StoreError::from)?;
            }
        }
        Self::insert_row(&tx, tenant, partition, &doc)?;

        tx.commit().map_err(StoreError::from)?;
        Ok(())
    }

    async fn list_partitions(&self, tenant: &str) -> CollabResult<Vec<PartitionInfo>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT name FROM partitions WHERE tenant = ?1 ORDER BY name")
            .map_err(StoreError::from)?;
        let partitions = stmt
            .query_map(params![tenant], |row| {
                Ok(PartitionInfo {
                    name: row.get(0)?,
                })
            })
            .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
            .map_err(StoreError::from)?;
        Ok(partitions)
    }

    async fn drop_partition(&self, tenant: &str, partition: &str) -> CollabResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "DELETE FROM partitions WHERE tenant = ?1 AND name = ?2",
            params![tenant, partition],
        )
        .map_err(StoreError::from)?;
        Ok(())
    }

    async fn drop_tenant_database(&self, tenant: &str) -> CollabResult<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM tenants WHERE name = ?1", params![tenant])
            .map_err(StoreError::from)?;
        Ok(())
    }

    async fn replace_tenant(
        &self,
        tenant: &str,
        partitions: BTreeMap<String, Vec<Document>>,
    ) -> CollabResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(StoreError::from)?;

        tx.execute("DELETE FROM tenants WHERE name = ?1", params![tenant])
            .map_err(StoreError::from)?;
        tx.execute(
            "INSERT INTO tenants (name, created_at) VALUES (?1, ?2)",
            params![tenant, now_millis() as i64],
        )
        .map_err(StoreError::from)?;
        for (partition, docs) in &partitions {
            Self::ensure_partition(&tx, tenant, partition)?;
            for doc in docs {
                Self::insert_row(&tx, tenant, partition, doc)?;
            }
        }

        tx.commit().map_err(StoreError::from)?;
        Ok(())
    }
}
