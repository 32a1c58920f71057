//! Filesystem backup tests

use larder_domain::traits::{BackupService, DocumentStore};
use larder_domain::{BackupRef, CollaboratorError, Document, Filter, InsertOptions};
use larder_store::{FsBackupStore, SqliteDocumentStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

fn doc(value: Value) -> Document {
    value.as_object().cloned().expect("test documents are objects")
}

async fn seeded_store() -> Arc<dyn DocumentStore> {
    let store: Arc<dyn DocumentStore> = Arc::new(SqliteDocumentStore::new(":memory:").unwrap());
    store
        .create_tenant("acme", "settings", doc(json!({"usedBy": "project"})))
        .await
        .unwrap();
    store
        .insert_document("acme", "live.content", doc(json!({"title": "Home"})), InsertOptions::insert())
        .await
        .unwrap();
    store
}

#[tokio::test]
async fn test_no_backups_initially() {
    let dir = TempDir::new().unwrap();
    let backups = FsBackupStore::new(dir.path(), seeded_store().await);

    assert!(backups.list_backups("acme").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_and_list_backups() {
    let dir = TempDir::new().unwrap();
    let backups = FsBackupStore::new(dir.path(), seeded_store().await);

    let first = backups.create_backup("acme").await.unwrap();
    let second = backups.create_backup("acme").await.unwrap();
    assert!(first < second, "Timestamps must be unique and increasing");

    let listed = backups.list_backups("acme").await.unwrap();
    assert_eq!(listed, vec![first, second]);
    assert!(dir.path().join("acme").join(format!("{}.json", first)).exists());
}

#[tokio::test]
async fn test_restore_replaces_content() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store().await;
    let backups = FsBackupStore::new(dir.path(), store.clone());

    let backup = backups.create_backup("acme").await.unwrap();

    // Mutate after the snapshot
    store.drop_partition("acme", "live.content").await.unwrap();
    store
        .insert_document("acme", "dev.content", doc(json!({"draft": true})), InsertOptions::insert())
        .await
        .unwrap();

    backups.restore_backup("acme", &backup).await.unwrap();

    let names: Vec<String> = store
        .list_partitions("acme")
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["live.content", "settings"]);

    let content = store
        .find_documents("acme", "live.content", &Filter::all())
        .await
        .unwrap();
    assert_eq!(content, vec![doc(json!({"title": "Home"}))]);
}

#[tokio::test]
async fn test_restore_recreates_empty_partitions() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store().await;
    let backups = FsBackupStore::new(dir.path(), store.clone());

    store
        .insert_document("acme", "dev.content", doc(json!({"n": 1})), InsertOptions::insert())
        .await
        .unwrap();
    store
        .remove_documents("acme", "dev.content", &Filter::all())
        .await
        .unwrap();
    let backup = backups.create_backup("acme").await.unwrap();

    store.drop_partition("acme", "dev.content").await.unwrap();
    backups.restore_backup("acme", &backup).await.unwrap();

    let names: Vec<String> = store
        .list_partitions("acme")
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["dev.content", "live.content", "settings"]);
}

#[tokio::test]
async fn test_restore_unknown_backup() {
    let dir = TempDir::new().unwrap();
    let backups = FsBackupStore::new(dir.path(), seeded_store().await);

    let err = backups
        .restore_backup("acme", &BackupRef::new(42))
        .await
        .unwrap_err();
    assert!(matches!(err, CollaboratorError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_backup() {
    let dir = TempDir::new().unwrap();
    let backups = FsBackupStore::new(dir.path(), seeded_store().await);

    let backup = backups.create_backup("acme").await.unwrap();
    backups.delete_backup("acme", &backup).await.unwrap();
    assert!(backups.list_backups("acme").await.unwrap().is_empty());

    let err = backups.delete_backup("acme", &backup).await.unwrap_err();
    assert!(matches!(err, CollaboratorError::NotFound(_)));
}

#[tokio::test]
async fn test_list_ignores_foreign_files() {
    let dir = TempDir::new().unwrap();
    let backups = FsBackupStore::new(dir.path(), seeded_store().await);

    let backup = backups.create_backup("acme").await.unwrap();
    std::fs::write(dir.path().join("acme").join("notes.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("acme").join("draft.json"), "{}").unwrap();

    assert_eq!(backups.list_backups("acme").await.unwrap(), vec![backup]);
}
