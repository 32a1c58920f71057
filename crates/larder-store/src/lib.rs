//! Larder Storage Layer
//!
//! Concrete implementations of the collaborator traits defined in
//! `larder-domain`.
//!
//! # Architecture
//!
//! - [`SqliteDocumentStore`]: tenants, partitions and JSON documents in SQLite
//! - [`MemoryDocumentStore`]: the same semantics in memory (tests, scratch runs)
//! - [`DocumentSettings`]: settings records on top of any document store
//! - [`FsBackupStore`]: JSON snapshots on disk, one directory per tenant
//! - [`ConfiguredSyncOverride`] / [`ConfiguredUserDirectory`]: static data from config
//!
//! # Examples
//!
//! ```no_run
//! use larder_store::SqliteDocumentStore;
//!
//! let store = SqliteDocumentStore::new(":memory:").unwrap();
//! // Store is now ready for tenant operations
//! ```

#![warn(missing_docs)]

mod backup;
mod error;
mod memory;
mod settings;
mod sqlite;
mod sync;
mod users;

pub use backup::FsBackupStore;
pub use error::StoreError;
pub use memory::MemoryDocumentStore;
pub use settings::DocumentSettings;
pub use sqlite::SqliteDocumentStore;
pub use sync::ConfiguredSyncOverride;
pub use users::ConfiguredUserDirectory;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time in milliseconds since the Unix epoch
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
