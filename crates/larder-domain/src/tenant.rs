//! Tenant (project) snapshots

use crate::naming::{PROJECT_SENTINEL, USED_BY_FIELD};
use crate::{BackupRef, Document, User};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Read-only view of a tenant, assembled fresh from collaborators on every
/// request and never persisted as a whole
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    /// Tenant name (also its database identifier)
    pub id: String,

    /// Tenant-level settings
    pub settings: Value,

    /// Resolved environment names
    pub environments: Vec<String>,

    /// Available snapshots
    pub backups: Vec<BackupRef>,

    /// Users scoped to this tenant
    pub users: Vec<User>,
}

/// Result of creating a tenant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedTenant {
    /// Tenant name
    pub id: String,

    /// Settings record written at creation
    pub settings: Document,
}

/// Default tenant-level settings record for a brand-new tenant
///
/// Tagged with the `"project"` sentinel so it is never mistaken for an
/// environment registration.
pub fn default_settings(name: &str) -> Document {
    let value = json!({
        USED_BY_FIELD: PROJECT_SENTINEL,
        "info": { "name": name },
        "sync": { "enabled": false },
    });

    match value {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}
