//! User identities as seen by the lifecycle core

use serde::{Deserialize, Serialize};

/// A user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: String,

    /// Display name
    #[serde(default)]
    pub username: String,

    /// Administrators may create tenants and restore backups
    #[serde(default)]
    pub is_admin: bool,

    /// Tenants this user has access to
    #[serde(default)]
    pub projects: Vec<String>,
}

impl User {
    /// Whether the user is scoped to a tenant
    pub fn has_scope(&self, tenant: &str) -> bool {
        self.projects.iter().any(|p| p == tenant)
    }
}
