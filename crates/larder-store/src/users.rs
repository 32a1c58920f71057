//! Statically configured user directory

use async_trait::async_trait;
use larder_domain::traits::{CollabResult, UserDirectory};
use larder_domain::{CollaboratorError, User};

/// [`UserDirectory`] backed by a fixed list of users
#[derive(Debug, Clone, Default)]
pub struct ConfiguredUserDirectory {
    users: Vec<User>,
}

impl ConfiguredUserDirectory {
    /// Create a directory from a list of users
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserDirectory for ConfiguredUserDirectory {
    async fn get_user_by_id(&self, id: &str) -> CollabResult<User> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound(format!("User \"{}\"", id)))
    }

    async fn users_for_tenant(&self, tenant: &str) -> CollabResult<Vec<User>> {
        Ok(self
            .users
            .iter()
            .filter(|u| u.has_scope(tenant))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> ConfiguredUserDirectory {
        ConfiguredUserDirectory::new(vec![
            User {
                id: "u1".to_string(),
                username: "admin".to_string(),
                is_admin: true,
                projects: vec!["acme".to_string()],
            },
            User {
                id: "u2".to_string(),
                username: "editor".to_string(),
                is_admin: false,
                projects: vec!["globex".to_string()],
            },
        ])
    }

    #[tokio::test]
    async fn test_get_user_by_id() {
        let user = directory().get_user_by_id("u1").await.unwrap();
        assert!(user.is_admin);
        assert_eq!(user.username, "admin");
    }

    #[tokio::test]
    async fn test_missing_user() {
        let err = directory().get_user_by_id("nobody").await.unwrap_err();
        assert!(matches!(err, CollaboratorError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_users_for_tenant() {
        let users = directory().users_for_tenant("globex").await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, "u2");
    }
}
