//! Naming conventions for tenants, environments and partitions
//!
//! An environment has no physical container of its own. It exists as:
//! - a settings record in the `settings` partition whose `usedBy` is the
//!   environment name, and
//! - every partition named `<environment>.<collection>`.
//!
//! All prefix construction and matching goes through [`PartitionName`] so the
//! separator convention lives in exactly one place.

use std::fmt;

/// Partition holding every settings record of a tenant
pub const SETTINGS_PARTITION: &str = "settings";

/// Field on a settings record naming its owner (an environment or the tenant)
pub const USED_BY_FIELD: &str = "usedBy";

/// `usedBy` value marking the tenant-level settings record
///
/// Never an environment name.
pub const PROJECT_SENTINEL: &str = "project";

/// Environment created when a tenant has none registered
pub const DEFAULT_ENVIRONMENT: &str = "live";

/// Separator between environment and collection in a partition name
pub const PARTITION_SEPARATOR: char = '.';

/// Validated tenant identifier
///
/// Doubles as the storage database name and the backup directory name, so it
/// must not contain path separators, dots, whitespace, `$` or NUL.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TenantName(String);

impl TenantName {
    /// Parse and validate a tenant name
    ///
    /// # Errors
    /// Returns a description of the problem if the name is empty or contains
    /// a reserved character.
    pub fn parse(value: &str) -> Result<Self, String> {
        if value.is_empty() {
            return Err("Tenant name cannot be empty".to_string());
        }

        if let Some(c) = value
            .chars()
            .find(|c| c.is_whitespace() || matches!(c, '/' | '\\' | '.' | '$' | '\0'))
        {
            return Err(format!(
                "Tenant name \"{}\" contains reserved character {:?}",
                value, c
            ));
        }

        Ok(Self(value.to_string()))
    }

    /// Get the tenant name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated environment name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnvironmentName(String);

impl EnvironmentName {
    /// Parse and validate an environment name
    ///
    /// # Errors
    /// Returns an error if the name is empty, contains whitespace or the
    /// partition separator, or equals the `"project"` sentinel.
    pub fn parse(value: &str) -> Result<Self, String> {
        if value.is_empty() {
            return Err("Environment name cannot be empty".to_string());
        }

        if value == PROJECT_SENTINEL {
            return Err(format!(
                "\"{}\" is reserved for tenant-level settings",
                PROJECT_SENTINEL
            ));
        }

        if value.contains(PARTITION_SEPARATOR) || value.chars().any(char::is_whitespace) {
            return Err(format!(
                "Environment name \"{}\" cannot contain whitespace or '{}'",
                value, PARTITION_SEPARATOR
            ));
        }

        Ok(Self(value.to_string()))
    }

    /// Get the environment name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The `environment.collection` partition naming scheme
pub struct PartitionName;

impl PartitionName {
    /// Build the partition name for a collection inside an environment
    pub fn compose(environment: &str, collection: &str) -> String {
        format!("{}{}{}", environment, PARTITION_SEPARATOR, collection)
    }

    /// Prefix shared by every partition of an environment (`"<env>."`)
    pub fn prefix(environment: &str) -> String {
        format!("{}{}", environment, PARTITION_SEPARATOR)
    }

    /// Whether a partition belongs to an environment
    ///
    /// Matching includes the separator, so `development.content` does not
    /// belong to `dev`.
    pub fn belongs_to(partition: &str, environment: &str) -> bool {
        partition
            .strip_prefix(environment)
            .is_some_and(|rest| rest.starts_with(PARTITION_SEPARATOR))
    }

    /// Split a partition name into `(environment, collection)`
    ///
    /// Returns `None` for tenant-level partitions such as `settings`.
    pub fn split(partition: &str) -> Option<(&str, &str)> {
        partition.split_once(PARTITION_SEPARATOR)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: a composed partition always belongs to its environment
        #[test]
        fn test_composed_belongs(env in "[a-z]{1,8}", collection in "[a-z]{1,8}") {
            let partition = PartitionName::compose(&env, &collection);
            prop_assert!(PartitionName::belongs_to(&partition, &env));
            prop_assert!(partition.starts_with(&PartitionName::prefix(&env)));
        }

        /// Property: an environment never claims the partitions of a longer
        /// environment that merely shares its spelling as a prefix
        #[test]
        fn test_no_overlap_with_longer_name(
            env in "[a-z]{1,8}",
            suffix in "[a-z]{1,4}",
            collection in "[a-z]{1,8}",
        ) {
            let longer = format!("{}{}", env, suffix);
            let partition = PartitionName::compose(&longer, &collection);
            prop_assert!(!PartitionName::belongs_to(&partition, &env));
        }
    }
}
