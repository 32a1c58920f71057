//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use larder_domain::User;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// User acting when `--user` is not given
    #[serde(default)]
    pub default_user: Option<String>,

    /// Where tenant data and snapshots live
    #[serde(default)]
    pub storage: StorageSettings,

    /// Logging settings
    #[serde(default)]
    pub log: LogSettings,

    /// Output settings
    #[serde(default)]
    pub output: OutputSettings,

    /// Known users and their privileges
    #[serde(default)]
    pub users: Vec<User>,

    /// Tenants whose environments are owned by a remote source
    #[serde(default)]
    pub sync: HashMap<String, Vec<String>>,
}

/// Storage locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Snapshot directory
    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".larder").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `~/.larder/config.toml` is
    /// read if present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::default_path()?, false),
        };

        if !path.exists() {
            if required {
                return Err(CliError::Config(format!(
                    "Config file {} does not exist",
                    path.display()
                )));
            }
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)?;
        Self::parse(&contents)
    }

    /// Parse and validate a TOML document.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for user in &self.users {
            if user.id.is_empty() {
                return Err(CliError::Config("User ids must not be empty".into()));
            }
            if !seen.insert(user.id.as_str()) {
                return Err(CliError::Config(format!(
                    "User id '{}' is defined more than once",
                    user.id
                )));
            }
        }
        Ok(())
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            backup_dir: default_backup_dir(),
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn larder_home() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".larder"))
        .unwrap_or_else(|| PathBuf::from(".larder"))
}

fn default_database_path() -> PathBuf {
    larder_home().join("larder.db")
}

fn default_backup_dir() -> PathBuf {
    larder_home().join("backups")
}

fn default_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.output.color);
        assert_eq!(config.output.format, OutputFormat::Table);
        assert_eq!(config.log.level, "info");
        assert!(config.storage.database_path.ends_with("larder.db"));
        assert!(config.users.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
default_user = "u1"

[storage]
database_path = "/var/lib/larder/larder.db"
backup_dir = "/var/lib/larder/backups"

[log]
level = "debug"

[output]
format = "json"
color = false

[[users]]
id = "u1"
username = "admin"
is_admin = true

[[users]]
id = "u2"
username = "editor"
projects = ["acme"]

[sync]
acme = ["prod", "qa"]
"#,
        )
        .unwrap();

        assert_eq!(config.default_user.as_deref(), Some("u1"));
        assert_eq!(config.storage.backup_dir, PathBuf::from("/var/lib/larder/backups"));
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.output.color);
        assert_eq!(config.users.len(), 2);
        assert!(config.users[0].is_admin);
        assert!(!config.users[1].is_admin);
        assert_eq!(config.users[1].projects, vec!["acme"]);
        assert_eq!(config.sync["acme"], vec!["prod", "qa"]);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::parse("[log]\nlevel = \"warn\"\n").unwrap();
        assert_eq!(config.log.level, "warn");
        assert_eq!(config.output.format, OutputFormat::Table);
        assert!(config.storage.backup_dir.ends_with("backups"));
    }

    #[test]
    fn test_duplicate_user_ids_rejected() {
        let result = Config::parse(
            r#"
[[users]]
id = "u1"
username = "a"

[[users]]
id = "u1"
username = "b"
"#,
        );
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_empty_user_id_rejected() {
        let result = Config::parse("[[users]]\nid = \"\"\nusername = \"a\"\n");
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_invalid_toml() {
        let result = Config::parse("[output\nformat = json");
        assert!(matches!(result, Err(CliError::Toml(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "default_user = \"ops\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.default_user.as_deref(), Some("ops"));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = Config::load(Some(Path::new("/nonexistent/larder.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
