//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use larder_domain::BackupRef;
use std::path::PathBuf;

/// Larder - Manage projects, their environments and backups.
#[derive(Debug, Parser)]
#[command(name = "larder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Requesting user id (defaults to `default_user` from the config)
    #[arg(short, long, global = true, env = "LARDER_USER")]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (names only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all projects
    Projects,

    /// Show a project's settings, environments, backups and users
    Show {
        /// Project name
        project: String,
    },

    /// Create a project (administrators only)
    Create {
        /// Project name
        name: String,
    },

    /// Delete a project
    Delete(DeleteArgs),

    /// Manage a project's environments
    Env(EnvArgs),

    /// Manage a project's backups
    Backup(BackupArgs),
}

/// Arguments for the delete command.
#[derive(Debug, Parser)]
pub struct DeleteArgs {
    /// Project name
    pub project: String,

    /// Drop the project without snapshotting it first
    #[arg(long)]
    pub no_backup: bool,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Arguments for environment management.
#[derive(Debug, Parser)]
pub struct EnvArgs {
    #[command(subcommand)]
    pub action: EnvAction,
}

/// Environment management actions.
#[derive(Debug, Subcommand)]
pub enum EnvAction {
    /// List a project's environments
    List {
        /// Project name
        project: String,
    },

    /// Register an environment
    Add {
        /// Project name
        project: String,
        /// Environment name
        name: String,
    },

    /// Delete an environment and all of its collections
    Remove {
        /// Project name
        project: String,
        /// Environment name
        name: String,
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Arguments for backup management.
#[derive(Debug, Parser)]
pub struct BackupArgs {
    #[command(subcommand)]
    pub action: BackupAction,
}

/// Backup management actions.
#[derive(Debug, Subcommand)]
pub enum BackupAction {
    /// List a project's backups
    List {
        /// Project name
        project: String,
    },

    /// Snapshot a project
    Create {
        /// Project name
        project: String,
    },

    /// Replace a project's content with a backup (administrators only)
    Restore {
        /// Project name
        project: String,
        /// Backup timestamp
        backup: BackupRef,
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Delete a backup (administrators only)
    Delete {
        /// Project name
        project: String,
        /// Backup timestamp
        backup: BackupRef,
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_command() {
        let cli = Cli::try_parse_from(["larder", "delete", "acme", "--no-backup", "--yes"]).unwrap();
        match cli.command {
            Command::Delete(args) => {
                assert_eq!(args.project, "acme");
                assert!(args.no_backup);
                assert!(args.yes);
            }
            _ => panic!("Expected Delete command"),
        }
    }

    #[test]
    fn test_env_remove_command() {
        let cli = Cli::try_parse_from(["larder", "env", "remove", "acme", "dev"]).unwrap();
        match cli.command {
            Command::Env(EnvArgs {
                action: EnvAction::Remove { project, name, yes },
            }) => {
                assert_eq!(project, "acme");
                assert_eq!(name, "dev");
                assert!(!yes);
            }
            _ => panic!("Expected Env Remove command"),
        }
    }

    #[test]
    fn test_backup_restore_parses_reference() {
        let cli = Cli::try_parse_from(["larder", "backup", "restore", "acme", "1700000000123"]).unwrap();
        match cli.command {
            Command::Backup(BackupArgs {
                action: BackupAction::Restore { backup, .. },
            }) => assert_eq!(backup, BackupRef::new(1_700_000_000_123)),
            _ => panic!("Expected Backup Restore command"),
        }
    }

    #[test]
    fn test_invalid_backup_reference() {
        let result = Cli::try_parse_from(["larder", "backup", "restore", "acme", "yesterday"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "larder", "projects", "--format", "json", "--no-color", "--user", "u1", "--config",
            "/tmp/larder.toml",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Projects));
        assert_eq!(cli.format, Some(CliFormat::Json));
        assert!(cli.no_color);
        assert_eq!(cli.user.as_deref(), Some("u1"));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/larder.toml")));
    }

    #[test]
    fn test_command_required() {
        assert!(Cli::try_parse_from(["larder"]).is_err());
    }
}
