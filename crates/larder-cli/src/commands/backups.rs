//! Backup commands.

use crate::cli::{BackupAction, BackupArgs};
use crate::commands::confirm_project;
use crate::error::Result;
use crate::output::Formatter;
use larder_lifecycle::Orchestrator;

/// Execute a backup command.
///
/// `user` is only consulted for restore and delete, which require an
/// administrator.
pub async fn execute_backup(
    args: BackupArgs,
    user: Option<&str>,
    orchestrator: &Orchestrator,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        BackupAction::List { project } => {
            let backups = orchestrator.list_backups(&project).await?;
            println!("{}", formatter.format_backups(&backups)?);
        }
        BackupAction::Create { project } => {
            let backup = orchestrator.create_backup(&project).await?;
            if formatter.is_quiet() {
                println!("{}", backup);
            } else {
                println!(
                    "{}",
                    formatter.success(&format!("Created backup {} of '{}'", backup, project))
                );
            }
        }
        BackupAction::Restore {
            project,
            backup,
            yes,
        } => {
            let user = super::requesting_user(user)?;
            let action = format!(
                "replace all content of '{}' with backup {}",
                project, backup
            );
            if !confirm_project(&project, &action, yes)? {
                println!("{}", formatter.info("Operation cancelled"));
                return Ok(());
            }

            orchestrator.restore_backup(&project, &backup, &user).await?;
            if !formatter.is_quiet() {
                println!(
                    "{}",
                    formatter.success(&format!("Restored '{}' to backup {}", project, backup))
                );
            }
        }
        BackupAction::Delete {
            project,
            backup,
            yes,
        } => {
            let user = super::requesting_user(user)?;
            let action = format!("delete backup {} of '{}'", backup, project);
            if !confirm_project(&project, &action, yes)? {
                println!("{}", formatter.info("Operation cancelled"));
                return Ok(());
            }

            orchestrator.delete_backup(&project, &backup, &user).await?;
            if !formatter.is_quiet() {
                println!(
                    "{}",
                    formatter.success(&format!("Deleted backup {} of '{}'", backup, project))
                );
            }
        }
    }

    Ok(())
}
