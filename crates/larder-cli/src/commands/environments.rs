//! Environment commands.

use crate::cli::{EnvAction, EnvArgs};
use crate::commands::confirm_project;
use crate::error::Result;
use crate::output::Formatter;
use larder_lifecycle::Orchestrator;

/// Execute an environment command.
pub async fn execute_env(
    args: EnvArgs,
    orchestrator: &Orchestrator,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        EnvAction::List { project } => {
            let environments = orchestrator.environments(&project).await?;
            println!("{}", formatter.format_environments(&environments)?);
        }
        EnvAction::Add { project, name } => {
            let name = orchestrator.add_environment(&project, &name).await?;
            if !formatter.is_quiet() {
                println!(
                    "{}",
                    formatter.success(&format!("Added environment '{}' to '{}'", name, project))
                );
            }
        }
        EnvAction::Remove { project, name, yes } => {
            remove_environment(&project, &name, orchestrator, formatter, |action| {
                confirm_project(&project, action, yes)
            })
            .await?;
        }
    }

    Ok(())
}

/// Delete an environment once `confirm` accepts the described action.
///
/// Nothing beyond the tenant check runs before confirmation; resolving the
/// environment list may register `"live"` on a tenant that has none.
async fn remove_environment(
    project: &str,
    name: &str,
    orchestrator: &Orchestrator,
    formatter: &Formatter,
    confirm: impl FnOnce(&str) -> Result<bool>,
) -> Result<bool> {
    orchestrator.check_tenant(project).await?;

    let action = format!(
        "delete environment '{}' and all of its collections from '{}'",
        name, project
    );
    if !confirm(&action)? {
        println!("{}", formatter.info("Operation cancelled"));
        return Ok(false);
    }

    if !orchestrator.environment_exists(project, name).await? {
        println!(
            "{}",
            formatter.warning(&format!(
                "Environment '{}' is not registered in '{}'",
                name, project
            ))
        );
    }

    orchestrator.delete_environment(project, name).await?;
    if !formatter.is_quiet() {
        println!(
            "{}",
            formatter.success(&format!("Deleted environment '{}' from '{}'", name, project))
        );
    }
    Ok(true)
}
