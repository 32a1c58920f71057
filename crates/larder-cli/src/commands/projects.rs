//! Project commands.

use crate::cli::DeleteArgs;
use crate::commands::confirm_project;
use crate::error::Result;
use crate::output::Formatter;
use larder_lifecycle::Orchestrator;

/// List all projects.
pub async fn execute_projects(orchestrator: &Orchestrator, formatter: &Formatter) -> Result<()> {
    let projects = orchestrator.list_tenants().await?;
    println!("{}", formatter.format_projects(&projects)?);
    Ok(())
}

/// Show a project snapshot.
pub async fn execute_show(
    project: &str,
    orchestrator: &Orchestrator,
    formatter: &Formatter,
) -> Result<()> {
    let tenant = orchestrator.get_tenant(project).await?;
    println!("{}", formatter.format_tenant(&tenant)?);
    Ok(())
}

/// Create a project on behalf of a user.
pub async fn execute_create(
    name: &str,
    user: &str,
    orchestrator: &Orchestrator,
    formatter: &Formatter,
) -> Result<()> {
    let created = orchestrator.create_tenant(name, user).await?;
    println!("{}", formatter.format_created(&created)?);
    Ok(())
}

/// Delete a project after confirmation.
pub async fn execute_delete(
    args: DeleteArgs,
    orchestrator: &Orchestrator,
    formatter: &Formatter,
) -> Result<()> {
    orchestrator.check_tenant(&args.project).await?;

    let action = if args.no_backup {
        format!("permanently delete project '{}' without a backup", args.project)
    } else {
        format!("delete project '{}' after backing it up", args.project)
    };
    if !confirm_project(&args.project, &action, args.yes)? {
        println!("{}", formatter.info("Operation cancelled"));
        return Ok(());
    }

    orchestrator
        .delete_tenant(&args.project, !args.no_backup)
        .await?;

    if !formatter.is_quiet() {
        println!(
            "{}",
            formatter.success(&format!("Deleted project '{}'", args.project))
        );
    }
    Ok(())
}
