//! Larder CLI - Manage projects, environments and backups from the command line.

use clap::Parser;
use larder_cli::commands::{self, requesting_user};
use larder_cli::{build_orchestrator, Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> larder_cli::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    // Log to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let format = cli.format.map(Into::into).unwrap_or(config.output.format);
    let color_enabled = !cli.no_color && config.output.color;
    let formatter = Formatter::new(format, color_enabled);

    let user = cli.user.clone().or_else(|| config.default_user.clone());
    let orchestrator = build_orchestrator(&config)?;

    match cli.command {
        Command::Projects => {
            commands::execute_projects(&orchestrator, &formatter).await?;
        }
        Command::Show { project } => {
            commands::execute_show(&project, &orchestrator, &formatter).await?;
        }
        Command::Create { name } => {
            let user = requesting_user(user.as_deref())?;
            commands::execute_create(&name, &user, &orchestrator, &formatter).await?;
        }
        Command::Delete(args) => {
            commands::execute_delete(args, &orchestrator, &formatter).await?;
        }
        Command::Env(args) => {
            commands::execute_env(args, &orchestrator, &formatter).await?;
        }
        Command::Backup(args) => {
            commands::execute_backup(args, user.as_deref(), &orchestrator, &formatter).await?;
        }
    }

    Ok(())
}
