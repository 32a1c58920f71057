//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use larder_domain::{BackupRef, CreatedTenant, Tenant};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a list of project names.
    pub fn format_projects(&self, projects: &[String]) -> Result<String> {
        self.format_names(projects, "Project", "No projects found.")
    }

    /// Format a list of environment names.
    pub fn format_environments(&self, environments: &[String]) -> Result<String> {
        self.format_names(environments, "Environment", "No environments found.")
    }

    /// Format a list of backups, newest last.
    pub fn format_backups(&self, backups: &[BackupRef]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(backups)?),
            OutputFormat::Quiet => Ok(backups
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if backups.is_empty() {
                    return Ok(self.colorize("No backups found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Backup"]);
                for backup in backups {
                    builder.push_record([backup.to_string()]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format a project snapshot.
    pub fn format_tenant(&self, tenant: &Tenant) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(tenant)?),
            OutputFormat::Quiet => Ok(tenant.id.clone()),
            OutputFormat::Table => {
                let backups = tenant
                    .backups
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>();
                let users = tenant
                    .users
                    .iter()
                    .map(|u| {
                        if u.is_admin {
                            format!("{} (admin)", u.username)
                        } else {
                            u.username.clone()
                        }
                    })
                    .collect::<Vec<_>>();

                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                builder.push_record(["Project".to_string(), tenant.id.clone()]);
                builder.push_record(["Environments".to_string(), tenant.environments.join(", ")]);
                builder.push_record(["Backups".to_string(), backups.join(", ")]);
                builder.push_record(["Users".to_string(), users.join(", ")]);
                builder.push_record([
                    "Settings".to_string(),
                    serde_json::to_string_pretty(&tenant.settings)?,
                ]);
                Ok(self.render(builder))
            }
        }
    }

    /// Format a freshly created project.
    pub fn format_created(&self, created: &CreatedTenant) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(created)?),
            OutputFormat::Quiet => Ok(created.id.clone()),
            OutputFormat::Table => Ok(self.success(&format!("Created project '{}'", created.id))),
        }
    }

    /// Whether messages meant for people should be printed.
    pub fn is_quiet(&self) -> bool {
        self.format != OutputFormat::Table
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn format_names(&self, names: &[String], header: &str, empty: &str) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(names)?),
            OutputFormat::Quiet => Ok(names.join("\n")),
            OutputFormat::Table => {
                if names.is_empty() {
                    return Ok(self.colorize(empty, "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record([header]);
                for name in names {
                    builder.push_record([name.as_str()]);
                }
                Ok(self.render(builder))
            }
        }
    }

    fn render(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
