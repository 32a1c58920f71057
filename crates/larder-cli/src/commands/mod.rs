//! Command implementations.

pub mod backups;
pub mod environments;
pub mod projects;

pub use self::backups::execute_backup;
pub use self::environments::execute_env;
pub use self::projects::{execute_create, execute_delete, execute_projects, execute_show};

use crate::error::{CliError, Result};
use std::io::{self, BufRead, Write};

/// Ask the operator to type the project name before a destructive action.
///
/// Returns `true` when `yes` is set or the typed name matches.
pub fn confirm_project(project: &str, action: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }

    println!("This will {}.", action);
    print!("Type the project name ({}) to continue: ", project);
    io::stdout().flush()?;

    read_confirmation(io::stdin().lock(), project)
}

fn read_confirmation(mut input: impl BufRead, project: &str) -> Result<bool> {
    let mut response = String::new();
    input.read_line(&mut response)?;
    Ok(response.trim() == project)
}

/// Require a requesting user, given by `--user` or `default_user`.
pub fn requesting_user(user: Option<&str>) -> Result<String> {
    user.filter(|user| !user.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            CliError::InvalidInput(
                "No user given. Pass --user or set default_user in the config".to_string(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_confirmation_requires_exact_name() {
        assert!(read_confirmation(Cursor::new("acme\n"), "acme").unwrap());
        assert!(read_confirmation(Cursor::new("  acme  \n"), "acme").unwrap());
        assert!(!read_confirmation(Cursor::new("y\n"), "acme").unwrap());
        assert!(!read_confirmation(Cursor::new(""), "acme").unwrap());
    }

    #[test]
    fn test_yes_skips_prompt() {
        assert!(confirm_project("acme", "delete project 'acme'", true).unwrap());
    }

    #[test]
    fn test_requesting_user() {
        assert_eq!(requesting_user(Some("u1")).unwrap(), "u1");
        assert!(requesting_user(None).is_err());
        assert!(requesting_user(Some("")).is_err());
    }
}
