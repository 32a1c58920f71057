//! Larder CLI library.
//!
//! Configuration loading, argument parsing, orchestrator wiring and output
//! formatting for the `larder` binary.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use app::build_orchestrator;
pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
