//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::io::Write;

use crate::cli::args::{Cli, Commands};
use crate::config::AppStateConfig;
use crate::error::Result;
use crate::service::AppService;
use crate::store::Database;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command, writing its output to `out`.
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Exit code to use (0 for success).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self { exit_code: 0 }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    config: AppStateConfig,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the effective configuration.
    pub fn new(config: AppStateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppStateConfig {
        &self.config
    }

    /// Open the configured database and wrap it in a service.
    fn service(&self) -> Result<AppService<Database>> {
        let db = Database::open(&self.config.store.path)?;
        Ok(AppService::from_config(db, &self.config))
    }

    /// Dispatch and execute a command.
    ///
    /// Completions never touch the database; every other command opens it.
    pub fn dispatch(&self, cli: &Cli, out: &mut dyn Write) -> Result<CommandResult> {
        if let Commands::Completions(args) = &cli.command {
            return super::completions::CompletionsCommand::new(args.clone()).execute(out);
        }

        let service = self.service()?;
        match &cli.command {
            Commands::User(args) => {
                super::user::UserCommand::new(&service, args.clone()).execute(out)
            }
            Commands::App(args) => {
                super::app::AppCommand::new(&service, args.clone()).execute(out)
            }
            Commands::Release(args) => {
                super::release::ReleaseCommand::new(&service, args.clone()).execute(out)
            }
            Commands::Duplicate(args) => {
                super::duplicate::DuplicateCommand::new(&service, args.clone()).execute(out)
            }
            Commands::Editor(args) => {
                super::editor::EditorCommand::new(&service, args.clone()).execute(out)
            }
            Commands::Completions(_) => Ok(CommandResult::success()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn dispatcher(temp: &TempDir) -> CommandDispatcher {
        let mut config = AppStateConfig::default();
        config.store.path = temp.path().join("db.json");
        CommandDispatcher::new(config)
    }

    fn run(dispatcher: &CommandDispatcher, args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        let mut buf = Vec::new();
        dispatcher.dispatch(&cli, &mut buf)?;
        Ok(String::from_utf8(buf).unwrap())
    }

    #[test]
    fn command_result_success() {
        assert_eq!(CommandResult::success().exit_code, 0);
    }

    #[test]
    fn state_persists_between_dispatches() {
        let temp = TempDir::new().unwrap();
        let dispatcher = dispatcher(&temp);

        run(&dispatcher, &["appstate", "app", "create", "shop"]).unwrap();
        let listed = run(&dispatcher, &["appstate", "app", "list"]).unwrap();
        assert!(listed.contains("\"appName\": \"shop\""));
    }

    #[test]
    fn completions_do_not_create_database() {
        let temp = TempDir::new().unwrap();
        let dispatcher = dispatcher(&temp);

        run(&dispatcher, &["appstate", "completions", "bash"]).unwrap();
        assert!(!dispatcher.config().store.path.exists());
    }
}
