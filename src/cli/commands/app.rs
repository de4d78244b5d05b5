//! App command implementation.
//!
//! The `appstate app` subcommands cover the app lifecycle: create, rename,
//! show, list and delete.

use std::io::Write;

use serde_json::json;

use crate::cli::args::AppCommands;
use crate::error::Result;
use crate::service::AppService;
use crate::store::Backend;

use super::dispatcher::{Command, CommandResult};
use super::display::write_json;

/// The app command implementation.
pub struct AppCommand<'a, S> {
    service: &'a AppService<S>,
    args: AppCommands,
}

impl<'a, S: Backend> AppCommand<'a, S> {
    pub fn new(service: &'a AppService<S>, args: AppCommands) -> Self {
        Self { service, args }
    }
}

impl<S: Backend> Command for AppCommand<'_, S> {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        match &self.args {
            AppCommands::Create { name, user } => {
                write_json(out, &self.service.create_app(name, *user)?)?;
            }
            AppCommands::Rename { app, name, user } => {
                write_json(out, &self.service.rename_app(*app, name, *user)?)?;
            }
            AppCommands::Show { app } => {
                write_json(out, &self.service.fetch_app(*app)?)?;
            }
            AppCommands::List => {
                write_json(out, &self.service.list_apps()?)?;
            }
            AppCommands::Delete { app } => {
                self.service.delete_app(*app)?;
                write_json(out, &json!({ "deleted": app }))?;
            }
        }
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CloneSettings;
    use crate::error::StateError;
    use crate::store::Database;

    #[test]
    fn create_prints_summary() {
        let service = AppService::new(Database::in_memory(), CloneSettings::default());
        let mut buf = Vec::new();
        AppCommand::new(
            &service,
            AppCommands::Create {
                name: "shop".to_string(),
                user: 0,
            },
        )
        .execute(&mut buf)
        .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["appName"], "shop");
        assert_eq!(value["mainline_version"], 0);
    }

    #[test]
    fn show_unknown_app_fails() {
        let service = AppService::new(Database::in_memory(), CloneSettings::default());
        let err = AppCommand::new(&service, AppCommands::Show { app: 4 })
            .execute(&mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, StateError::AppNotFound { app: 4 }));
    }
}
