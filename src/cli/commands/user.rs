//! User command implementation.
//!
//! `appstate user add` registers a user whose nickname shows up as the
//! modifier of the apps they touch.

use std::io::Write;

use serde_json::json;

use crate::cli::args::UserCommands;
use crate::error::Result;
use crate::service::AppService;
use crate::store::Backend;

use super::dispatcher::{Command, CommandResult};
use super::display::write_json;

/// The user command implementation.
pub struct UserCommand<'a, S> {
    service: &'a AppService<S>,
    args: UserCommands,
}

impl<'a, S: Backend> UserCommand<'a, S> {
    pub fn new(service: &'a AppService<S>, args: UserCommands) -> Self {
        Self { service, args }
    }
}

impl<S: Backend> Command for UserCommand<'_, S> {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        match &self.args {
            UserCommands::Add { nickname } => {
                let id = self.service.create_user(nickname)?;
                write_json(out, &json!({ "userId": id, "nickname": nickname }))?;
            }
            UserCommands::Show { user } => {
                write_json(out, &self.service.fetch_user(*user)?)?;
            }
        }
        Ok(CommandResult::success())
    }
}
