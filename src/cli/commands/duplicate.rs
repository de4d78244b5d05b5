//! Duplicate command implementation.

use std::io::Write;

use crate::cli::args::DuplicateArgs;
use crate::error::Result;
use crate::service::AppService;
use crate::store::Backend;

use super::dispatcher::{Command, CommandResult};
use super::display::write_json;

/// The duplicate command implementation.
pub struct DuplicateCommand<'a, S> {
    service: &'a AppService<S>,
    args: DuplicateArgs,
}

impl<'a, S: Backend> DuplicateCommand<'a, S> {
    pub fn new(service: &'a AppService<S>, args: DuplicateArgs) -> Self {
        Self { service, args }
    }
}

impl<S: Backend> Command for DuplicateCommand<'_, S> {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let summary = self
            .service
            .duplicate_app(self.args.app, self.args.user, &self.args.name)?;
        write_json(out, &summary)?;
        Ok(CommandResult::success())
    }
}
