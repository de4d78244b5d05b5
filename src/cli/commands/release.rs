//! Release command implementation.
//!
//! The `appstate release` command snapshots an app's draft and prints the
//! updated app summary.

use std::io::Write;

use crate::cli::args::ReleaseArgs;
use crate::error::Result;
use crate::service::AppService;
use crate::store::Backend;

use super::dispatcher::{Command, CommandResult};
use super::display::write_json;

/// The release command implementation.
pub struct ReleaseCommand<'a, S> {
    service: &'a AppService<S>,
    args: ReleaseArgs,
}

impl<'a, S: Backend> ReleaseCommand<'a, S> {
    pub fn new(service: &'a AppService<S>, args: ReleaseArgs) -> Self {
        Self { service, args }
    }
}

impl<S: Backend> Command for ReleaseCommand<'_, S> {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        self.service.release_app(self.args.app, self.args.user)?;
        write_json(out, &self.service.fetch_app(self.args.app)?)?;
        Ok(CommandResult::success())
    }
}
