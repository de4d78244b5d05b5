//! Editor command implementation.
//!
//! The `appstate editor` command prints the assembled editor document of
//! one version. Version 0 is the draft.

use std::io::Write;

use crate::cli::args::EditorArgs;
use crate::error::Result;
use crate::service::AppService;
use crate::store::Backend;

use super::dispatcher::{Command, CommandResult};
use super::display::write_json;

/// The editor command implementation.
pub struct EditorCommand<'a, S> {
    service: &'a AppService<S>,
    args: EditorArgs,
}

impl<'a, S: Backend> EditorCommand<'a, S> {
    pub fn new(service: &'a AppService<S>, args: EditorArgs) -> Self {
        Self { service, args }
    }
}

impl<S: Backend> Command for EditorCommand<'_, S> {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let document = self
            .service
            .editor_document(self.args.app, self.args.version)?;
        write_json(out, &document)?;
        Ok(CommandResult::success())
    }
}
