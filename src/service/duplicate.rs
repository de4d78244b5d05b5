//! Copying an app's draft into a brand-new app.

use chrono::Utc;
use tracing::{info, warn};

use crate::clone::{clone_all_kinds, AuditRewrite, CloneJournal, CloneOptions, CloneReport, Created};
use crate::config::CloneSettings;
use crate::error::{Result, StateError};
use crate::model::{App, Audit, Id, Scope};
use crate::store::Backend;

/// Creates a new app whose draft is a copy of another app's draft.
///
/// Copied rows are attributed to the duplicating actor. If any step fails
/// the new app and every row copied into it are removed.
pub struct DuplicateCoordinator<'a, S: ?Sized> {
    store: &'a S,
    settings: CloneSettings,
}

impl<'a, S: Backend + ?Sized> DuplicateCoordinator<'a, S> {
    pub fn new(store: &'a S, settings: CloneSettings) -> Self {
        Self { store, settings }
    }

    /// Duplicate `source_id` as a new app named `name`. Returns the new app.
    pub fn duplicate(&self, source_id: Id, actor: Id, name: &str) -> Result<App> {
        let source = self
            .store
            .retrieve_app(source_id)?
            .ok_or(StateError::AppNotFound { app: source_id })?;

        let mut journal = CloneJournal::new();
        match self.copy(&source, actor, name, &mut journal) {
            Ok((app, report)) => {
                journal.commit();
                info!(
                    "Duplicated app {} as app {} '{}' ({} rows)",
                    source.id,
                    app.id,
                    app.name,
                    report.total()
                );
                Ok(app)
            }
            Err(e) => {
                warn!("Duplicate of app {} failed: {}", source.id, e);
                let failed = journal.rollback(self.store);
                if failed > 0 {
                    warn!("{} records of the partial copy could not be removed", failed);
                }
                Err(e)
            }
        }
    }

    fn copy(
        &self,
        source: &App,
        actor: Id,
        name: &str,
        journal: &mut CloneJournal,
    ) -> Result<(App, CloneReport)> {
        let now = Utc::now();
        let mut app = App::new(name, Audit::stamped(actor, now));
        app.id = self.store.create_app(&app)?;
        journal.record(Created::App(app.id));

        let options = CloneOptions {
            audit: AuditRewrite::Stamp { actor, at: now },
            dangling: self.settings.dangling_references,
        };
        let report = clone_all_kinds(
            self.store,
            Scope::draft(source.id),
            Scope::draft(app.id),
            &options,
            journal,
        )?;

        Ok((app, report))
    }
}
