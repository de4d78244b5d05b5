//! Publishing the draft as a new immutable version.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::clone::{clone_all_kinds, AuditRewrite, CloneJournal, CloneOptions, CloneReport};
use crate::config::{CloneSettings, ReleaseAudit};
use crate::error::{Result, StateError};
use crate::model::{App, Id, Scope, Version};
use crate::store::Backend;

/// Snapshots an app's draft into version `mainline + 1`.
///
/// The draft itself is never modified. The app's counters are written last,
/// so a failed release leaves them untouched and any copied rows are
/// removed again.
pub struct ReleaseCoordinator<'a, S: ?Sized> {
    store: &'a S,
    settings: CloneSettings,
}

impl<'a, S: Backend + ?Sized> ReleaseCoordinator<'a, S> {
    pub fn new(store: &'a S, settings: CloneSettings) -> Self {
        Self { store, settings }
    }

    /// Release `app_id`. Returns the new version number.
    ///
    /// `actor` is recorded as the app's last updater. Without one the
    /// previous updater is kept.
    pub fn release(&self, app_id: Id, actor: Option<Id>) -> Result<Version> {
        let app = self
            .store
            .retrieve_app(app_id)?
            .ok_or(StateError::AppNotFound { app: app_id })?;

        let version = app
            .mainline_version
            .checked_add(1)
            .ok_or_else(|| StateError::InvalidScope {
                message: format!("app {} has no version number left", app_id),
            })?;
        let actor = actor.unwrap_or(app.audit.updated_by);

        debug!(
            "Releasing app {} from mainline {} to {}",
            app_id, app.mainline_version, version
        );

        let mut journal = CloneJournal::new();
        match self.snapshot(app, version, actor, &mut journal) {
            Ok(report) => {
                journal.commit();
                info!(
                    "Released app {} as version {} ({} rows)",
                    app_id,
                    version,
                    report.total()
                );
                Ok(version)
            }
            Err(e) => {
                warn!("Release of app {} failed: {}", app_id, e);
                let failed = journal.rollback(self.store);
                if failed > 0 {
                    warn!("{} rows of app {} v{} could not be removed", failed, app_id, version);
                }
                Err(e)
            }
        }
    }

    fn snapshot(
        &self,
        mut app: App,
        version: Version,
        actor: Id,
        journal: &mut CloneJournal,
    ) -> Result<CloneReport> {
        let now = Utc::now();
        let options = CloneOptions {
            audit: match self.settings.release_audit {
                ReleaseAudit::Preserve => AuditRewrite::Preserve,
                ReleaseAudit::Stamp => AuditRewrite::Stamp { actor, at: now },
            },
            dangling: self.settings.dangling_references,
        };

        let report = clone_all_kinds(
            self.store,
            Scope::draft(app.id),
            Scope::new(app.id, version),
            &options,
            journal,
        )?;

        app.release_version = version;
        app.mainline_version = version;
        app.audit.touch(actor, now);
        self.store.update_app(&app)?;

        Ok(report)
    }
}
