//! App and user lifecycle.

use chrono::Utc;
use tracing::{debug, info};

use super::{modifier_of, AppService};
use crate::clone::{CloneJournal, Created};
use crate::error::{Result, StateError};
use crate::model::{
    Action, App, AppSummary, Audit, Id, KvState, Scope, SetState, TreeState, User,
};
use crate::store::{Backend, RowStore};

impl<S: Backend> AppService<S> {
    /// Register a user. Returns the new id.
    pub fn create_user(&self, nickname: &str) -> Result<Id> {
        let id = self.store.create_user(&User::new(nickname))?;
        debug!("Created user {} '{}'", id, nickname);
        Ok(id)
    }

    pub fn fetch_user(&self, user_id: Id) -> Result<User> {
        self.store
            .retrieve_user(user_id)?
            .ok_or(StateError::UserNotFound { user: user_id })
    }

    /// Create an app with an empty draft tree holding only the root node.
    pub fn create_app(&self, name: &str, actor: Id) -> Result<AppSummary> {
        let now = Utc::now();
        let mut app = App::new(name, Audit::stamped(actor, now));
        app.id = self.store.create_app(&app)?;

        let root = TreeState::initial_root(Scope::draft(app.id), Audit::stamped(actor, now));
        if let Err(e) = RowStore::<TreeState>::create(&self.store, &root) {
            let mut journal = CloneJournal::new();
            journal.record(Created::App(app.id));
            journal.rollback(&self.store);
            return Err(e);
        }

        info!("Created app {} '{}'", app.id, app.name);
        Ok(app.summary(modifier_of(&self.store, actor)?))
    }

    pub fn rename_app(&self, app_id: Id, name: &str, actor: Id) -> Result<AppSummary> {
        let mut app = self.require_app(app_id)?;
        app.name = name.to_string();
        app.audit.touch(actor, Utc::now());
        self.store.update_app(&app)?;
        Ok(app.summary(modifier_of(&self.store, actor)?))
    }

    /// Record that `actor` edited the app just now.
    pub fn touch_app(&self, app_id: Id, actor: Id) -> Result<AppSummary> {
        let mut app = self.require_app(app_id)?;
        app.audit.touch(actor, Utc::now());
        self.store.update_app(&app)?;
        Ok(app.summary(modifier_of(&self.store, actor)?))
    }

    pub fn fetch_app(&self, app_id: Id) -> Result<AppSummary> {
        let app = self.require_app(app_id)?;
        Ok(app.summary(modifier_of(&self.store, app.audit.updated_by)?))
    }

    /// All apps, most recently updated first.
    pub fn list_apps(&self) -> Result<Vec<AppSummary>> {
        self.store
            .retrieve_all_apps()?
            .into_iter()
            .map(|app| {
                let modifier = modifier_of(&self.store, app.audit.updated_by)?;
                Ok(app.summary(modifier))
            })
            .collect()
    }

    /// Remove an app and every row of every version.
    pub fn delete_app(&self, app_id: Id) -> Result<()> {
        self.require_app(app_id)?;

        let rows = RowStore::<TreeState>::delete_by_app(&self.store, app_id)?
            + RowStore::<KvState>::delete_by_app(&self.store, app_id)?
            + RowStore::<SetState>::delete_by_app(&self.store, app_id)?
            + RowStore::<Action>::delete_by_app(&self.store, app_id)?;
        self.store.delete_app(app_id)?;

        info!("Deleted app {} and {} state rows", app_id, rows);
        Ok(())
    }

    fn require_app(&self, app_id: Id) -> Result<App> {
        self.store
            .retrieve_app(app_id)?
            .ok_or(StateError::AppNotFound { app: app_id })
    }
}
