//! App-level operations over a storage backend.
//!
//! [`AppService`] is the entry point used by the CLI. Release and duplicate
//! are implemented by their own coordinators and share the clone pipeline
//! in [`crate::clone`]; editor document assembly lives in [`editor`].

pub mod apps;
pub mod duplicate;
pub mod editor;
pub mod release;

pub use duplicate::DuplicateCoordinator;
pub use editor::{ActionView, ComponentNode, EditorAssembler, EditorDocument};
pub use release::ReleaseCoordinator;

use crate::config::{AppStateConfig, CloneSettings};
use crate::error::Result;
use crate::model::{AppSummary, Id, Version};
use crate::store::{Backend, UserStore};

/// High-level operations on apps and their versioned state.
pub struct AppService<S> {
    store: S,
    settings: CloneSettings,
}

impl<S: Backend> AppService<S> {
    pub fn new(store: S, settings: CloneSettings) -> Self {
        Self { store, settings }
    }

    pub fn from_config(store: S, config: &AppStateConfig) -> Self {
        Self::new(store, config.cloning)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> CloneSettings {
        self.settings
    }

    /// Publish the draft of `app_id` as a new version.
    pub fn release_app(&self, app_id: Id, actor: Option<Id>) -> Result<Version> {
        ReleaseCoordinator::new(&self.store, self.settings).release(app_id, actor)
    }

    /// Copy `app_id` into a new app named `name`.
    pub fn duplicate_app(&self, app_id: Id, actor: Id, name: &str) -> Result<AppSummary> {
        let app = DuplicateCoordinator::new(&self.store, self.settings)
            .duplicate(app_id, actor, name)?;
        let modifier = modifier_of(&self.store, app.audit.updated_by)?;
        Ok(app.summary(modifier))
    }

    /// Assemble the editor document of one version.
    pub fn editor_document(&self, app_id: Id, version: Version) -> Result<EditorDocument> {
        EditorAssembler::new(&self.store).assemble(app_id, version)
    }
}

/// Nickname of `user`, or an empty string for an unknown user.
pub(crate) fn modifier_of<S: UserStore + ?Sized>(store: &S, user: Id) -> Result<String> {
    Ok(store
        .retrieve_user(user)?
        .map(|u| u.nickname)
        .unwrap_or_default())
}
