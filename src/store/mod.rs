//! Storage ports.
//!
//! The cloning core only talks to storage through these traits. Each of the
//! four state kinds has the same shape ([`RowStore`]): create returns the
//! store-assigned id, update replaces a row by id, and retrieval returns
//! every row of one (app, version) scope in a single call.
//!
//! [`Database`] implements every port in-process, optionally persisted to a
//! JSON file.

pub mod database;

pub use database::{Database, Stored, Table, Tables};

use crate::error::Result;
use crate::model::{Action, App, Id, KvState, Scope, SetState, TreeState, User, VersionedRow};

/// Uniform store for one versioned state kind.
pub trait RowStore<R: VersionedRow> {
    /// Insert a row and return its newly assigned id. The row's own id is
    /// ignored.
    fn create(&self, row: &R) -> Result<Id>;

    /// Replace the stored row with the same id.
    fn update(&self, row: &R) -> Result<()>;

    /// Remove one row by id.
    fn delete(&self, id: Id) -> Result<()>;

    /// Every row of the scope, in insertion order.
    fn retrieve_by_app_version(&self, scope: Scope) -> Result<Vec<R>>;

    /// Rows of the scope with the given kind tag.
    fn retrieve_by_kind(&self, scope: Scope, kind: R::Kind) -> Result<Vec<R>> {
        let rows = self.retrieve_by_app_version(scope)?;
        Ok(rows.into_iter().filter(|row| row.kind() == kind).collect())
    }

    /// Remove every row of an app across all versions. Returns the count.
    fn delete_by_app(&self, app: Id) -> Result<usize>;
}

/// Store for app records.
pub trait AppStore {
    fn create_app(&self, app: &App) -> Result<Id>;
    fn update_app(&self, app: &App) -> Result<()>;
    fn retrieve_app(&self, id: Id) -> Result<Option<App>>;
    fn delete_app(&self, id: Id) -> Result<()>;

    /// All apps, most recently updated first.
    fn retrieve_all_apps(&self) -> Result<Vec<App>>;
}

/// Store for users.
pub trait UserStore {
    fn create_user(&self, user: &User) -> Result<Id>;
    fn retrieve_user(&self, id: Id) -> Result<Option<User>>;
}

/// Everything the app service needs from storage.
pub trait Backend:
    AppStore
    + UserStore
    + RowStore<TreeState>
    + RowStore<KvState>
    + RowStore<SetState>
    + RowStore<Action>
{
}

impl<T> Backend for T where
    T: AppStore
        + UserStore
        + RowStore<TreeState>
        + RowStore<KvState>
        + RowStore<SetState>
        + RowStore<Action>
{
}
