//! In-process implementation of every storage port.
//!
//! Each table assigns ids from its own counter starting at 1, so ids are
//! unique per table and never reused. When opened with a path, the whole
//! database is written back after every successful mutation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{AppStore, RowStore, UserStore};
use crate::error::{Result, StateError};
use crate::model::{
    Action, App, Id, KvState, Record, Scope, SetState, TreeState, User, VersionedRow,
};

/// Rows of one table keyed by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table<R> {
    next_id: Id,
    rows: BTreeMap<Id, R>,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            next_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

impl<R: Record> Table<R> {
    fn insert(&mut self, row: &R) -> Id {
        self.next_id += 1;
        let id = self.next_id;
        let mut stored = row.clone();
        stored.set_id(id);
        self.rows.insert(id, stored);
        id
    }

    fn replace(&mut self, row: &R) -> bool {
        match self.rows.get_mut(&row.id()) {
            Some(existing) => {
                *existing = row.clone();
                true
            }
            None => false,
        }
    }

    fn remove(&mut self, id: Id) -> bool {
        self.rows.remove(&id).is_some()
    }

    pub fn get(&self, id: Id) -> Option<&R> {
        self.rows.get(&id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &R> {
        self.rows.values()
    }
}

/// All tables of the database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tables {
    pub apps: Table<App>,
    pub users: Table<User>,
    pub tree_states: Table<TreeState>,
    pub kv_states: Table<KvState>,
    pub set_states: Table<SetState>,
    pub actions: Table<Action>,
}

/// A versioned row type with a table in [`Tables`].
pub trait Stored: VersionedRow + Serialize + DeserializeOwned {
    fn table(tables: &Tables) -> &Table<Self>;
    fn table_mut(tables: &mut Tables) -> &mut Table<Self>;

    /// Whether inserting `self` would violate a uniqueness rule held by
    /// `existing`.
    fn conflicts_with(&self, _existing: &Self) -> bool {
        false
    }
}

impl Stored for TreeState {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.tree_states
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.tree_states
    }
}

impl Stored for KvState {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.kv_states
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.kv_states
    }

    // Keys are unique within (app, version, kind).
    fn conflicts_with(&self, existing: &Self) -> bool {
        self.scope() == existing.scope() && self.kind == existing.kind && self.key == existing.key
    }
}

impl Stored for SetState {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.set_states
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.set_states
    }

    // A set holds each value once.
    fn conflicts_with(&self, existing: &Self) -> bool {
        self.scope() == existing.scope()
            && self.kind == existing.kind
            && self.value == existing.value
    }
}

impl Stored for Action {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.actions
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.actions
    }
}

/// Injected failures for exercising error paths.
#[derive(Debug, Default)]
struct Faults {
    row_creates_left: Option<usize>,
    row_updates_left: Option<usize>,
}

impl Faults {
    fn take(budget: &mut Option<usize>) -> bool {
        match budget {
            Some(0) => true,
            Some(left) => {
                *left -= 1;
                false
            }
            None => false,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    tables: Tables,
    faults: Faults,
}

/// In-process database implementing every storage port.
#[derive(Debug, Default)]
pub struct Database {
    inner: Mutex<Inner>,
    path: Option<PathBuf>,
}

impl Database {
    /// An empty database that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a database file, starting empty if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let tables = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content).map_err(|e| {
                StateError::storage("open", format!("{}: {}", path.display(), e))
            })?
        } else {
            Tables::default()
        };

        tracing::debug!("Opened database at {}", path.display());

        Ok(Self {
            inner: Mutex::new(Inner {
                tables,
                faults: Faults::default(),
            }),
            path: Some(path),
        })
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Let the next `n` row creates succeed, then fail every one after.
    pub fn fail_row_creates_after(&self, n: usize) -> Result<()> {
        self.lock()?.faults.row_creates_left = Some(n);
        Ok(())
    }

    /// Let the next `n` row updates succeed, then fail every one after.
    pub fn fail_row_updates_after(&self, n: usize) -> Result<()> {
        self.lock()?.faults.row_updates_left = Some(n);
        Ok(())
    }

    /// Remove all injected failures.
    pub fn clear_faults(&self) -> Result<()> {
        self.lock()?.faults = Faults::default();
        Ok(())
    }

    /// Run a read-only closure over the tables.
    pub fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T> {
        Ok(f(&self.lock()?.tables))
    }

    /// Number of stored rows of one kind, across all apps.
    pub fn row_count<R: Stored>(&self) -> Result<usize> {
        self.read(|tables| R::table(tables).len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| StateError::storage("lock", "database mutex poisoned"))
    }

    /// Apply `f` to a staged copy of the tables. The copy replaces the live
    /// tables only once it has been persisted.
    fn mutate<T>(&self, f: impl FnOnce(&mut Tables, &mut Faults) -> Result<T>) -> Result<T> {
        let mut inner = self.lock()?;
        let Inner { tables, faults } = &mut *inner;
        let mut staged = tables.clone();
        let result = f(&mut staged, faults)?;
        if let Some(path) = &self.path {
            persist(path, &staged).map_err(|e| {
                StateError::storage("persist", format!("{}: {}", path.display(), e))
            })?;
        }
        *tables = staged;
        Ok(result)
    }
}

/// Write the tables atomically: write to a temp file, then rename.
fn persist(path: &Path, tables: &Tables) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }

    let content = serde_json::to_string_pretty(tables)?;
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, &content)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

impl<R: Stored> RowStore<R> for Database {
    fn create(&self, row: &R) -> Result<Id> {
        self.mutate(|tables, faults| {
            if Faults::take(&mut faults.row_creates_left) {
                return Err(StateError::storage(
                    "create",
                    format!("injected failure creating {}", R::ROW_KIND),
                ));
            }
            let table = R::table_mut(tables);
            if let Some(existing) = table.values().find(|existing| row.conflicts_with(existing)) {
                return Err(StateError::storage(
                    "create",
                    format!("{} conflicts with existing row {}", R::ROW_KIND, existing.id()),
                ));
            }
            Ok(table.insert(row))
        })
    }

    fn update(&self, row: &R) -> Result<()> {
        self.mutate(|tables, faults| {
            if Faults::take(&mut faults.row_updates_left) {
                return Err(StateError::storage(
                    "update",
                    format!("injected failure updating {} {}", R::ROW_KIND, row.id()),
                ));
            }
            if R::table_mut(tables).replace(row) {
                Ok(())
            } else {
                Err(StateError::storage(
                    "update",
                    format!("{} {} does not exist", R::ROW_KIND, row.id()),
                ))
            }
        })
    }

    fn delete(&self, id: Id) -> Result<()> {
        self.mutate(|tables, _| {
            if R::table_mut(tables).remove(id) {
                Ok(())
            } else {
                Err(StateError::storage(
                    "delete",
                    format!("{} {} does not exist", R::ROW_KIND, id),
                ))
            }
        })
    }

    fn retrieve_by_app_version(&self, scope: Scope) -> Result<Vec<R>> {
        self.read(|tables| {
            R::table(tables)
                .values()
                .filter(|row| row.scope() == scope)
                .cloned()
                .collect()
        })
    }

    fn delete_by_app(&self, app: Id) -> Result<usize> {
        self.mutate(|tables, _| {
            let table = R::table_mut(tables);
            let before = table.rows.len();
            table.rows.retain(|_, row| row.scope().app != app);
            Ok(before - table.rows.len())
        })
    }
}

impl AppStore for Database {
    fn create_app(&self, app: &App) -> Result<Id> {
        self.mutate(|tables, _| Ok(tables.apps.insert(app)))
    }

    fn update_app(&self, app: &App) -> Result<()> {
        self.mutate(|tables, _| {
            if tables.apps.replace(app) {
                Ok(())
            } else {
                Err(StateError::AppNotFound { app: app.id })
            }
        })
    }

    fn retrieve_app(&self, id: Id) -> Result<Option<App>> {
        self.read(|tables| tables.apps.get(id).cloned())
    }

    fn delete_app(&self, id: Id) -> Result<()> {
        self.mutate(|tables, _| {
            if tables.apps.remove(id) {
                Ok(())
            } else {
                Err(StateError::AppNotFound { app: id })
            }
        })
    }

    fn retrieve_all_apps(&self) -> Result<Vec<App>> {
        self.read(|tables| {
            let mut apps: Vec<App> = tables.apps.values().cloned().collect();
            apps.sort_by(|a, b| {
                b.audit
                    .updated_at
                    .cmp(&a.audit.updated_at)
                    .then_with(|| b.id.cmp(&a.id))
            });
            apps
        })
    }
}

impl UserStore for Database {
    fn create_user(&self, user: &User) -> Result<Id> {
        self.mutate(|tables, _| Ok(tables.users.insert(user)))
    }

    fn retrieve_user(&self, id: Id) -> Result<Option<User>> {
        self.read(|tables| tables.users.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Audit, KvStateKind};
    use serde_json::json;
    use tempfile::TempDir;

    fn node(app: Id, name: &str) -> TreeState {
        TreeState::component(Scope::draft(app), name, None, json!({}), Audit::now(1))
    }

    #[test]
    fn ids_are_assigned_sequentially_per_table() {
        let db = Database::in_memory();
        let first = RowStore::<TreeState>::create(&db, &node(1, "root")).unwrap();
        let second = RowStore::<TreeState>::create(&db, &node(1, "button1")).unwrap();
        let app = db.create_app(&App::new("demo", Audit::now(1))).unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(app, 1);
    }

    #[test]
    fn retrieve_is_scoped_to_app_and_version() {
        let db = Database::in_memory();
        RowStore::<TreeState>::create(&db, &node(1, "root")).unwrap();
        RowStore::<TreeState>::create(&db, &node(2, "root")).unwrap();
        let mut released = node(1, "root");
        released.version = 1;
        RowStore::<TreeState>::create(&db, &released).unwrap();

        let rows: Vec<TreeState> = db.retrieve_by_app_version(Scope::draft(1)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 1);
    }

    #[test]
    fn update_missing_row_fails() {
        let db = Database::in_memory();
        let mut row = node(1, "root");
        row.id = 99;
        let err = RowStore::<TreeState>::update(&db, &row).unwrap_err();
        assert!(matches!(err, StateError::Storage { .. }));
    }

    #[test]
    fn duplicate_kv_key_is_rejected() {
        let db = Database::in_memory();
        let row = KvState::new(
            Scope::draft(1),
            KvStateKind::Dependencies,
            "btn1",
            "[]",
            Audit::now(1),
        );
        RowStore::<KvState>::create(&db, &row).unwrap();
        assert!(RowStore::<KvState>::create(&db, &row).is_err());

        let mut other_version = row.clone();
        other_version.version = 1;
        assert!(RowStore::<KvState>::create(&db, &other_version).is_ok());
    }

    #[test]
    fn duplicate_set_value_is_rejected() {
        let db = Database::in_memory();
        let row = SetState::display_name(Scope::draft(1), "button1", Audit::now(1));
        RowStore::<SetState>::create(&db, &row).unwrap();
        assert!(RowStore::<SetState>::create(&db, &row).is_err());
    }

    #[test]
    fn injected_create_failure_trips_after_budget() {
        let db = Database::in_memory();
        db.fail_row_creates_after(1).unwrap();
        assert!(RowStore::<TreeState>::create(&db, &node(1, "root")).is_ok());
        assert!(RowStore::<TreeState>::create(&db, &node(1, "a")).is_err());
        assert!(RowStore::<TreeState>::create(&db, &node(1, "b")).is_err());

        db.clear_faults().unwrap();
        assert!(RowStore::<TreeState>::create(&db, &node(1, "c")).is_ok());
    }

    #[test]
    fn delete_by_app_spans_versions() {
        let db = Database::in_memory();
        RowStore::<TreeState>::create(&db, &node(1, "root")).unwrap();
        let mut released = node(1, "root");
        released.version = 3;
        RowStore::<TreeState>::create(&db, &released).unwrap();
        RowStore::<TreeState>::create(&db, &node(2, "root")).unwrap();

        let removed = RowStore::<TreeState>::delete_by_app(&db, 1).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(db.row_count::<TreeState>().unwrap(), 1);
    }

    #[test]
    fn apps_list_most_recently_updated_first() {
        let db = Database::in_memory();
        let now = chrono::Utc::now();
        let older = App::new("older", Audit::stamped(1, now - chrono::Duration::hours(1)));
        let newer = App::new("newer", Audit::stamped(1, now));
        db.create_app(&older).unwrap();
        db.create_app(&newer).unwrap();

        let names: Vec<String> = db
            .retrieve_all_apps()
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["newer", "older"]);
    }

    #[test]
    fn file_backed_database_survives_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("db.json");

        {
            let db = Database::open(&path).unwrap();
            let root = node(1, "root").with_children(vec![2]);
            RowStore::<TreeState>::create(&db, &root).unwrap();
            db.create_user(&User::new("alice")).unwrap();
        }

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let db = Database::open(&path).unwrap();
        let rows: Vec<TreeState> = db.retrieve_by_app_version(Scope::draft(1)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].children.as_slice(), &[2]);
        assert_eq!(db.retrieve_user(1).unwrap().unwrap().nickname, "alice");

        // Ids keep counting after reopen.
        let next = RowStore::<TreeState>::create(&db, &node(1, "button1")).unwrap();
        assert_eq!(next, 2);
    }

    #[test]
    fn failed_persist_leaves_tables_unchanged() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("db.json");
        let db = Database::open(&path).unwrap();
        RowStore::<TreeState>::create(&db, &node(1, "root")).unwrap();

        // A directory at the temp path makes the write fail.
        let blocker = path.with_extension("json.tmp");
        fs::create_dir(&blocker).unwrap();
        let err = RowStore::<TreeState>::create(&db, &node(1, "button1")).unwrap_err();
        assert!(matches!(err, StateError::Storage { .. }));
        assert_eq!(db.row_count::<TreeState>().unwrap(), 1);
        assert!(db.create_app(&App::new("demo", Audit::now(1))).is_err());
        assert!(db.retrieve_all_apps().unwrap().is_empty());

        fs::remove_dir(&blocker).unwrap();
        let next = RowStore::<TreeState>::create(&db, &node(1, "button1")).unwrap();
        assert_eq!(next, 2);

        let reopened = Database::open(&path).unwrap();
        assert_eq!(reopened.row_count::<TreeState>().unwrap(), 2);
    }

    #[test]
    fn open_rejects_corrupt_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("db.json");
        fs::write(&path, "not json").unwrap();
        let err = Database::open(&path).unwrap_err();
        assert!(matches!(err, StateError::Storage { .. }));
    }
}
