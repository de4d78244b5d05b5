//! Compensation log for one clone invocation.
//!
//! Storage offers no transaction spanning the many creates of a release or
//! duplicate. Every app and row created during one invocation is recorded
//! here; on failure [`CloneJournal::rollback`] deletes them newest first so
//! the store reads as if the invocation never ran.

use tracing::{debug, warn};

use crate::model::{Action, Id, KvState, RowKind, SetState, TreeState};
use crate::store::{Backend, RowStore};

/// Something created during a clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Created {
    App(Id),
    Row(RowKind, Id),
}

/// Ordered record of creations.
#[derive(Debug, Default)]
pub struct CloneJournal {
    entries: Vec<Created>,
}

impl CloneJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, created: Created) {
        self.entries.push(created);
    }

    pub fn record_row(&mut self, kind: RowKind, id: Id) {
        self.record(Created::Row(kind, id));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Created] {
        &self.entries
    }

    /// Keep everything that was created. Returns the number of entries.
    pub fn commit(self) -> usize {
        debug!("Committing clone journal with {} entries", self.entries.len());
        self.entries.len()
    }

    /// Delete everything that was created, newest first.
    ///
    /// Keeps going past individual delete failures and returns how many
    /// entries could not be removed.
    pub fn rollback<S: Backend + ?Sized>(self, store: &S) -> usize {
        if self.entries.is_empty() {
            return 0;
        }

        warn!("Rolling back {} created records", self.entries.len());
        let mut failed = 0;

        for created in self.entries.into_iter().rev() {
            let result = match created {
                Created::App(id) => store.delete_app(id),
                Created::Row(RowKind::TreeState, id) => RowStore::<TreeState>::delete(store, id),
                Created::Row(RowKind::KvState, id) => RowStore::<KvState>::delete(store, id),
                Created::Row(RowKind::SetState, id) => RowStore::<SetState>::delete(store, id),
                Created::Row(RowKind::Action, id) => RowStore::<Action>::delete(store, id),
            };

            if let Err(e) = result {
                warn!("Failed to roll back {:?}: {}", created, e);
                failed += 1;
            }
        }

        failed
    }
}
