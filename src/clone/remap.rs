//! Phase one of a clone: copy every row of a scope and record id mappings.
//!
//! Ids are assigned by the store at insertion, so references embedded in a
//! row cannot be rewritten until every row of the kind has been inserted.
//! [`remap_scope`] therefore only inserts and returns the complete
//! [`IdMap`]; kinds with internal references run a second pass afterwards
//! (see [`super::relink`]).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::journal::CloneJournal;
use crate::error::{Result, StateError};
use crate::model::{Audit, Id, Scope, VersionedRow};
use crate::store::RowStore;

/// Old id to new id table for one clone of one kind. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdMap {
    ids: HashMap<Id, Id>,
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: HashMap::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, old: Id, new: Id) {
        self.ids.insert(old, new);
    }

    /// The new id of `old`, if `old` was part of the cloned scope.
    pub fn get(&self, old: Id) -> Option<Id> {
        self.ids.get(&old).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Id, Id)> + '_ {
        self.ids.iter().map(|(old, new)| (*old, *new))
    }
}

impl FromIterator<(Id, Id)> for IdMap {
    fn from_iter<I: IntoIterator<Item = (Id, Id)>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// How audit fields of cloned rows are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditRewrite {
    /// Keep the source row's audit fields.
    Preserve,
    /// Mark the row as created and updated by `actor` at `at`.
    Stamp { actor: Id, at: DateTime<Utc> },
}

impl AuditRewrite {
    pub fn stamp_now(actor: Id) -> Self {
        Self::Stamp {
            actor,
            at: Utc::now(),
        }
    }

    pub fn apply(&self, audit: &mut Audit) {
        if let AuditRewrite::Stamp { actor, at } = *self {
            *audit = Audit::stamped(actor, at);
        }
    }
}

/// Rows inserted by [`remap_scope`], carrying their new ids but the source
/// scope's references.
#[derive(Debug, Clone)]
pub struct ClonedRows<R> {
    pub rows: Vec<R>,
    pub ids: IdMap,
}

impl<R> ClonedRows<R> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Copy every row of `source` into `target`.
///
/// Fails fast on the first storage error. Every row inserted before the
/// failure is already recorded in `journal`.
pub fn remap_scope<R, S>(
    store: &S,
    source: Scope,
    target: Scope,
    audit: &AuditRewrite,
    journal: &mut CloneJournal,
) -> Result<ClonedRows<R>>
where
    R: VersionedRow,
    S: RowStore<R> + ?Sized,
{
    if source == target {
        return Err(StateError::InvalidScope {
            message: format!("cannot clone {} onto itself", source),
        });
    }

    let rows = store.retrieve_by_app_version(source)?;
    let mut ids = IdMap::with_capacity(rows.len());
    let mut cloned = Vec::with_capacity(rows.len());

    for mut row in rows {
        let old_id = row.id();
        row.set_id(0);
        row.set_scope(target);
        audit.apply(row.audit_mut());

        let new_id = store.create(&row)?;
        journal.record_row(R::ROW_KIND, new_id);

        row.set_id(new_id);
        ids.insert(old_id, new_id);
        cloned.push(row);
    }

    debug!(
        "Cloned {} {} rows from {} to {}",
        cloned.len(),
        R::ROW_KIND,
        source,
        target
    );

    Ok(ClonedRows { rows: cloned, ids })
}
