//! Cloning of versioned app state.
//!
//! A clone copies every row of one (app, version) scope into another scope
//! for all four state kinds:
//!
//! - [`remap`] - Phase one: insert copies, build the old to new id table
//! - [`relink`] - Phase two for the tree kind: rewrite node references
//! - [`journal`] - Record of created rows, used to undo a failed clone
//!
//! Release and duplicate both go through [`clone_all_kinds`]; they differ
//! only in the target scope and audit handling.

pub mod journal;
pub mod relink;
pub mod remap;

pub use journal::{CloneJournal, Created};
pub use relink::{relink_node, relink_tree, Dangling, DanglingPolicy};
pub use remap::{remap_scope, AuditRewrite, ClonedRows, IdMap};

use crate::error::Result;
use crate::model::{Action, KvState, Scope, SetState, TreeState};
use crate::store::Backend;

/// Settings for one clone.
#[derive(Debug, Clone, Copy)]
pub struct CloneOptions {
    pub audit: AuditRewrite,
    pub dangling: DanglingPolicy,
}

/// Row counts of a completed clone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CloneReport {
    pub tree_nodes: usize,
    pub kv_rows: usize,
    pub set_rows: usize,
    pub actions: usize,
}

impl CloneReport {
    pub fn total(&self) -> usize {
        self.tree_nodes + self.kv_rows + self.set_rows + self.actions
    }
}

/// Clone the tree, key/value, set and action rows of `source` into `target`.
///
/// Each kind's phase one finishes before its phase two starts. Stops at the
/// first error; everything created so far is in `journal`.
pub fn clone_all_kinds<S: Backend + ?Sized>(
    store: &S,
    source: Scope,
    target: Scope,
    options: &CloneOptions,
    journal: &mut CloneJournal,
) -> Result<CloneReport> {
    let mut tree: ClonedRows<TreeState> =
        remap_scope(store, source, target, &options.audit, journal)?;
    relink_tree(store, &mut tree, options.dangling)?;

    let kv: ClonedRows<KvState> = remap_scope(store, source, target, &options.audit, journal)?;
    let set: ClonedRows<SetState> = remap_scope(store, source, target, &options.audit, journal)?;
    let actions: ClonedRows<Action> =
        remap_scope(store, source, target, &options.audit, journal)?;

    Ok(CloneReport {
        tree_nodes: tree.len(),
        kv_rows: kv.len(),
        set_rows: set.len(),
        actions: actions.len(),
    })
}
