//! Phase two of a tree clone: rewrite parent and children references.
//!
//! Rows coming out of [`super::remap::remap_scope`] already have their new
//! ids but still point at the source tree. Every reference is translated
//! through the [`IdMap`] of that same clone. The root's missing parent is
//! never looked up.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::remap::{ClonedRows, IdMap};
use crate::error::{Result, StateError};
use crate::model::{Id, NodeRefs, TreeState};
use crate::store::RowStore;

/// What to do with a reference that is not in the mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DanglingPolicy {
    /// Fail the clone with a structural corruption error.
    #[default]
    Strict,
    /// Detach: a dangling parent becomes the root sentinel, a dangling
    /// child is dropped.
    Lenient,
}

/// A reference that did not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dangling {
    Parent { node: Id, parent: Id },
    Child { node: Id, child: Id },
}

impl Dangling {
    fn describe(&self) -> String {
        match self {
            Dangling::Parent { node, parent } => {
                format!("node {} has parent {} outside the tree", node, parent)
            }
            Dangling::Child { node, child } => {
                format!("node {} has child {} outside the tree", node, child)
            }
        }
    }
}

/// Translate one node's references in place.
///
/// Returns the dangling references found. Under [`DanglingPolicy::Strict`]
/// the node is left untouched when any are found.
pub fn relink_node(node: &mut TreeState, ids: &IdMap, policy: DanglingPolicy) -> Vec<Dangling> {
    let mut dangling = Vec::new();

    let parent = match node.parent {
        None => None,
        Some(old) => match ids.get(old) {
            Some(new) => Some(new),
            None => {
                dangling.push(Dangling::Parent {
                    node: node.id,
                    parent: old,
                });
                None
            }
        },
    };

    let children: NodeRefs = node
        .children
        .iter()
        .filter_map(|old| {
            let new = ids.get(old);
            if new.is_none() {
                dangling.push(Dangling::Child {
                    node: node.id,
                    child: old,
                });
            }
            new
        })
        .collect();

    if dangling.is_empty() || policy == DanglingPolicy::Lenient {
        node.parent = parent;
        node.children = children;
    }

    dangling
}

/// Rewrite every cloned node's references and persist them.
///
/// All nodes are translated before the first update, so a strict failure
/// leaves the stored rows exactly as phase one wrote them.
pub fn relink_tree<S>(
    store: &S,
    cloned: &mut ClonedRows<TreeState>,
    policy: DanglingPolicy,
) -> Result<usize>
where
    S: RowStore<TreeState> + ?Sized,
{
    let mut found = Vec::new();
    for node in &mut cloned.rows {
        found.extend(relink_node(node, &cloned.ids, policy));
    }

    if !found.is_empty() {
        match policy {
            DanglingPolicy::Strict => {
                let (app, version) = cloned
                    .rows
                    .first()
                    .map(|row| (row.app, row.version))
                    .unwrap_or_default();
                let message = found
                    .iter()
                    .map(Dangling::describe)
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(StateError::StructuralCorruption {
                    app,
                    version,
                    message,
                });
            }
            DanglingPolicy::Lenient => {
                for dangling in &found {
                    warn!("Detaching dangling reference: {}", dangling.describe());
                }
            }
        }
    }

    for node in &cloned.rows {
        store.update(node)?;
    }

    debug!("Relinked {} tree nodes", cloned.rows.len());
    Ok(cloned.rows.len())
}
