//! Versioned state rows and the app record.
//!
//! Every row belongs to one [`Scope`]: an app and a version. Version
//! [`EDIT_VERSION`] is the single mutable draft; every higher version is an
//! immutable snapshot created by a release.
//!
//! - [`app`] - App record, summaries and users
//! - [`tree`] - Hierarchical component tree rows
//! - [`kv`] - Key/value state rows
//! - [`set`] - Set state rows
//! - [`action`] - Action rows and the action type table
//! - [`refs`] - Typed node references and their storage encoding

/// Implements [`Record`] and [`VersionedRow`] for a row struct with the
/// usual `id`, `app`, `version`, `kind` and `audit` fields.
macro_rules! versioned_row {
    ($row:ty, $kind:ty, $row_kind:expr, $kind_field:ident) => {
        impl $crate::model::Record for $row {
            fn id(&self) -> $crate::model::Id {
                self.id
            }

            fn set_id(&mut self, id: $crate::model::Id) {
                self.id = id;
            }
        }

        impl $crate::model::VersionedRow for $row {
            type Kind = $kind;

            const ROW_KIND: $crate::model::RowKind = $row_kind;

            fn scope(&self) -> $crate::model::Scope {
                $crate::model::Scope::new(self.app, self.version)
            }

            fn set_scope(&mut self, scope: $crate::model::Scope) {
                self.app = scope.app;
                self.version = scope.version;
            }

            fn kind(&self) -> $kind {
                self.$kind_field
            }

            fn audit(&self) -> &$crate::model::Audit {
                &self.audit
            }

            fn audit_mut(&mut self) -> &mut $crate::model::Audit {
                &mut self.audit
            }
        }
    };
}

pub mod action;
pub mod app;
pub mod kv;
pub mod refs;
pub mod set;
pub mod tree;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use action::{Action, ActionType};
pub use app::{App, AppActivity, AppSummary, User};
pub use kv::{KvState, KvStateKind};
pub use refs::NodeRefs;
pub use set::{SetState, SetStateKind};
pub use tree::{TreeState, TreeStateKind, ROOT_NODE_NAME};

/// Store-assigned row identifier. `0` means "not yet inserted".
pub type Id = u64;

/// App version number.
pub type Version = u32;

/// The draft version every edit happens against.
pub const EDIT_VERSION: Version = 0;

/// The (app, version) partition a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub app: Id,
    pub version: Version,
}

impl Scope {
    pub fn new(app: Id, version: Version) -> Self {
        Self { app, version }
    }

    /// The draft scope of an app.
    pub fn draft(app: Id) -> Self {
        Self::new(app, EDIT_VERSION)
    }

    pub fn is_draft(&self) -> bool {
        self.version == EDIT_VERSION
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "app {} v{}", self.app, self.version)
    }
}

/// Creator/updater bookkeeping shared by every row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    pub created_by: Id,
    pub created_at: DateTime<Utc>,
    pub updated_by: Id,
    pub updated_at: DateTime<Utc>,
}

impl Audit {
    /// Audit fields for a row created by `actor` at `at`.
    pub fn stamped(actor: Id, at: DateTime<Utc>) -> Self {
        Self {
            created_by: actor,
            created_at: at,
            updated_by: actor,
            updated_at: at,
        }
    }

    /// Audit fields for a row created by `actor` now.
    pub fn now(actor: Id) -> Self {
        Self::stamped(actor, Utc::now())
    }

    /// Record an update by `actor` at `at`.
    pub fn touch(&mut self, actor: Id, at: DateTime<Utc>) {
        self.updated_by = actor;
        self.updated_at = at;
    }
}

/// The four independently stored state kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    TreeState,
    KvState,
    SetState,
    Action,
}

impl RowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowKind::TreeState => "tree_state",
            RowKind::KvState => "kv_state",
            RowKind::SetState => "set_state",
            RowKind::Action => "action",
        }
    }
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record with a store-assigned identifier.
pub trait Record: Clone + fmt::Debug {
    fn id(&self) -> Id;
    fn set_id(&mut self, id: Id);
}

/// A record that lives in one (app, version) scope and can be cloned into
/// another.
pub trait VersionedRow: Record {
    /// The state-kind tag used to partition rows within a scope.
    type Kind: Copy + Eq + fmt::Debug;

    /// Which of the four stores holds this row.
    const ROW_KIND: RowKind;

    fn scope(&self) -> Scope;
    fn set_scope(&mut self, scope: Scope);
    fn kind(&self) -> Self::Kind;
    fn audit(&self) -> &Audit;
    fn audit_mut(&mut self) -> &mut Audit;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_scope_is_version_zero() {
        let scope = Scope::draft(7);
        assert_eq!(scope.version, EDIT_VERSION);
        assert!(scope.is_draft());
        assert!(!Scope::new(7, 2).is_draft());
    }

    #[test]
    fn scope_display() {
        assert_eq!(Scope::new(3, 2).to_string(), "app 3 v2");
    }

    #[test]
    fn audit_touch_updates_only_updated_fields() {
        let created = Utc::now();
        let mut audit = Audit::stamped(1, created);
        let later = created + chrono::Duration::seconds(5);
        audit.touch(2, later);

        assert_eq!(audit.created_by, 1);
        assert_eq!(audit.created_at, created);
        assert_eq!(audit.updated_by, 2);
        assert_eq!(audit.updated_at, later);
    }
}
