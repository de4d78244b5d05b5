//! Set state rows.

use serde::{Deserialize, Serialize};

use super::{Audit, Id, RowKind, Scope, Version};

/// Kind tag for set state rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetStateKind {
    DisplayName,
}

/// One member of a string set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetState {
    pub id: Id,
    pub app: Id,
    pub version: Version,
    pub kind: SetStateKind,
    pub value: String,

    #[serde(flatten)]
    pub audit: Audit,
}

versioned_row!(SetState, SetStateKind, RowKind::SetState, kind);

impl SetState {
    pub fn new(scope: Scope, kind: SetStateKind, value: impl Into<String>, audit: Audit) -> Self {
        Self {
            id: 0,
            app: scope.app,
            version: scope.version,
            kind,
            value: value.into(),
            audit,
        }
    }

    pub fn display_name(scope: Scope, value: impl Into<String>, audit: Audit) -> Self {
        Self::new(scope, SetStateKind::DisplayName, value, audit)
    }
}
