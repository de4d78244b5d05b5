//! Key/value state rows.

use serde::{Deserialize, Serialize};

use super::{Audit, Id, RowKind, Scope, Version};

/// Kind tag for key/value state rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KvStateKind {
    /// Component dependency graph; values are JSON string arrays.
    Dependencies,
    /// Drag shadow annotations; values are JSON objects.
    DragShadow,
    /// Dotted line square annotations; values are JSON objects.
    DottedLineSquare,
}

impl KvStateKind {
    pub const ALL: [KvStateKind; 3] = [
        KvStateKind::Dependencies,
        KvStateKind::DragShadow,
        KvStateKind::DottedLineSquare,
    ];
}

/// A keyed entry. The key is unique within (app, version, kind).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvState {
    pub id: Id,
    pub app: Id,
    pub version: Version,
    pub kind: KvStateKind,
    pub key: String,

    /// Serialized JSON value.
    pub value: String,

    #[serde(flatten)]
    pub audit: Audit,
}

versioned_row!(KvState, KvStateKind, RowKind::KvState, kind);

impl KvState {
    pub fn new(
        scope: Scope,
        kind: KvStateKind,
        key: impl Into<String>,
        value: impl Into<String>,
        audit: Audit,
    ) -> Self {
        Self {
            id: 0,
            app: scope.app,
            version: scope.version,
            kind,
            key: key.into(),
            value: value.into(),
            audit,
        }
    }
}
