//! Hierarchical component tree rows.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::refs::{self, NodeRefs};
use super::{Audit, Id, RowKind, Scope, Version};

/// Name of the single root node of every component tree.
pub const ROOT_NODE_NAME: &str = "root";

/// Kind tag for tree state rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeStateKind {
    Components,
}

/// One node of a component tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeState {
    pub id: Id,
    pub app: Id,
    pub version: Version,
    pub kind: TreeStateKind,

    /// Parent node, `None` for the root.
    #[serde(with = "refs::parent")]
    pub parent: Option<Id>,

    /// Ordered children.
    #[serde(with = "refs::encoded")]
    pub children: NodeRefs,

    pub name: String,

    /// Opaque component definition.
    pub content: Value,

    #[serde(flatten)]
    pub audit: Audit,
}

versioned_row!(TreeState, TreeStateKind, RowKind::TreeState, kind);

impl TreeState {
    /// A not-yet-inserted component node.
    pub fn component(
        scope: Scope,
        name: impl Into<String>,
        parent: Option<Id>,
        content: Value,
        audit: Audit,
    ) -> Self {
        Self {
            id: 0,
            app: scope.app,
            version: scope.version,
            kind: TreeStateKind::Components,
            parent,
            children: NodeRefs::new(),
            name: name.into(),
            content,
            audit,
        }
    }

    /// The root node every new app starts with.
    pub fn initial_root(scope: Scope, audit: Audit) -> Self {
        Self::component(scope, ROOT_NODE_NAME, None, initial_root_content(), audit)
    }

    pub fn is_root(&self) -> bool {
        self.name == ROOT_NODE_NAME
    }

    pub fn with_children(mut self, children: impl Into<NodeRefs>) -> Self {
        self.children = children.into();
        self
    }
}

/// Content of the root panel of a freshly created app.
pub fn initial_root_content() -> Value {
    json!({
        "type": "DOT_PANEL",
        "containerType": "EDITOR_DOT_PANEL",
        "showName": "root",
        "verticalResize": true,
        "h": 0,
        "w": 0,
        "minH": 0,
        "minW": 0,
        "x": -1,
        "y": -1,
        "z": 0,
        "props": {
            "currentPageIndex": 0,
            "pageSortedKey": ["page1"]
        }
    })
}
