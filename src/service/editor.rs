//! Editor document assembly.
//!
//! Reads every state kind of one (app, version) and composes the single
//! document the editor client loads: the component tree rebuilt from flat
//! tree rows, the kv kinds as keyed maps and the display names as a list.
//! Nothing here writes to storage.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::modifier_of;
use crate::error::{Result, StateError};
use crate::model::{
    Action, ActionType, AppSummary, Id, KvState, KvStateKind, Scope, SetState, SetStateKind,
    TreeState, TreeStateKind, Version,
};
use crate::store::{Backend, RowStore};

/// Content keys owned by the tree structure rather than the component.
const STRUCTURAL_KEYS: [&str; 3] = ["displayName", "parentNode", "childrenNode"];

/// A component with its children resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNode {
    pub display_name: String,
    pub parent_node: Option<String>,
    #[serde(flatten)]
    pub props: Map<String, Value>,
    pub children_node: Vec<ComponentNode>,
}

impl ComponentNode {
    /// Number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self
            .children_node
            .iter()
            .map(ComponentNode::node_count)
            .sum::<usize>()
    }

    pub fn find(&self, display_name: &str) -> Option<&ComponentNode> {
        if self.display_name == display_name {
            return Some(self);
        }
        self.children_node.iter().find_map(|c| c.find(display_name))
    }
}

/// Client view of an action. Exposes the type by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionView {
    #[serde(rename = "actionId")]
    pub id: Id,
    #[serde(rename = "resourceId", default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Id>,
    pub display_name: String,
    pub action_type: ActionType,
    #[serde(rename = "content")]
    pub template: Map<String, Value>,
    pub transformer: Map<String, Value>,
    pub trigger_mode: String,
    pub created_at: DateTime<Utc>,
    pub created_by: Id,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Id,
}

impl From<&Action> for ActionView {
    fn from(action: &Action) -> Self {
        Self {
            id: action.id,
            resource: action.resource,
            display_name: action.name.clone(),
            action_type: action.action_type,
            template: action.template.clone(),
            transformer: action.transformer.clone(),
            trigger_mode: action.trigger_mode.clone(),
            created_at: action.audit.created_at,
            created_by: action.audit.created_by,
            updated_at: action.audit.updated_at,
            updated_by: action.audit.updated_by,
        }
    }
}

/// The assembled state of one (app, version).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorDocument {
    pub app_info: AppSummary,
    pub actions: Vec<ActionView>,
    pub components: Option<ComponentNode>,
    pub dependencies_state: BTreeMap<String, Vec<String>>,
    pub drag_shadow_state: BTreeMap<String, Value>,
    pub dotted_line_square_state: BTreeMap<String, Value>,
    pub display_name_state: Vec<String>,
}

/// Builds [`EditorDocument`]s from storage.
pub struct EditorAssembler<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: Backend + ?Sized> EditorAssembler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Assemble the document for `version` of `app_id`.
    ///
    /// # Errors
    ///
    /// `AppNotFound` if the app does not exist, `VersionNotFound` if
    /// `version` is beyond the app's mainline version, and
    /// `StructuralCorruption` if the tree rows do not form a rooted tree.
    pub fn assemble(&self, app_id: Id, version: Version) -> Result<EditorDocument> {
        let app = self
            .store
            .retrieve_app(app_id)?
            .ok_or(StateError::AppNotFound { app: app_id })?;
        if !app.has_version(version) {
            return Err(StateError::VersionNotFound {
                app: app_id,
                version,
                mainline: app.mainline_version,
            });
        }

        let scope = Scope::new(app_id, version);
        let modifier = modifier_of(self.store, app.audit.updated_by)?;

        let actions: Vec<Action> = RowStore::<Action>::retrieve_by_app_version(self.store, scope)?;
        let nodes = RowStore::<TreeState>::retrieve_by_kind(
            self.store,
            scope,
            TreeStateKind::Components,
        )?;
        let display_names =
            RowStore::<SetState>::retrieve_by_kind(self.store, scope, SetStateKind::DisplayName)?;

        Ok(EditorDocument {
            app_info: app.summary(modifier),
            actions: actions.iter().map(ActionView::from).collect(),
            components: build_component_tree(&nodes, scope)?,
            dependencies_state: dependency_map(&self.kv_rows(scope, KvStateKind::Dependencies)?),
            drag_shadow_state: object_map(&self.kv_rows(scope, KvStateKind::DragShadow)?),
            dotted_line_square_state: object_map(
                &self.kv_rows(scope, KvStateKind::DottedLineSquare)?,
            ),
            display_name_state: display_name_list(&display_names),
        })
    }

    fn kv_rows(&self, scope: Scope, kind: KvStateKind) -> Result<Vec<KvState>> {
        RowStore::<KvState>::retrieve_by_kind(self.store, scope, kind)
    }
}

/// Rebuild the nested component tree from flat rows.
///
/// Returns `None` when the scope has no tree rows at all.
pub fn build_component_tree(nodes: &[TreeState], scope: Scope) -> Result<Option<ComponentNode>> {
    if nodes.is_empty() {
        return Ok(None);
    }

    let corrupt = |message: String| StateError::StructuralCorruption {
        app: scope.app,
        version: scope.version,
        message,
    };

    let roots: Vec<&TreeState> = nodes.iter().filter(|node| node.is_root()).collect();
    let root = match roots.as_slice() {
        [] => return Err(corrupt("no root node".to_string())),
        [root] => *root,
        many => return Err(corrupt(format!("{} nodes named root", many.len()))),
    };

    let by_id: HashMap<Id, &TreeState> = nodes.iter().map(|node| (node.id, node)).collect();
    let mut seen = HashSet::with_capacity(nodes.len());

    build_node(root, None, &by_id, &mut seen, &corrupt).map(Some)
}

fn build_node(
    node: &TreeState,
    parent_name: Option<&str>,
    by_id: &HashMap<Id, &TreeState>,
    seen: &mut HashSet<Id>,
    corrupt: &dyn Fn(String) -> StateError,
) -> Result<ComponentNode> {
    if !seen.insert(node.id) {
        return Err(corrupt(format!("node {} is reachable twice", node.id)));
    }

    let mut children = Vec::with_capacity(node.children.len());
    for child_id in node.children.iter() {
        let child = by_id.get(&child_id).ok_or_else(|| {
            corrupt(format!("node {} lists missing child {}", node.id, child_id))
        })?;
        children.push(build_node(child, Some(&node.name), by_id, seen, corrupt)?);
    }

    Ok(ComponentNode {
        display_name: node.name.clone(),
        parent_node: parent_name.map(String::from),
        props: component_props(&node.content),
        children_node: children,
    })
}

fn component_props(content: &Value) -> Map<String, Value> {
    match content {
        Value::Object(map) => {
            let mut props = map.clone();
            for key in STRUCTURAL_KEYS {
                props.remove(key);
            }
            props
        }
        Value::Null => Map::new(),
        other => {
            let mut props = Map::new();
            props.insert("content".to_string(), other.clone());
            props
        }
    }
}

/// Dependency rows as `key -> [string]`. Undecodable values become empty.
pub fn dependency_map(rows: &[KvState]) -> BTreeMap<String, Vec<String>> {
    rows.iter()
        .map(|row| {
            let value = serde_json::from_str::<Vec<String>>(&row.value).unwrap_or_else(|e| {
                warn!("Dependency '{}' has an undecodable value: {}", row.key, e);
                Vec::new()
            });
            (row.key.clone(), value)
        })
        .collect()
}

/// Annotation rows as `key -> value`. Undecodable values become null.
pub fn object_map(rows: &[KvState]) -> BTreeMap<String, Value> {
    rows.iter()
        .map(|row| {
            let value = serde_json::from_str::<Value>(&row.value).unwrap_or_else(|e| {
                warn!("State '{}' has an undecodable value: {}", row.key, e);
                Value::Null
            });
            (row.key.clone(), value)
        })
        .collect()
}

/// Display names in stored order, each once.
pub fn display_name_list(rows: &[SetState]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.iter()
        .filter(|row| seen.insert(row.value.as_str()))
        .map(|row| row.value.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Audit;
    use serde_json::json;

    fn node(id: Id, name: &str, parent: Option<Id>, children: Vec<Id>) -> TreeState {
        let mut row = TreeState::component(
            Scope::draft(1),
            name,
            parent,
            json!({"type": "BUTTON_WIDGET", "displayName": "stale", "childrenNode": []}),
            Audit::now(1),
        )
        .with_children(children);
        row.id = id;
        row
    }

    #[test]
    fn empty_scope_has_no_components() {
        assert_eq!(build_component_tree(&[], Scope::draft(1)).unwrap(), None);
    }

    #[test]
    fn nests_children_in_order() {
        let rows = vec![
            node(3, "input1", Some(1), vec![]),
            node(1, "root", None, vec![2, 3]),
            node(2, "button1", Some(1), vec![]),
        ];
        let tree = build_component_tree(&rows, Scope::draft(1)).unwrap().unwrap();

        assert_eq!(tree.display_name, "root");
        assert_eq!(tree.parent_node, None);
        let names: Vec<&str> = tree
            .children_node
            .iter()
            .map(|c| c.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["button1", "input1"]);
        assert_eq!(tree.children_node[0].parent_node.as_deref(), Some("root"));
        assert_eq!(tree.node_count(), 3);
        assert_eq!(
            tree.find("input1").and_then(|n| n.parent_node.as_deref()),
            Some("root")
        );
        assert!(tree.find("missing").is_none());
    }

    #[test]
    fn structural_keys_are_replaced() {
        let rows = vec![node(1, "root", None, vec![])];
        let tree = build_component_tree(&rows, Scope::draft(1)).unwrap().unwrap();
        let value = serde_json::to_value(&tree).unwrap();

        assert_eq!(value["displayName"], "root");
        assert_eq!(value["type"], "BUTTON_WIDGET");
        assert_eq!(value["childrenNode"], json!([]));
    }

    #[test]
    fn missing_root_is_corruption() {
        let rows = vec![node(2, "button1", Some(1), vec![])];
        let err = build_component_tree(&rows, Scope::draft(1)).unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn duplicate_root_is_corruption() {
        let rows = vec![
            node(1, "root", None, vec![]),
            node(2, "root", Some(1), vec![]),
        ];
        let err = build_component_tree(&rows, Scope::draft(1)).unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("2 nodes named root"));
    }

    #[test]
    fn missing_child_is_corruption() {
        let rows = vec![node(1, "root", None, vec![2, 9]), node(2, "a", Some(1), vec![])];
        let err = build_component_tree(&rows, Scope::draft(1)).unwrap_err();
        assert!(err.to_string().contains("missing child 9"));
    }

    #[test]
    fn cycle_is_corruption() {
        let rows = vec![
            node(1, "root", None, vec![2]),
            node(2, "a", Some(1), vec![3]),
            node(3, "b", Some(2), vec![2]),
        ];
        let err = build_component_tree(&rows, Scope::draft(1)).unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn dependency_values_are_decoded() {
        let rows = vec![
            KvState::new(
                Scope::draft(1),
                KvStateKind::Dependencies,
                "btn1",
                r#"["input1","input2"]"#,
                Audit::now(1),
            ),
            KvState::new(
                Scope::draft(1),
                KvStateKind::Dependencies,
                "broken",
                "{not json",
                Audit::now(1),
            ),
        ];
        let map = dependency_map(&rows);
        assert_eq!(map["btn1"], vec!["input1", "input2"]);
        assert!(map["broken"].is_empty());
    }

    #[test]
    fn object_values_are_decoded() {
        let rows = vec![KvState::new(
            Scope::draft(1),
            KvStateKind::DottedLineSquare,
            "square1",
            r#"{"x":1,"y":2}"#,
            Audit::now(1),
        )];
        let map = object_map(&rows);
        assert_eq!(map["square1"], json!({"x": 1, "y": 2}));
    }

    #[test]
    fn display_names_are_deduplicated_in_order() {
        let rows: Vec<SetState> = ["b", "a", "b"]
            .iter()
            .map(|v| SetState::display_name(Scope::draft(1), *v, Audit::now(1)))
            .collect();
        assert_eq!(display_name_list(&rows), vec!["b", "a"]);
    }

    #[test]
    fn action_view_exposes_type_name() {
        let mut action = Action::new(
            Scope::draft(1),
            "query1",
            ActionType::PostgreSql,
            "manually",
            Audit::now(3),
        )
        .with_resource(8);
        action.id = 5;
        let value = serde_json::to_value(ActionView::from(&action)).unwrap();

        assert_eq!(value["actionId"], 5);
        assert_eq!(value["resourceId"], 8);
        assert_eq!(value["actionType"], "postgresql");
        assert_eq!(value["displayName"], "query1");
        assert_eq!(value["createdBy"], 3);
    }
}
