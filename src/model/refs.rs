//! Typed node references.
//!
//! In memory a tree node's children are an ordered [`NodeRefs`] list and its
//! parent is an `Option<Id>`. On disk the children are a JSON-encoded string
//! such as `"[2,3]"` and a missing parent is the sentinel `0`. The
//! conversion happens only in the serde adapters of this module.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Id;

/// The on-disk parent value of a root node.
pub const ROOT_PARENT: Id = 0;

/// Ordered list of node identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodeRefs(Vec<Id>);

impl NodeRefs {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Decode a stored reference list.
    ///
    /// Anything that is not a JSON array of non-negative integers decodes to
    /// an empty list; a partial parse is never returned.
    pub fn decode(encoded: &str) -> Self {
        serde_json::from_str::<Vec<Id>>(encoded)
            .map(Self)
            .unwrap_or_default()
    }

    /// Encode for storage.
    pub fn encode(&self) -> String {
        let items: Vec<String> = self.0.iter().map(|id| id.to_string()).collect();
        format!("[{}]", items.join(","))
    }

    pub fn push(&mut self, id: Id) {
        self.0.push(id);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: Id) -> bool {
        self.0.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = Id> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[Id] {
        &self.0
    }
}

impl From<Vec<Id>> for NodeRefs {
    fn from(ids: Vec<Id>) -> Self {
        Self(ids)
    }
}

impl FromIterator<Id> for NodeRefs {
    fn from_iter<I: IntoIterator<Item = Id>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a NodeRefs {
    type Item = &'a Id;
    type IntoIter = std::slice::Iter<'a, Id>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Serde adapter storing [`NodeRefs`] as its string encoding.
pub mod encoded {
    use super::*;

    pub fn serialize<S: Serializer>(refs: &NodeRefs, serializer: S) -> Result<S::Ok, S::Error> {
        refs.encode().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NodeRefs, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(NodeRefs::decode(&raw))
    }
}

/// Serde adapter storing a missing parent as [`ROOT_PARENT`].
pub mod parent {
    use super::*;

    pub fn serialize<S: Serializer>(parent: &Option<Id>, serializer: S) -> Result<S::Ok, S::Error> {
        parent.unwrap_or(ROOT_PARENT).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Id>, D::Error> {
        let raw = Id::deserialize(deserializer)?;
        Ok((raw != ROOT_PARENT).then_some(raw))
    }
}
