//! Tag tree model
//!
//! A catalog is an ordered collection of named tag trees, one per
//! definition file. Trees are built from YAML values and keep the mapping
//! order of the source document.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_yaml::Value;

/// One node of a tag hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub enum TagNode {
    /// A literal prompt fragment, possibly carrying the negative marker
    Leaf(String),
    /// Labelled children in source order
    Group(Vec<(String, TagNode)>),
    /// Unlabelled fragments under one category
    List(Vec<TagNode>),
}

impl TagNode {
    /// Convert a parsed YAML value into a tag tree.
    pub fn from_yaml(value: Value) -> Self {
        match value {
            Value::Null => TagNode::Group(Vec::new()),
            Value::Bool(b) => TagNode::Leaf(b.to_string()),
            Value::Number(n) => TagNode::Leaf(n.to_string()),
            Value::String(s) => TagNode::Leaf(s),
            Value::Sequence(items) => {
                TagNode::List(items.into_iter().map(TagNode::from_yaml).collect())
            }
            Value::Mapping(map) => TagNode::Group(
                map.into_iter()
                    .map(|(k, v)| (key_to_string(k), TagNode::from_yaml(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => TagNode::from_yaml(tagged.value),
        }
    }

    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            TagNode::Leaf(text) => Some(text),
            _ => None,
        }
    }

    /// The leaf a node collapses to under the flattening rule: a group
    /// holding exactly one leaf child.
    pub fn degenerate_leaf(&self) -> Option<&str> {
        match self {
            TagNode::Group(children) if children.len() == 1 => children[0].1.as_leaf(),
            _ => None,
        }
    }

    /// Child lookup by label, for groups only.
    pub fn child(&self, label: &str) -> Option<&TagNode> {
        match self {
            TagNode::Group(children) => children
                .iter()
                .find(|(key, _)| key == label)
                .map(|(_, node)| node),
            _ => None,
        }
    }

    /// Number of leaves reachable from this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            TagNode::Leaf(_) => 1,
            TagNode::Group(children) => children.iter().map(|(_, n)| n.leaf_count()).sum(),
            TagNode::List(items) => items.iter().map(TagNode::leaf_count).sum(),
        }
    }
}

impl Serialize for TagNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TagNode::Leaf(text) => serializer.serialize_str(text),
            TagNode::List(items) => items.serialize(serializer),
            TagNode::Group(children) => serialize_pairs(children, serializer),
        }
    }
}

fn serialize_pairs<S: Serializer>(
    pairs: &[(String, TagNode)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(pairs.len()))?;
    for (key, node) in pairs {
        map.serialize_entry(key, node)?;
    }
    map.end()
}

fn key_to_string(key: Value) -> String {
    match key {
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// All loaded tag trees keyed by catalog name, in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagCatalog {
    entries: Vec<(String, TagNode)>,
}

impl Serialize for TagCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_pairs(&self.entries, serializer)
    }
}

impl TagCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a tree. A replaced entry keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, node: TagNode) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = node,
            None => self.entries.push((name, node)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&TagNode> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, node)| node)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagNode)> {
        self.entries.iter().map(|(key, node)| (key.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
