//! Flattening a tag tree into pickable buttons
//!
//! Traversal is depth-first and follows source order. Groups emit a
//! header whose value is a wildcard token `@catalog:group:sub@` naming the
//! whole group, then their children.

use serde::Serialize;

use crate::catalog::TagNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonKind {
    Header,
    Tag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagButton {
    pub label: String,
    pub value: String,
    pub depth: usize,
    pub kind: ButtonKind,
}

impl TagButton {
    fn tag(label: impl Into<String>, value: impl Into<String>, depth: usize) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            depth,
            kind: ButtonKind::Tag,
        }
    }
}

/// Wildcard token referring to the group at `path`.
pub fn wildcard_token(path: &str) -> String {
    format!("@{path}@")
}

enum Frame<'a> {
    Group {
        prefix: String,
        depth: usize,
        children: std::slice::Iter<'a, (String, TagNode)>,
    },
    List {
        prefix: String,
        depth: usize,
        items: std::slice::Iter<'a, TagNode>,
    },
}

/// Lazy, ordered button sequence for one catalog entry.
pub struct TagButtons<'a> {
    marker: &'a str,
    stack: Vec<Frame<'a>>,
    pending: Option<TagButton>,
}

/// Buttons for the tree stored under `catalog_name`.
///
/// `negative_marker` is stripped from list item labels; values keep it.
pub fn buttons<'a>(catalog_name: &str, node: &'a TagNode, negative_marker: &'a str) -> TagButtons<'a> {
    let mut iter = TagButtons {
        marker: negative_marker,
        stack: Vec::new(),
        pending: None,
    };
    match node {
        TagNode::Leaf(text) => iter.pending = Some(TagButton::tag(catalog_name, text.as_str(), 0)),
        _ => iter.push(node, catalog_name.to_string(), 0),
    }
    iter
}

impl<'a> TagButtons<'a> {
    fn push(&mut self, node: &'a TagNode, prefix: String, depth: usize) {
        match node {
            TagNode::Group(children) => self.stack.push(Frame::Group {
                prefix,
                depth,
                children: children.iter(),
            }),
            TagNode::List(items) => self.stack.push(Frame::List {
                prefix,
                depth,
                items: items.iter(),
            }),
            TagNode::Leaf(_) => {}
        }
    }

    fn list_label(&self, text: &str) -> String {
        if self.marker.is_empty() {
            return text.to_string();
        }
        text.strip_prefix(self.marker).unwrap_or(text).to_string()
    }
}

impl<'a> Iterator for TagButtons<'a> {
    type Item = TagButton;

    fn next(&mut self) -> Option<TagButton> {
        if let Some(button) = self.pending.take() {
            return Some(button);
        }

        loop {
            let frame = self.stack.last_mut()?;
            match frame {
                Frame::Group {
                    prefix,
                    depth,
                    children,
                } => {
                    let Some((key, child)) = children.next() else {
                        self.stack.pop();
                        continue;
                    };
                    let depth = *depth;
                    if let Some(text) = child.as_leaf().or_else(|| child.degenerate_leaf()) {
                        return Some(TagButton::tag(key.as_str(), text, depth));
                    }
                    let path = format!("{prefix}:{key}");
                    let header = TagButton {
                        label: key.clone(),
                        value: wildcard_token(&path),
                        depth,
                        kind: ButtonKind::Header,
                    };
                    self.push(child, path, depth + 1);
                    return Some(header);
                }
                Frame::List {
                    prefix,
                    depth,
                    items,
                } => {
                    let Some(item) = items.next() else {
                        self.stack.pop();
                        continue;
                    };
                    let depth = *depth;
                    match item {
                        TagNode::Leaf(text) => {
                            let label = self.list_label(text);
                            return Some(TagButton::tag(label, text.as_str(), depth));
                        }
                        nested => {
                            let prefix = prefix.clone();
                            self.push(nested, prefix, depth);
                        }
                    }
                }
            }
        }
    }
}
