//! Document model: component nodes, their definitions, and the owned tree.
//!
//! This module defines the value form of a subtree (`ComponentDef`, the shape
//! the synthesizer produces and the store persists), the live node type
//! (`Node`), and the arena that owns every node of one document
//! (`ComponentTree`).
//!
//! The tree is the sole owner of its nodes. Callers address nodes by
//! [`NodeId`] and mutate through the tree's insert/remove/move operations, so
//! parent links and child order can never drift apart.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::kind::{ComponentKind, Tag};

/// Unique identifier for a node in a [`ComponentTree`].
pub type NodeId = Uuid;

/// Attribute map. Ordered so exports and snapshots are deterministic.
pub type Attributes = BTreeMap<String, String>;

/// Errors from structural tree operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocError {
    #[error("node not found: {0}")]
    NotFound(NodeId),
    #[error("the document root cannot be removed or moved")]
    RootImmutable,
    #[error("node {node} is not a child of {parent}")]
    NotAChild { node: NodeId, parent: NodeId },
    #[error("index {index} out of range for parent with {len} children")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("{tag} does not carry text content")]
    ContentNotAllowed { node: NodeId, tag: String },
    #[error("invalid attribute name: {0:?}")]
    InvalidAttributeName(String),
}

/// Characters allowed in tag and attribute names.
#[must_use]
pub fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':'
}

/// Whether `name` can be written as a tag or attribute name and read back.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_name_char)
}

/// Nested value form of a subtree.
///
/// Field names follow the component-definition convention used on the wire
/// (`type`, `content`, `attributes`, `components`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDef {
    #[serde(rename = "type")]
    pub tag: Tag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentDef>,
}

impl ComponentDef {
    /// A bare definition with no content, attributes, or children.
    #[must_use]
    pub fn new(tag: impl Into<Tag>) -> Self {
        Self { tag: tag.into(), content: None, attributes: Attributes::new(), components: Vec::new() }
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: ComponentDef) -> Self {
        self.components.push(child);
        self
    }
}

/// A live node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub tag: Tag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub attributes: Attributes,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

/// Nested, id-carrying view of a subtree for clients that need to address
/// nodes (selection, edits, deletion).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeView {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub tag: Tag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<NodeView>,
}

/// Sparse edit of a node's content and attributes. Only present fields are
/// applied; an attribute mapped to `None` is removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Option<String>>,
}

/// Owned arena of component nodes rooted at an `mj-body`.
#[derive(Debug, Clone)]
pub struct ComponentTree {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
}

impl Default for ComponentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentTree {
    /// Create a tree holding only an empty `mj-body`.
    #[must_use]
    pub fn new() -> Self {
        let root = Uuid::new_v4();
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            Node {
                id: root,
                tag: Tag::Known(ComponentKind::Body),
                content: None,
                attributes: Attributes::new(),
                children: Vec::new(),
                parent: None,
            },
        );
        Self { nodes, root }
    }

    /// Build a tree from a body definition. A definition whose tag is not
    /// `mj-body` is wrapped in a fresh body.
    #[must_use]
    pub fn from_def(def: &ComponentDef) -> Self {
        let mut tree = Self::new();
        let root = tree.root;
        if def.tag == Tag::Known(ComponentKind::Body) {
            if let Some(node) = tree.nodes.get_mut(&root) {
                node.content.clone_from(&def.content);
                node.attributes.clone_from(&def.attributes);
            }
            for child in &def.components {
                tree.attach(root, child);
            }
        } else {
            tree.attach(root, def);
        }
        tree
    }

    /// The root body's id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the body has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// The node's tag, if the node exists.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&Tag> {
        self.nodes.get(&id).map(|n| &n.tag)
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Ordered children of `id`; empty if the node does not exist.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map_or(&[], |n| n.children.as_slice())
    }

    /// Position of `child` among `parent`'s children.
    #[must_use]
    pub fn index_of(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|c| *c == child)
    }

    /// Materialize `def` as the last child of `parent`. Returns the new
    /// subtree root.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::NotFound`] if `parent` is not in the tree.
    pub fn append(&mut self, parent: NodeId, def: &ComponentDef) -> Result<NodeId, DocError> {
        if !self.contains(parent) {
            return Err(DocError::NotFound(parent));
        }
        Ok(self.attach(parent, def))
    }

    fn attach(&mut self, parent: NodeId, def: &ComponentDef) -> NodeId {
        let id = Uuid::new_v4();
        self.nodes.insert(
            id,
            Node {
                id,
                tag: def.tag.clone(),
                content: def.content.clone(),
                attributes: def.attributes.clone(),
                children: Vec::new(),
                parent: Some(parent),
            },
        );
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        for child in &def.components {
            self.attach(id, child);
        }
        id
    }

    /// Move `id` to position `index` among its current parent's children.
    /// `index` is interpreted against the child list with `id` already
    /// removed, so `index == len - 1` moves it last.
    ///
    /// # Errors
    ///
    /// Fails if the node is missing, is the root, or `index` is out of range.
    /// On error the tree is unchanged.
    pub fn move_to(&mut self, id: NodeId, index: usize) -> Result<(), DocError> {
        if id == self.root {
            return Err(DocError::RootImmutable);
        }
        let parent = self.parent(id).ok_or(DocError::NotFound(id))?;
        let node = self.nodes.get_mut(&parent).ok_or(DocError::NotFound(parent))?;
        let from = node
            .children
            .iter()
            .position(|c| *c == id)
            .ok_or(DocError::NotAChild { node: id, parent })?;
        let len = node.children.len();
        if index >= len {
            return Err(DocError::IndexOutOfRange { index, len });
        }
        let moved = node.children.remove(from);
        node.children.insert(index, moved);
        Ok(())
    }

    /// Remove `id` and its whole subtree. Returns the removed subtree as a
    /// definition.
    ///
    /// # Errors
    ///
    /// Fails if the node is missing or is the root.
    pub fn remove(&mut self, id: NodeId) -> Result<ComponentDef, DocError> {
        if id == self.root {
            return Err(DocError::RootImmutable);
        }
        let def = self.to_def(id).ok_or(DocError::NotFound(id))?;
        if let Some(parent) = self.parent(id) {
            if let Some(p) = self.nodes.get_mut(&parent) {
                p.children.retain(|c| *c != id);
            }
        }
        self.drop_subtree(id);
        Ok(def)
    }

    fn drop_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(&id) {
            for child in node.children {
                self.drop_subtree(child);
            }
        }
    }

    /// Remove every child of the body.
    pub fn clear(&mut self) {
        let children: Vec<NodeId> = self.children(self.root).to_vec();
        for child in children {
            self.drop_subtree(child);
        }
        if let Some(root) = self.nodes.get_mut(&self.root) {
            root.children.clear();
        }
    }

    /// Apply a content/attribute edit. The patch is checked in full before
    /// anything is written.
    ///
    /// # Errors
    ///
    /// Fails if the node is missing, if `content` targets a kind that holds
    /// components instead of text, or if an attribute name could not be
    /// exported.
    pub fn apply_patch(&mut self, id: NodeId, patch: &NodePatch) -> Result<(), DocError> {
        let node = self.nodes.get_mut(&id).ok_or(DocError::NotFound(id))?;
        if patch.content.is_some() && node.tag.kind().is_some_and(|k| !k.has_content()) {
            return Err(DocError::ContentNotAllowed { node: id, tag: node.tag.to_string() });
        }
        if let Some(name) = patch.attributes.keys().find(|name| !is_valid_name(name)) {
            return Err(DocError::InvalidAttributeName(name.clone()));
        }

        if let Some(ref content) = patch.content {
            node.content = Some(content.clone());
        }
        for (name, value) in &patch.attributes {
            match value {
                Some(v) => {
                    node.attributes.insert(name.clone(), v.clone());
                }
                None => {
                    node.attributes.remove(name);
                }
            }
        }
        Ok(())
    }

    /// Snapshot the subtree rooted at `id` as a definition.
    #[must_use]
    pub fn to_def(&self, id: NodeId) -> Option<ComponentDef> {
        let node = self.nodes.get(&id)?;
        Some(ComponentDef {
            tag: node.tag.clone(),
            content: node.content.clone(),
            attributes: node.attributes.clone(),
            components: node.children.iter().filter_map(|c| self.to_def(*c)).collect(),
        })
    }

    /// Id-carrying view of the subtree rooted at `id`.
    #[must_use]
    pub fn view(&self, id: NodeId) -> Option<NodeView> {
        let node = self.nodes.get(&id)?;
        Some(NodeView {
            id,
            tag: node.tag.clone(),
            content: node.content.clone(),
            attributes: node.attributes.clone(),
            components: node.children.iter().filter_map(|c| self.view(*c)).collect(),
        })
    }

    /// Snapshot of the whole document, rooted at the body.
    #[must_use]
    pub fn snapshot(&self) -> ComponentDef {
        self.to_def(self.root).unwrap_or_else(|| ComponentDef::new(ComponentKind::Body))
    }

    /// Ids of every node in document order (pre-order, root first).
    #[must_use]
    pub fn walk(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        out
    }
}
