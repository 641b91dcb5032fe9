//! Containment validation over a whole document.

#[cfg(test)]
#[path = "validate_test.rs"]
mod validate_test;

use serde::Serialize;

use crate::doc::{ComponentTree, NodeId};
use crate::kind::Tag;

/// A child whose tag is not permitted under its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub parent: NodeId,
    pub parent_tag: Tag,
    pub child: NodeId,
    pub child_tag: Tag,
}

/// Every containment violation in document order. Empty for a valid tree.
#[must_use]
pub fn validate(tree: &ComponentTree) -> Vec<Violation> {
    let mut out = Vec::new();
    for id in tree.walk() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        for child in &node.children {
            let Some(child_tag) = tree.tag(*child) else {
                continue;
            };
            if !node.tag.accepts(child_tag) {
                out.push(Violation {
                    parent: id,
                    parent_tag: node.tag.clone(),
                    child: *child,
                    child_tag: child_tag.clone(),
                });
            }
        }
    }
    out
}

/// Whether the document satisfies the containment schema everywhere.
#[must_use]
pub fn is_valid(tree: &ComponentTree) -> bool {
    validate(tree).is_empty()
}
