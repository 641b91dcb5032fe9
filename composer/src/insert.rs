//! Constrained insertion: target resolution, synthesis, and repositioning.
//!
//! An insertion always starts from the current selection. If the selected node
//! can hold children it is the target; otherwise the insertion is redirected to
//! its parent and, once the new subtree has been appended there, the new node
//! is moved to sit immediately after the original selection.
//!
//! ERROR HANDLING
//! ==============
//! `NoValidInsertion` is user-facing and aborts before any mutation.
//! Repositioning is a cosmetic correction: if it fails the node keeps its
//! appended position and the failure is only logged.

#[cfg(test)]
#[path = "insert_test.rs"]
mod insert_test;

use serde::Serialize;
use tracing::debug;

use crate::doc::{ComponentTree, DocError, NodeId};
use crate::kind::ComponentKind;
use crate::synth::instantiate_kind;

/// Errors surfaced by the insertion flow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InsertError {
    /// Neither the selection nor its parent accepts children.
    #[error("No valid insertions here.")]
    NoValidInsertion { node: NodeId },
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
    /// The requested kind is not among the target's candidates.
    #[error("{kind} cannot be inserted into {target}")]
    KindNotOffered { kind: ComponentKind, target: String },
    #[error("no insert menu is open")]
    NoMenuOpen,
}

/// Why a redirected node could not be moved next to the original selection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelocationFailure {
    #[error("original node {0} is no longer under the insertion target")]
    OriginalMissing(NodeId),
    #[error(transparent)]
    Doc(#[from] DocError),
}

/// Where an insertion lands and what may be inserted there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertionTarget {
    /// Node that will receive the new child.
    pub target: NodeId,
    /// The node that was selected when the menu was opened.
    pub selected: NodeId,
    /// Kinds the target accepts, in schema order.
    pub candidates: &'static [ComponentKind],
    /// True when the selection could not hold children and `target` is its parent.
    pub redirected: bool,
}

/// Resolve the insertion target for `selected` against the current tree.
///
/// # Errors
///
/// Returns [`InsertError::NodeNotFound`] if `selected` is not in the tree and
/// [`InsertError::NoValidInsertion`] if neither it nor its parent is a
/// container.
pub fn resolve_insertion_target(tree: &ComponentTree, selected: NodeId) -> Result<InsertionTarget, InsertError> {
    let tag = tree.tag(selected).ok_or(InsertError::NodeNotFound(selected))?;

    let own = tag.child_kinds();
    if !own.is_empty() {
        return Ok(InsertionTarget { target: selected, selected, candidates: own, redirected: false });
    }

    if let Some(parent) = tree.parent(selected) {
        let candidates = tree.tag(parent).map_or(&[][..], |t| t.child_kinds());
        if !candidates.is_empty() {
            return Ok(InsertionTarget { target: parent, selected, candidates, redirected: true });
        }
    }

    Err(InsertError::NoValidInsertion { node: selected })
}

/// Synthesize `kind` under `target.target` and, for redirected insertions,
/// place it right after the original selection. Returns the new node's id.
///
/// # Errors
///
/// Returns [`InsertError::KindNotOffered`] if `kind` is not a candidate and
/// [`InsertError::NodeNotFound`] if the target has disappeared. The tree is
/// untouched in both cases.
pub fn insert_component(
    tree: &mut ComponentTree,
    target: &InsertionTarget,
    kind: ComponentKind,
) -> Result<NodeId, InsertError> {
    if !target.candidates.contains(&kind) {
        let target_tag = tree.tag(target.target).map(ToString::to_string).unwrap_or_default();
        return Err(InsertError::KindNotOffered { kind, target: target_tag });
    }

    let def = instantiate_kind(kind);
    let created = tree
        .append(target.target, &def)
        .map_err(|_| InsertError::NodeNotFound(target.target))?;
    debug!(%created, %kind, target = %target.target, "component appended");

    if target.redirected {
        if let Err(e) = relocate_after(tree, target.target, target.selected, created) {
            debug!(error = %e, %created, "relocation skipped; node left at end");
        }
    }

    Ok(created)
}

/// Move `created` to immediately follow `original` under `parent`.
///
/// # Errors
///
/// Fails if `original` is no longer a child of `parent` or the move is out of
/// range. The tree is unchanged on failure.
pub fn relocate_after(
    tree: &mut ComponentTree,
    parent: NodeId,
    original: NodeId,
    created: NodeId,
) -> Result<(), RelocationFailure> {
    let index = tree
        .index_of(parent, original)
        .ok_or(RelocationFailure::OriginalMissing(original))?;
    if tree.parent(created) != Some(parent) {
        return Err(DocError::NotAChild { node: created, parent }.into());
    }
    tree.move_to(created, index + 1)?;
    Ok(())
}
