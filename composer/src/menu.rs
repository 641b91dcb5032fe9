//! Insertion menu: the titled list of kinds offered for a resolved target.
//!
//! A menu is rebuilt from the live tree every time it is opened; nothing here
//! is cached between invocations.

#[cfg(test)]
#[path = "menu_test.rs"]
mod menu_test;

use serde::Serialize;

use crate::doc::{ComponentTree, NodeId};
use crate::insert::{InsertError, InsertionTarget, resolve_insertion_target};
use crate::kind::ComponentKind;

/// One selectable entry in the insert menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub display_name: &'static str,
    pub description: &'static str,
    pub kind: ComponentKind,
}

impl From<ComponentKind> for MenuItem {
    fn from(kind: ComponentKind) -> Self {
        Self { display_name: kind.display_name(), description: kind.description(), kind }
    }
}

/// A populated insert menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Menu {
    /// Heading naming the node that will receive the insertion.
    pub title: String,
    #[serde(flatten)]
    pub target: InsertionTarget,
    pub items: Vec<MenuItem>,
}

impl Menu {
    /// Whether `kind` is one of the offered items.
    #[must_use]
    pub fn offers(&self, kind: ComponentKind) -> bool {
        self.items.iter().any(|i| i.kind == kind)
    }
}

/// Render the menu for an already resolved target.
#[must_use]
pub fn build_menu(tree: &ComponentTree, target: InsertionTarget) -> Menu {
    let target_tag = tree.tag(target.target).map(ToString::to_string).unwrap_or_default();
    Menu {
        title: format!("Insert into {target_tag}"),
        items: target.candidates.iter().copied().map(MenuItem::from).collect(),
        target,
    }
}

/// Resolve the target for `selected` and render its menu.
///
/// # Errors
///
/// Propagates [`InsertError::NoValidInsertion`] and
/// [`InsertError::NodeNotFound`] from target resolution.
pub fn open_menu(tree: &ComponentTree, selected: NodeId) -> Result<Menu, InsertError> {
    let target = resolve_insertion_target(tree, selected)?;
    Ok(build_menu(tree, target))
}
