use serde::Serialize;
use tracing::{debug, info};

use crate::doc::{ComponentDef, ComponentTree, DocError, NodeId, NodePatch};
use crate::export::to_mjml;
use crate::insert::{InsertError, insert_component, resolve_insertion_target};
use crate::kind::{ComponentKind, Tag};
use crate::menu::{Menu, build_menu};
use crate::parse::{ParseError, parse};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Command that opens the insert menu for the current selection.
pub const OPEN_INSERT_COMMAND: &str = "mjml:open-insert";
/// Command that removes every component from the canvas.
pub const CANVAS_CLEAR_COMMAND: &str = "core:canvas-clear";

/// Notice shown when neither the selection nor its parent accepts children.
pub const NO_VALID_INSERTION_NOTICE: &str = "No valid insertions here.";

/// The starter document loaded into a fresh project.
pub const STARTER_DOCUMENT: &str =
    "<mjml><mj-body><mj-section><mj-column><mj-text>Start here</mj-text></mj-column></mj-section></mj-body></mjml>";

/// Errors returned by editor operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Insert(#[from] InsertError),
    #[error(transparent)]
    Doc(#[from] DocError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

/// Commands that can be bound to toolbar affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    OpenInsert,
    CanvasClear,
}

impl Command {
    /// Look up a command by its registered name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            OPEN_INSERT_COMMAND => Some(Self::OpenInsert),
            CANVAS_CLEAR_COMMAND => Some(Self::CanvasClear),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::OpenInsert => OPEN_INSERT_COMMAND,
            Self::CanvasClear => CANVAS_CLEAR_COMMAND,
        }
    }
}

/// A toolbar button shown on the selected component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolbarItem {
    pub label: &'static str,
    pub title: &'static str,
    pub command: &'static str,
}

/// The insert affordance attached to every selected component.
pub const INSERT_TOOLBAR_ITEM: ToolbarItem = ToolbarItem { label: "+", title: "Insert (+)", command: OPEN_INSERT_COMMAND };

/// Effects returned from editor operations for the host to process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    NodeCreated { id: NodeId, parent: NodeId },
    NodeUpdated { id: NodeId },
    NodeDeleted { id: NodeId },
    SelectionChanged { id: Option<NodeId> },
    MenuOpened { menu: Menu },
    MenuClosed,
    /// Dismissable user-facing message. Never mutates the document.
    Notice { message: String },
    DocumentReplaced,
}

impl Action {
    /// Whether this action changed the document (and so counts toward autosave).
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::NodeCreated { .. } | Self::NodeUpdated { .. } | Self::NodeDeleted { .. } | Self::DocumentReplaced
        )
    }
}

/// Editor state for one open document: the tree, the selection, and the
/// insert menu currently on screen.
///
/// The editor holds the only mutable handle to its tree. All operations are
/// synchronous and complete before returning.
#[derive(Debug, Clone, Default)]
pub struct EditorCore {
    tree: ComponentTree,
    selected: Option<NodeId>,
    menu: Option<Menu>,
}

impl EditorCore {
    /// An editor over an empty body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An editor over an existing tree.
    #[must_use]
    pub fn with_tree(tree: ComponentTree) -> Self {
        Self { tree, selected: None, menu: None }
    }

    /// An editor over the starter document.
    #[must_use]
    pub fn starter() -> Self {
        parse(STARTER_DOCUMENT).map_or_else(|_| Self::new(), Self::with_tree)
    }

    // --- Queries ---

    #[must_use]
    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    /// The currently selected node, if any.
    #[must_use]
    pub fn selection(&self) -> Option<NodeId> {
        self.selected
    }

    /// The insert menu currently open, if any.
    #[must_use]
    pub fn menu(&self) -> Option<&Menu> {
        self.menu.as_ref()
    }

    #[must_use]
    pub fn snapshot(&self) -> ComponentDef {
        self.tree.snapshot()
    }

    #[must_use]
    pub fn export(&self) -> String {
        to_mjml(&self.tree)
    }

    /// Toolbar for `id`: the insert affordance, once.
    #[must_use]
    pub fn toolbar(&self, id: NodeId) -> Vec<ToolbarItem> {
        if self.tree.contains(id) { vec![INSERT_TOOLBAR_ITEM] } else { Vec::new() }
    }

    // --- Selection ---

    /// Select a node, or clear the selection with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::NotFound`] if `id` is not in the tree.
    pub fn select(&mut self, id: Option<NodeId>) -> Result<Action, EditorError> {
        if let Some(id) = id {
            if !self.tree.contains(id) {
                return Err(DocError::NotFound(id).into());
            }
        }
        self.selected = id;
        Ok(Action::SelectionChanged { id })
    }

    // --- Commands ---

    /// Run a registered command by name.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnknownCommand`] for unregistered names.
    pub fn run_command(&mut self, name: &str) -> Result<Vec<Action>, EditorError> {
        let command = Command::from_name(name).ok_or_else(|| EditorError::UnknownCommand(name.to_owned()))?;
        debug!(command = command.name(), "running command");
        Ok(match command {
            Command::OpenInsert => self.open_insert_menu(),
            Command::CanvasClear => self.clear(),
        })
    }

    /// Open the insert menu for the current selection.
    ///
    /// With nothing selected this does nothing. When no insertion is possible
    /// the result is a notice and the document is untouched.
    pub fn open_insert_menu(&mut self) -> Vec<Action> {
        let Some(selected) = self.selected else {
            return Vec::new();
        };
        match resolve_insertion_target(&self.tree, selected) {
            Ok(target) => {
                let menu = build_menu(&self.tree, target);
                self.menu = Some(menu.clone());
                vec![Action::MenuOpened { menu }]
            }
            Err(InsertError::NoValidInsertion { .. }) => {
                self.menu = None;
                vec![Action::Notice { message: NO_VALID_INSERTION_NOTICE.to_owned() }]
            }
            Err(e) => {
                debug!(error = %e, "insert menu not opened");
                self.menu = None;
                Vec::new()
            }
        }
    }

    /// Dismiss the insert menu.
    pub fn close_menu(&mut self) -> Vec<Action> {
        if self.menu.take().is_some() { vec![Action::MenuClosed] } else { Vec::new() }
    }

    /// Activate a menu item: synthesize `kind`, place it, close the menu, and
    /// select the new node.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::NoMenuOpen`] without an open menu and
    /// [`InsertError::KindNotOffered`] for kinds the menu does not list. The
    /// menu stays open on error.
    pub fn activate(&mut self, kind: ComponentKind) -> Result<Vec<Action>, EditorError> {
        let menu = self.menu.as_ref().ok_or(InsertError::NoMenuOpen)?;
        let parent = menu.target.target;
        let created = insert_component(&mut self.tree, &menu.target, kind)?;
        info!(%created, %kind, %parent, "component inserted");

        self.menu = None;
        self.selected = Some(created);
        Ok(vec![
            Action::NodeCreated { id: created, parent },
            Action::MenuClosed,
            Action::SelectionChanged { id: Some(created) },
        ])
    }

    // --- Direct edits ---

    /// Apply a content/attribute edit.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::NotFound`] if `id` is not in the tree, and rejects
    /// content on container kinds and unexportable attribute names.
    pub fn update_node(&mut self, id: NodeId, patch: &NodePatch) -> Result<Action, EditorError> {
        self.tree.apply_patch(id, patch)?;
        Ok(Action::NodeUpdated { id })
    }

    /// Delete a node and its subtree. Clears the selection and closes the
    /// menu if they pointed into the removed subtree.
    ///
    /// # Errors
    ///
    /// Fails for missing nodes and for the root.
    pub fn delete_node(&mut self, id: NodeId) -> Result<Vec<Action>, EditorError> {
        self.tree.remove(id)?;
        let mut actions = vec![Action::NodeDeleted { id }];

        if self.selected.is_some_and(|s| !self.tree.contains(s)) {
            self.selected = None;
            actions.push(Action::SelectionChanged { id: None });
        }
        let menu_stale = self
            .menu
            .as_ref()
            .is_some_and(|m| !self.tree.contains(m.target.target) || !self.tree.contains(m.target.selected));
        if menu_stale {
            actions.extend(self.close_menu());
        }
        Ok(actions)
    }

    /// Remove every component from the body.
    pub fn clear(&mut self) -> Vec<Action> {
        self.tree.clear();
        let mut actions = vec![Action::DocumentReplaced];
        actions.extend(self.close_menu());
        if self.selected.take().is_some() {
            actions.push(Action::SelectionChanged { id: None });
        }
        actions
    }

    /// Replace the document with `tree`, dropping selection and menu.
    pub fn replace(&mut self, tree: ComponentTree) -> Vec<Action> {
        self.tree = tree;
        self.selected = None;
        self.menu = None;
        vec![Action::DocumentReplaced]
    }

    /// Replace the document from MJML markup.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] for malformed markup; the current document is
    /// kept.
    pub fn import(&mut self, markup: &str) -> Result<Vec<Action>, EditorError> {
        let tree = parse(markup)?;
        Ok(self.replace(tree))
    }

    /// Tag of a node, for display.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&Tag> {
        self.tree.tag(id)
    }
}
