//! Project service: hydration, editing, import/export, explicit save/reload.
//!
//! DESIGN
//! ======
//! Projects are hydrated lazily on first access: from the store when a
//! snapshot exists under the project's key, otherwise from the starter
//! document. Every editing call runs the editor under the projects write lock
//! and counts the document mutations it reports toward the next autosave.
//!
//! ERROR HANDLING
//! ==============
//! "No valid insertions here." is not an error. It comes back as a `notice`
//! action so the caller can show and dismiss it. Everything else maps to
//! `ProjectError`, which the routes translate to a status code.

#[cfg(test)]
#[path = "project_test.rs"]
mod project_test;

use composer::engine::ToolbarItem;
use composer::export::to_mjml_pretty;
use composer::kind::UnknownKind;
use composer::validate::{Violation, validate};
use composer::{Action, ComponentKind, ComponentTree, EditorCore, EditorError, Menu, NodeId, NodePatch, NodeView};
use serde::Serialize;
use tracing::{info, warn};

use crate::services::persistence::write_project;
use crate::state::{AppState, ProjectState};
use crate::store::{StoreError, storage_key};

/// Longest accepted project id.
pub const MAX_PROJECT_ID_LEN: usize = 64;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("invalid project id: {0:?}")]
    InvalidProjectId(String),
    #[error("project not found: {0}")]
    NotFound(String),
    #[error("no stored snapshot for project {0}")]
    NotStored(String),
    #[error(transparent)]
    UnknownKind(#[from] UnknownKind),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Client-facing view of one project.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSnapshot {
    pub id: String,
    pub revision: u64,
    pub saved_revision: u64,
    pub selection: Option<NodeId>,
    pub menu: Option<Menu>,
    pub tree: Option<NodeView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectOutcome {
    pub actions: Vec<Action>,
    pub toolbar: Vec<ToolbarItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsertOutcome {
    pub id: NodeId,
    pub actions: Vec<Action>,
}

// =============================================================================
// HYDRATION
// =============================================================================

/// Accept ids made of ASCII letters, digits, `-` and `_`.
///
/// # Errors
///
/// Returns [`ProjectError::InvalidProjectId`] for empty, overlong, or
/// otherwise malformed ids.
pub fn validate_project_id(id: &str) -> Result<(), ProjectError> {
    let well_formed = !id.is_empty()
        && id.len() <= MAX_PROJECT_ID_LEN
        && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if well_formed { Ok(()) } else { Err(ProjectError::InvalidProjectId(id.to_owned())) }
}

/// Make sure `id` is live in memory, hydrating it if needed.
///
/// # Errors
///
/// Fails for malformed ids and when the store cannot be read.
pub async fn ensure_loaded(state: &AppState, id: &str) -> Result<(), ProjectError> {
    validate_project_id(id)?;
    if state.projects.read().await.contains_key(id) {
        return Ok(());
    }

    // Read outside the lock; a concurrent hydration of the same id wins.
    let stored = state.store.load(&storage_key(id)).await?;
    let editor = match stored {
        Some(def) => {
            info!(project = id, "project hydrated from store");
            EditorCore::with_tree(ComponentTree::from_def(&def))
        }
        None => {
            info!(project = id, "project started from starter document");
            EditorCore::starter()
        }
    };

    let mut projects = state.projects.write().await;
    projects.entry(id.to_owned()).or_insert_with(|| ProjectState::new(editor));
    Ok(())
}

async fn with_project<T>(
    state: &AppState,
    id: &str,
    f: impl FnOnce(&mut ProjectState) -> Result<T, ProjectError>,
) -> Result<T, ProjectError> {
    ensure_loaded(state, id).await?;
    let mut projects = state.projects.write().await;
    let project = projects.get_mut(id).ok_or_else(|| ProjectError::NotFound(id.to_owned()))?;
    f(project)
}

/// Run an editing step and count its mutations toward autosave.
async fn mutate(
    state: &AppState,
    id: &str,
    f: impl FnOnce(&mut EditorCore) -> Result<Vec<Action>, ProjectError>,
) -> Result<Vec<Action>, ProjectError> {
    with_project(state, id, |project| {
        let actions = f(&mut project.editor)?;
        project.record(&actions);
        Ok(actions)
    })
    .await
}

// =============================================================================
// QUERIES
// =============================================================================

/// # Errors
///
/// Fails for malformed ids and unreadable stores.
pub async fn snapshot(state: &AppState, id: &str) -> Result<ProjectSnapshot, ProjectError> {
    with_project(state, id, |project| {
        let editor = &project.editor;
        Ok(ProjectSnapshot {
            id: id.to_owned(),
            revision: project.revision,
            saved_revision: project.saved_revision,
            selection: editor.selection(),
            menu: editor.menu().cloned(),
            tree: editor.tree().view(editor.tree().root()),
        })
    })
    .await
}

/// Current document as MJML markup, compact or indented.
///
/// # Errors
///
/// Fails for malformed ids and unreadable stores.
pub async fn export(state: &AppState, id: &str, pretty: bool) -> Result<String, ProjectError> {
    with_project(state, id, |project| {
        Ok(if pretty { to_mjml_pretty(project.editor.tree()) } else { project.editor.export() })
    })
    .await
}

/// Containment violations in the current document.
///
/// # Errors
///
/// Fails for malformed ids and unreadable stores.
pub async fn violations(state: &AppState, id: &str) -> Result<Vec<Violation>, ProjectError> {
    with_project(state, id, |project| Ok(validate(project.editor.tree()))).await
}

// =============================================================================
// EDITING
// =============================================================================

/// Select a node (or clear the selection) and return its toolbar.
///
/// # Errors
///
/// Fails if `node` is not in the document.
pub async fn select(state: &AppState, id: &str, node: Option<NodeId>) -> Result<SelectOutcome, ProjectError> {
    with_project(state, id, |project| {
        let action = project.editor.select(node)?;
        let toolbar = node.map(|n| project.editor.toolbar(n)).unwrap_or_default();
        Ok(SelectOutcome { actions: vec![action], toolbar })
    })
    .await
}

/// Run a registered editor command by name.
///
/// # Errors
///
/// Fails for unregistered command names.
pub async fn run_command(state: &AppState, id: &str, name: &str) -> Result<Vec<Action>, ProjectError> {
    mutate(state, id, |editor| Ok(editor.run_command(name)?)).await
}

/// Activate the open menu's item for `kind`.
///
/// # Errors
///
/// Fails for unknown kinds, with no menu open, or for kinds the menu does
/// not offer.
pub async fn insert(state: &AppState, id: &str, kind: &str) -> Result<InsertOutcome, ProjectError> {
    let kind: ComponentKind = kind.parse()?;
    let actions = mutate(state, id, |editor| Ok(editor.activate(kind)?)).await?;
    let created = actions.iter().find_map(|a| match a {
        Action::NodeCreated { id, .. } => Some(*id),
        _ => None,
    });
    match created {
        Some(created) => Ok(InsertOutcome { id: created, actions }),
        None => Err(ProjectError::NotFound(id.to_owned())),
    }
}

/// # Errors
///
/// Fails for malformed ids and unreadable stores.
pub async fn close_menu(state: &AppState, id: &str) -> Result<Vec<Action>, ProjectError> {
    mutate(state, id, |editor| Ok(editor.close_menu())).await
}

/// # Errors
///
/// Fails if `node` is not in the document.
pub async fn update_node(
    state: &AppState,
    id: &str,
    node: NodeId,
    patch: &NodePatch,
) -> Result<Vec<Action>, ProjectError> {
    mutate(state, id, |editor| Ok(vec![editor.update_node(node, patch)?])).await
}

/// # Errors
///
/// Fails for missing nodes and for the body.
pub async fn delete_node(state: &AppState, id: &str, node: NodeId) -> Result<Vec<Action>, ProjectError> {
    mutate(state, id, |editor| Ok(editor.delete_node(node)?)).await
}

/// # Errors
///
/// Fails for malformed ids and unreadable stores.
pub async fn clear(state: &AppState, id: &str) -> Result<Vec<Action>, ProjectError> {
    mutate(state, id, |editor| Ok(editor.clear())).await
}

/// Replace the document with parsed MJML markup.
///
/// # Errors
///
/// Fails for malformed markup; the previous document is kept.
pub async fn import(state: &AppState, id: &str, markup: &str) -> Result<Vec<Action>, ProjectError> {
    mutate(state, id, |editor| Ok(editor.import(markup)?)).await
}

// =============================================================================
// EXPLICIT SAVE / RELOAD
// =============================================================================

/// Write the project to the store now, regardless of autosave progress.
/// Waits for any write of the same project already in flight. Returns the
/// revision written.
///
/// # Errors
///
/// Fails when the store write fails; the project stays dirty.
pub async fn store_now(state: &AppState, id: &str) -> Result<u64, ProjectError> {
    ensure_loaded(state, id).await?;
    match write_project(state, id, 0).await {
        Ok(Some(revision)) => {
            info!(project = id, revision, "project stored");
            Ok(revision)
        }
        Ok(None) => Err(ProjectError::NotFound(id.to_owned())),
        Err(e) => {
            warn!(error = %e, project = id, "explicit store failed");
            Err(e.into())
        }
    }
}

/// Replace the live document with the stored snapshot. Waits for any write
/// of the same project already in flight, so the newest snapshot is read.
///
/// # Errors
///
/// Returns [`ProjectError::NotStored`] when the store has nothing under the
/// project's key.
pub async fn reload(state: &AppState, id: &str) -> Result<Vec<Action>, ProjectError> {
    let gate = with_project(state, id, |project| Ok(project.save_gate.clone())).await?;
    let _writing = gate.lock().await;

    let def = state.store.load(&storage_key(id)).await?.ok_or_else(|| ProjectError::NotStored(id.to_owned()))?;
    with_project(state, id, |project| {
        let actions = project.editor.replace(ComponentTree::from_def(&def));
        project.record(&actions);
        // The live document now matches the store.
        project.mark_saved(project.revision);
        Ok(actions)
    })
    .await
}
