//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the project store and a map of live projects. Each project has
//! its own editor (tree, selection, open menu) and a revision counter that
//! the persistence task compares against the last saved revision. Writes of
//! one project to the store take its save gate, so they land in the order
//! their snapshots were taken.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::collections::HashMap;
use std::sync::Arc;

use composer::{Action, EditorCore};
use tokio::sync::{Mutex, RwLock};

use crate::config::StudioConfig;
use crate::store::ProjectStore;

// =============================================================================
// PROJECT STATE
// =============================================================================

/// Per-project live state. Kept in memory between requests and flushed to
/// the store by the persistence task.
pub struct ProjectState {
    pub editor: EditorCore,
    /// Bumped once per document mutation.
    pub revision: u64,
    /// Revision last written to the store.
    pub saved_revision: u64,
    /// Held from snapshot to acknowledgement by every store write or reload
    /// of this project.
    pub save_gate: Arc<Mutex<()>>,
}

impl ProjectState {
    #[must_use]
    pub fn new(editor: EditorCore) -> Self {
        Self { editor, revision: 0, saved_revision: 0, save_gate: Arc::new(Mutex::new(())) }
    }

    /// Count the mutations among `actions` toward the next autosave.
    pub fn record(&mut self, actions: &[Action]) {
        let mutations = actions.iter().filter(|a| a.is_mutation()).count() as u64;
        self.revision += mutations;
    }

    /// Mutations since the last successful save.
    #[must_use]
    pub fn pending_steps(&self) -> u64 {
        self.revision.saturating_sub(self.saved_revision)
    }

    #[must_use]
    pub fn dirty(&self) -> bool {
        self.pending_steps() > 0
    }

    /// Acknowledge a write of `revision`. Later edits stay pending.
    pub fn mark_saved(&mut self, revision: u64) {
        self.saved_revision = self.saved_revision.max(revision);
    }
}

impl Default for ProjectState {
    fn default() -> Self {
        Self::new(EditorCore::starter())
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub projects: Arc<RwLock<HashMap<String, ProjectState>>>,
    pub store: Arc<dyn ProjectStore>,
    pub config: Arc<StudioConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn ProjectStore>, config: StudioConfig) -> Self {
        Self { projects: Arc::new(RwLock::new(HashMap::new())), store, config: Arc::new(config) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
