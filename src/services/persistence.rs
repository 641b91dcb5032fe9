//! Persistence service: background autosave for edited projects.
//!
//! DESIGN
//! ======
//! A background task wakes every `flush_interval_ms`, snapshots each project
//! that has accumulated at least `autosave_steps` mutations, and writes the
//! snapshots to the store after releasing the projects lock. Shutdown runs a
//! forced flush that writes every dirty project regardless of step count.
//!
//! Every write of a project holds that project's save gate from snapshot to
//! acknowledgement. Autosave, explicit store and reload share the gate, so an
//! older snapshot can never land on top of a newer one.
//!
//! ERROR HANDLING
//! ==============
//! Dirty state is cleared only after successful writes, and only up to the
//! revision that was written. Edits that land while a write is in flight stay
//! pending for the next cycle. A failed write is logged and retried on the
//! next tick.

#[cfg(test)]
#[path = "persistence_test.rs"]
mod persistence_test;

use std::time::Duration;

use composer::ComponentDef;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::state::AppState;
use crate::store::{StoreError, storage_key};

/// Spawn the background autosave task. Returns a handle for shutdown.
pub fn spawn_persistence_task(state: AppState) -> JoinHandle<()> {
    let flush_interval_ms = state.config.flush_interval_ms.max(1);
    info!(flush_interval_ms, autosave_steps = state.config.autosave_steps, "project autosave configured");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(flush_interval_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            flush_projects(&state, false).await;
        }
    })
}

#[derive(Debug)]
struct ProjectFlush {
    def: ComponentDef,
    revision: u64,
}

/// Write one project if it has at least `min_steps` pending mutations.
/// Returns the revision written, or `None` when nothing was due or the
/// project is not live.
///
/// # Errors
///
/// Propagates the store failure; the project keeps its pending steps.
pub(crate) async fn write_project(state: &AppState, id: &str, min_steps: u64) -> Result<Option<u64>, StoreError> {
    let Some(gate) = state.projects.read().await.get(id).map(|p| p.save_gate.clone()) else {
        return Ok(None);
    };
    let _writing = gate.lock().await;

    // PHASE: SNAPSHOT
    // WHY: clone under lock, then perform I/O lock-free.
    let flush = {
        let projects = state.projects.read().await;
        match projects.get(id) {
            Some(p) if p.pending_steps() >= min_steps => {
                ProjectFlush { def: p.editor.snapshot(), revision: p.revision }
            }
            _ => return Ok(None),
        }
    };

    // PHASE: WRITE + ACK
    state.store.save(&storage_key(id), &flush.def).await?;
    let mut projects = state.projects.write().await;
    if let Some(project) = projects.get_mut(id) {
        project.mark_saved(flush.revision);
    }
    Ok(Some(flush.revision))
}

/// Write projects to the store. With `force`, every dirty project is written;
/// otherwise only those with at least `autosave_steps` pending mutations.
/// Returns the number of projects written.
pub async fn flush_projects(state: &AppState, force: bool) -> usize {
    let min_steps = if force { 1 } else { state.config.autosave_steps.max(1) as u64 };

    let due = {
        let projects = state.projects.read().await;
        projects.iter().filter(|(_, p)| p.pending_steps() >= min_steps).map(|(id, _)| id.clone()).collect::<Vec<_>>()
    };

    // A failed write keeps its pending steps for the next tick.
    let mut written = 0;
    for id in due {
        match write_project(state, &id, min_steps).await {
            Ok(Some(revision)) => {
                written += 1;
                debug!(project = %id, revision, "project autosaved");
            }
            Ok(None) => {}
            Err(e) => {
                error!(error = %e, project = %id, "project autosave failed");
            }
        }
    }
    written
}
