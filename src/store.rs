//! Key-value project storage.
//!
//! DESIGN
//! ======
//! A project is persisted as the JSON snapshot of its body definition under
//! the key `mjml-editor-project-<id>`. `ProjectStore` is the async seam the
//! service layer talks to; `FileStore` writes one file per key, `MemoryStore`
//! keeps everything in process for tests and throwaway sessions.
//!
//! ERROR HANDLING
//! ==============
//! A missing key is not an error: `load` returns `Ok(None)` and the caller
//! falls back to the starter document. File writes go to a temp file first
//! and are renamed into place, so a crashed write never leaves a torn snapshot.
//! Each write gets its own temp name, so concurrent saves of one key never
//! share a partially written file; the last rename wins.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use composer::ComponentDef;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Prefix of every storage key.
pub const STORAGE_KEY_PREFIX: &str = "mjml-editor-project-";

/// Storage key for a project id.
#[must_use]
pub fn storage_key(project_id: &str) -> String {
    format!("{STORAGE_KEY_PREFIX}{project_id}")
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored project is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Async key-value storage for project snapshots.
#[async_trait::async_trait]
pub trait ProjectStore: Send + Sync {
    /// Load the snapshot stored under `key`, if any.
    async fn load(&self, key: &str) -> Result<Option<ComponentDef>, StoreError>;

    /// Store `def` under `key`, replacing any previous value.
    async fn save(&self, key: &str, def: &ComponentDef) -> Result<(), StoreError>;
}

// =============================================================================
// FILE STORE
// =============================================================================

/// One `<key>.json` file per project under a data directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait::async_trait]
impl ProjectStore for FileStore {
    async fn load(&self, key: &str) -> Result<Option<ComponentDef>, StoreError> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn save(&self, key: &str, def: &ComponentDef) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.{}.json.tmp", Uuid::new_v4().simple()));
        let bytes = serde_json::to_vec_pretty(def)?;
        let written = match tokio::fs::write(&tmp, &bytes).await {
            Ok(()) => tokio::fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                debug!(error = %cleanup, tmp = %tmp.display(), "temp snapshot not removed");
            }
            return Err(e.into());
        }
        debug!(key, bytes = bytes.len(), path = %path.display(), "project snapshot written");
        Ok(())
    }
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// In-process store. Values are kept as JSON text so a load goes through the
/// same decoding as the file store.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProjectStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<ComponentDef>, StoreError> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, key: &str, def: &ComponentDef) -> Result<(), StoreError> {
        let json = serde_json::to_string(def)?;
        self.entries.write().await.insert(key.to_owned(), json);
        Ok(())
    }
}
