//! Progress store implementations
//!
//! One snapshot per user, full overwrite on save, last write wins. The file
//! store writes through a temp file and renames into place so a crash never
//! leaves a half-written snapshot behind.

use crate::error::StoreError;
use crate::snapshot::SessionSnapshot;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Persists and restores session snapshots by user id
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Load the stored snapshot, if any
    async fn load(&self, user_id: &str) -> Result<Option<SessionSnapshot>, StoreError>;

    /// Overwrite the stored snapshot
    async fn save(&self, user_id: &str, snapshot: &SessionSnapshot) -> Result<(), StoreError>;
}

/// Reject user ids that could escape the store directory
fn check_user_id(user_id: &str) -> Result<(), StoreError> {
    let safe = !user_id.is_empty()
        && !user_id.starts_with('.')
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'));
    if safe {
        Ok(())
    } else {
        Err(StoreError::InvalidUserId(user_id.to_owned()))
    }
}

/// File-backed store, one `<user_id>.json` per user under a root directory
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Store rooted at `root`; the directory is created on first save
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, user_id: &str) -> PathBuf {
        self.root.join(format!("{user_id}.json"))
    }

    async fn read_file(path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io {
                path: path.to_owned(),
                source: e,
            }),
        }
    }
}

#[async_trait]
impl ProgressStore for JsonFileStore {
    async fn load(&self, user_id: &str) -> Result<Option<SessionSnapshot>, StoreError> {
        check_user_id(user_id)?;
        let path = self.path_for(user_id);
        let Some(bytes) = Self::read_file(&path).await? else {
            return Ok(None);
        };
        let snapshot = serde_json::from_slice(&bytes)?;
        tracing::info!(user_id, path = %path.display(), "session snapshot loaded");
        Ok(Some(snapshot))
    }

    async fn save(&self, user_id: &str, snapshot: &SessionSnapshot) -> Result<(), StoreError> {
        check_user_id(user_id)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::Io {
                path: self.root.clone(),
                source: e,
            })?;

        let path = self.path_for(user_id);
        let tmp = self.root.join(format!("{user_id}.json.tmp"));
        let bytes = serde_json::to_vec_pretty(snapshot)?;

        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| StoreError::Io {
                path: tmp.clone(),
                source: e,
            })?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::Io {
                path: path.clone(),
                source: e,
            })?;

        tracing::debug!(user_id, bytes = bytes.len(), "session snapshot saved");
        Ok(())
    }
}

/// In-memory store for tests and the CLI
#[derive(Default)]
pub struct MemoryStore {
    snapshots: Mutex<HashMap<String, SessionSnapshot>>,
}

impl MemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn load(&self, user_id: &str) -> Result<Option<SessionSnapshot>, StoreError> {
        check_user_id(user_id)?;
        Ok(self.snapshots.lock().await.get(user_id).cloned())
    }

    async fn save(&self, user_id: &str, snapshot: &SessionSnapshot) -> Result<(), StoreError> {
        check_user_id(user_id)?;
        self.snapshots
            .lock()
            .await
            .insert(user_id.to_owned(), snapshot.clone());
        Ok(())
    }
}
