//! Snapshot persistence.
//!
//! The session manager hands every snapshot to a [`SnapshotStore`] from a
//! detached task and never waits on the result. Stores report failures;
//! the manager logs and drops them.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::data_dir;
use crate::error::StoreError;
use crate::snapshot::Snapshot;

/// File name of the persisted snapshot inside the data directory.
pub const STATE_FILE_NAME: &str = "state.json";

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;

    /// `Ok(None)` when nothing was saved yet or the saved data is unreadable.
    async fn load(&self) -> Result<Option<Snapshot>, StoreError>;

    async fn clear(&self) -> Result<(), StoreError>;
}

/// Pretty-printed JSON file, `state.json` in the data directory.
///
/// Writes are serialized, and a snapshot captured before the one already on
/// disk is dropped, so concurrent detached saves cannot regress the file.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    path: PathBuf,
    last_written: tokio::sync::Mutex<Option<DateTime<Utc>>>,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let path = dir.join(STATE_FILE_NAME);
        Self {
            dir,
            path,
            last_written: tokio::sync::Mutex::new(None),
        }
    }

    /// Store rooted at [`data_dir`].
    pub fn open_default() -> Result<Self, StoreError> {
        let dir = data_dir().map_err(|e| StoreError::DataDir(e.to_string()))?;
        Ok(Self::new(dir))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let mut last_written = self.last_written.lock().await;
        if last_written.is_some_and(|at| snapshot.last_saved_at < at) {
            debug!(saved_at = %snapshot.last_saved_at, "skipping out-of-date snapshot");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(snapshot)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| self.io_error(e))?;
        *last_written = Some(snapshot.last_saved_at);
        Ok(())
    }

    async fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        match serde_json::from_str(&content) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring corrupt state file");
                Ok(None)
            }
        }
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// In-process store. Used by tests and by callers that opt out of
/// durability.
#[derive(Debug, Default)]
pub struct MemoryStore {
    latest: Mutex<Option<Snapshot>>,
    saves: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that starts out holding `snapshot`.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        let store = Self::default();
        *store.lock() = Some(snapshot);
        store
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn latest(&self) -> Option<Snapshot> {
        self.lock().clone()
    }

    /// Make every subsequent operation fail with an I/O error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Snapshot>> {
        self.latest.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_failing(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Io {
                path: PathBuf::from("<memory>"),
                source: std::io::Error::other("memory store set to fail"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        self.check_failing()?;
        *self.lock() = Some(snapshot.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        self.check_failing()?;
        Ok(self.lock().clone())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.check_failing()?;
        *self.lock() = None;
        Ok(())
    }
}
