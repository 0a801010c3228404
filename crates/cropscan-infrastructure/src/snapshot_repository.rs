//! File-backed snapshot repository.
//!
//! Each store snapshot lives in its own versioned JSON file managed by
//! version-migrate's `FileStorage`. Loading applies a schema check: the file
//! must parse, migrate to the domain snapshot and pass `Snapshot::validate`.
//! Anything else is discarded and treated as "nothing stored".

use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cropscan_core::error::{CropScanError, Result};
use cropscan_core::snapshot::{Snapshot, SnapshotRepository};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use version_migrate::{
    FileStorage, FileStorageStrategy, FormatStrategy, LoadBehavior, MigrationError, Migrator,
    Queryable,
};

/// A snapshot with a registered on-disk schema.
pub trait PersistedSnapshot: Snapshot + Queryable + Serialize + DeserializeOwned {
    fn migrator() -> std::result::Result<Migrator, MigrationError>;
}

/// Snapshot repository backed by one JSON file.
pub struct FileSnapshotRepository<S> {
    path: PathBuf,
    /// FileStorage instance for persistence.
    /// Replaced wholesale when a snapshot is discarded.
    storage: Arc<Mutex<FileStorage>>,
    _snapshot: PhantomData<fn() -> S>,
}

impl<S: PersistedSnapshot> FileSnapshotRepository<S> {
    /// Opens (or creates) the snapshot file at `path`.
    ///
    /// A file that cannot even be opened as versioned storage is discarded
    /// here rather than failing startup.
    pub fn new(path: PathBuf) -> Result<Self> {
        let storage = match open_storage::<S>(&path) {
            Ok(storage) => storage,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Discarding unreadable {} snapshot",
                    S::STORAGE_KEY
                );
                reset_storage::<S>(&path)?
            }
        };

        Ok(Self {
            path,
            storage: Arc::new(Mutex::new(storage)),
            _snapshot: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn open_storage<S: PersistedSnapshot>(path: &Path) -> Result<FileStorage> {
    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }

    let migrator = S::migrator()?;
    let strategy = FileStorageStrategy::new()
        .with_format(FormatStrategy::Json)
        .with_load_behavior(LoadBehavior::CreateIfMissing);

    Ok(FileStorage::new(path.to_path_buf(), migrator, strategy)?)
}

/// Deletes the file and opens fresh, empty storage in its place.
fn reset_storage<S: PersistedSnapshot>(path: &Path) -> Result<FileStorage> {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    open_storage::<S>(path)
}

fn join_error(e: tokio::task::JoinError) -> CropScanError {
    CropScanError::internal(format!("Failed to join task: {}", e))
}

#[async_trait]
impl<S: PersistedSnapshot> SnapshotRepository<S> for FileSnapshotRepository<S> {
    async fn load(&self) -> Result<Option<S>> {
        let storage = self.storage.clone();
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || {
            let mut storage = storage.blocking_lock();

            let problem = match storage.query::<S>(S::STORAGE_KEY) {
                Ok(snapshots) => match snapshots.into_iter().next() {
                    None => return Ok(None),
                    Some(snapshot) => match snapshot.validate() {
                        Ok(()) => return Ok(Some(snapshot)),
                        Err(reason) => reason,
                    },
                },
                Err(e) => e.to_string(),
            };

            tracing::warn!(
                path = %path.display(),
                reason = %problem,
                "Persisted {} snapshot failed schema check, discarding",
                S::STORAGE_KEY
            );
            *storage = reset_storage::<S>(&path)?;
            Ok(None)
        })
        .await
        .map_err(join_error)?
    }

    async fn save(&self, snapshot: S) -> Result<()> {
        let storage = self.storage.clone();

        tokio::task::spawn_blocking(move || {
            let mut storage = storage.blocking_lock();
            storage
                .update_and_save(S::STORAGE_KEY, vec![snapshot])
                .map_err(|e| {
                    CropScanError::storage(format!(
                        "Failed to save {}: {}",
                        S::STORAGE_KEY,
                        e
                    ))
                })
        })
        .await
        .map_err(join_error)?
    }

    async fn clear(&self) -> Result<()> {
        let storage = self.storage.clone();

        tokio::task::spawn_blocking(move || {
            let mut storage = storage.blocking_lock();
            storage
                .update_and_save(S::STORAGE_KEY, Vec::<S>::new())
                .map_err(|e| {
                    CropScanError::storage(format!(
                        "Failed to clear {}: {}",
                        S::STORAGE_KEY,
                        e
                    ))
                })
        })
        .await
        .map_err(join_error)?
    }
}
