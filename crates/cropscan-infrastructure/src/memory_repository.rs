//! In-memory snapshot repository for tests and ephemeral sessions.

use async_trait::async_trait;
use cropscan_core::error::Result;
use cropscan_core::snapshot::{Snapshot, SnapshotRepository};
use tokio::sync::Mutex;

/// Snapshot repository kept in memory.
///
/// Applies the same schema check as the file repository: an invalid snapshot
/// is dropped on load.
#[derive(Debug, Default)]
pub struct InMemorySnapshotRepository<S> {
    slot: Mutex<Option<S>>,
}

impl<S: Snapshot> InMemorySnapshotRepository<S> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    pub fn with_snapshot(snapshot: S) -> Self {
        Self {
            slot: Mutex::new(Some(snapshot)),
        }
    }

    /// Returns what is stored without validating it.
    pub async fn stored(&self) -> Option<S> {
        self.slot.lock().await.clone()
    }
}

#[async_trait]
impl<S: Snapshot> SnapshotRepository<S> for InMemorySnapshotRepository<S> {
    async fn load(&self) -> Result<Option<S>> {
        let mut slot = self.slot.lock().await;
        if let Some(snapshot) = slot.as_ref()
            && let Err(reason) = snapshot.validate()
        {
            tracing::warn!(
                reason = %reason,
                "In-memory {} snapshot failed schema check, discarding",
                S::STORAGE_KEY
            );
            *slot = None;
        }
        Ok(slot.clone())
    }

    async fn save(&self, snapshot: S) -> Result<()> {
        *self.slot.lock().await = Some(snapshot);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.slot.lock().await = None;
        Ok(())
    }
}
