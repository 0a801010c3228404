//! Snapshot repository trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::snapshot::model::Snapshot;

/// Durable storage for one store's snapshot.
///
/// Storage is a cache, never a source of truth: a missing or invalid
/// snapshot loads as `None`.
#[async_trait]
pub trait SnapshotRepository<S: Snapshot>: Send + Sync {
    /// Loads the snapshot, or `None` if nothing valid is stored.
    async fn load(&self) -> Result<Option<S>>;

    /// Replaces the stored snapshot.
    async fn save(&self, snapshot: S) -> Result<()>;

    /// Removes the stored snapshot.
    async fn clear(&self) -> Result<()>;
}
