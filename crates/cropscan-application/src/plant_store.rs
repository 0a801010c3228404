//! Plant record store: a read-only projection of the backend's records.

use std::sync::Arc;

use cropscan_core::api::{ApiClient, decode_body, endpoints};
use cropscan_core::error::{CropScanError, Result};
use cropscan_core::plant::PlantRecord;
use cropscan_core::snapshot::{PlantSnapshot, SnapshotRepository};
use tokio::sync::{Mutex, RwLock};

const NO_USER_PLANTS: &str = "No user plants found";
const FETCH_FAILED: &str = "Failed to fetch user plants";

/// Observable state of the plant record list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlantState {
    pub user_plants: Vec<PlantRecord>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Owns the plant record list and mirrors it into the plant snapshot.
///
/// Records are never edited locally; the list only changes by a fetch.
pub struct PlantStore {
    api: Arc<dyn ApiClient>,
    repository: Arc<dyn SnapshotRepository<PlantSnapshot>>,
    state: RwLock<PlantState>,
    commit_order: Mutex<()>,
}

impl PlantStore {
    pub fn new(
        api: Arc<dyn ApiClient>,
        repository: Arc<dyn SnapshotRepository<PlantSnapshot>>,
    ) -> Self {
        Self {
            api,
            repository,
            state: RwLock::new(PlantState::default()),
            commit_order: Mutex::new(()),
        }
    }

    pub async fn hydrate(&self) {
        match self.repository.load().await {
            Ok(Some(snapshot)) => {
                tracing::debug!(count = snapshot.user_plants.len(), "Hydrated plant cache");
                self.state.write().await.user_plants = snapshot.user_plants;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to read plant cache"),
        }
    }

    /// Replaces the list with the backend's. A 404 means "no records".
    pub async fn fetch_user_plants(&self) -> Result<()> {
        tracing::debug!("Fetching user plants");
        {
            let mut state = self.state.write().await;
            state.is_loading = true;
            state.error = None;
        }

        let result = self
            .api
            .get(endpoints::GET_USER_PLANTS)
            .await
            .and_then(decode_body::<Vec<PlantRecord>>);

        let (user_plants, error) = match result {
            Ok(user_plants) => {
                tracing::info!(count = user_plants.len(), "Fetched user plants");
                (user_plants, None)
            }
            Err(err) if err.is_not_found() => {
                tracing::info!("Backend has no user plants");
                (Vec::new(), Some(NO_USER_PLANTS.to_string()))
            }
            Err(err) => {
                let message = err.display_message(FETCH_FAILED, None);
                tracing::warn!(status = ?err.status, kind = %err.kind, "{}: {}", FETCH_FAILED, err);

                let mut state = self.state.write().await;
                state.error = Some(message);
                state.is_loading = false;
                return Err(CropScanError::Api(err));
            }
        };

        // Held through the write so snapshots land in the order lists were applied.
        let _order = self.commit_order.lock().await;
        {
            let mut state = self.state.write().await;
            state.user_plants = user_plants.clone();
            state.error = error;
            state.is_loading = false;
        }
        if let Err(e) = self.repository.save(PlantSnapshot { user_plants }).await {
            tracing::warn!(error = %e, "Failed to persist plant cache");
        }
        Ok(())
    }

    pub async fn clear_error(&self) {
        self.state.write().await.error = None;
    }

    pub async fn state(&self) -> PlantState {
        self.state.read().await.clone()
    }

    pub async fn user_plants(&self) -> Vec<PlantRecord> {
        self.state.read().await.user_plants.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }
}
