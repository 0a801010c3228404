//! Disease catalog store.

use std::sync::Arc;

use cropscan_core::api::{ApiClient, ApiError, decode_body, endpoints};
use cropscan_core::disease::{Disease, UpdateSolutionRequest};
use cropscan_core::error::{CropScanError, Result};
use cropscan_core::snapshot::{DiseaseSnapshot, SnapshotRepository};
use tokio::sync::{Mutex, RwLock};

const NO_DISEASES: &str = "No diseases found";
const DISEASE_NOT_FOUND: &str = "Disease not found";

/// Observable state of the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiseaseState {
    pub diseases: Vec<Disease>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Owns the disease list and mirrors it into the disease snapshot.
///
/// Every mutation of the list happens after the backend confirmed the call.
/// Concurrent calls are not fenced: the response that lands last wins. A list
/// change and its snapshot write happen under `commit_order`, so the snapshot
/// always holds the list that was applied last.
pub struct DiseaseStore {
    api: Arc<dyn ApiClient>,
    repository: Arc<dyn SnapshotRepository<DiseaseSnapshot>>,
    state: RwLock<DiseaseState>,
    commit_order: Mutex<()>,
}

impl DiseaseStore {
    pub fn new(
        api: Arc<dyn ApiClient>,
        repository: Arc<dyn SnapshotRepository<DiseaseSnapshot>>,
    ) -> Self {
        Self {
            api,
            repository,
            state: RwLock::new(DiseaseState::default()),
            commit_order: Mutex::new(()),
        }
    }

    /// Loads the cached list, if a valid one was persisted.
    pub async fn hydrate(&self) {
        match self.repository.load().await {
            Ok(Some(snapshot)) => {
                tracing::debug!(count = snapshot.diseases.len(), "Hydrated disease cache");
                self.state.write().await.diseases = snapshot.diseases;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to read disease cache"),
        }
    }

    /// Replaces the list with the backend's. A 404 means "no diseases".
    pub async fn fetch_diseases(&self) -> Result<()> {
        self.begin("fetch_diseases").await;

        let result = self
            .api
            .get(endpoints::GET_DISEASES)
            .await
            .and_then(decode_body::<Vec<Disease>>);

        match result {
            Ok(diseases) => {
                tracing::info!(count = diseases.len(), "Fetched diseases");
                self.replace(diseases, None).await;
                Ok(())
            }
            Err(err) if err.is_not_found() => {
                tracing::info!("Backend has no diseases");
                self.replace(Vec::new(), Some(NO_DISEASES.to_string()))
                    .await;
                Ok(())
            }
            Err(err) => Err(self.fail(err, "Failed to fetch diseases", None).await),
        }
    }

    /// Asks the backend to seed sample data, then refetches.
    pub async fn populate_diseases(&self) -> Result<()> {
        self.begin("populate_diseases").await;

        if let Err(err) = self.api.post(endpoints::POPULATE_DISEASES, None).await {
            return Err(self.fail(err, "Failed to populate diseases", None).await);
        }
        tracing::info!("Backend populated sample diseases");

        self.fetch_diseases().await
    }

    /// Replaces the solution of one disease once the backend accepts it.
    pub async fn update_disease(&self, id: i64, solution: &str) -> Result<()> {
        let body = serde_json::to_value(UpdateSolutionRequest {
            solution: solution.to_string(),
        })?;
        self.begin("update_disease").await;

        if let Err(err) = self
            .api
            .put(&endpoints::update_disease(id), Some(body))
            .await
        {
            return Err(self
                .fail(err, "Failed to update disease", Some(DISEASE_NOT_FOUND))
                .await);
        }

        tracing::info!(id, "Updated disease solution");
        self.commit(|state| match state.diseases.iter_mut().find(|d| d.id == id) {
            Some(disease) => disease.solution = solution.to_string(),
            None => tracing::debug!(id, "Updated disease is not in the local list"),
        })
        .await;
        Ok(())
    }

    pub async fn delete_disease(&self, id: i64) -> Result<()> {
        self.begin("delete_disease").await;

        if let Err(err) = self.api.delete(&endpoints::delete_disease(id)).await {
            return Err(self
                .fail(err, "Failed to delete disease", Some(DISEASE_NOT_FOUND))
                .await);
        }

        tracing::info!(id, "Deleted disease");
        self.commit(|state| state.diseases.retain(|d| d.id != id))
            .await;
        Ok(())
    }

    pub async fn clear_all_diseases(&self) -> Result<()> {
        self.begin("clear_all_diseases").await;

        if let Err(err) = self.api.delete(endpoints::CLEAR_DISEASES).await {
            return Err(self.fail(err, "Failed to clear all diseases", None).await);
        }

        tracing::info!("Cleared all diseases");
        self.replace(Vec::new(), None).await;
        Ok(())
    }

    pub async fn clear_error(&self) {
        self.state.write().await.error = None;
    }

    pub async fn state(&self) -> DiseaseState {
        self.state.read().await.clone()
    }

    pub async fn diseases(&self) -> Vec<Disease> {
        self.state.read().await.diseases.clone()
    }

    pub async fn find(&self, id: i64) -> Option<Disease> {
        self.state
            .read()
            .await
            .diseases
            .iter()
            .find(|d| d.id == id)
            .cloned()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    async fn begin(&self, operation: &str) {
        tracing::debug!(operation, "Disease store operation started");
        let mut state = self.state.write().await;
        state.is_loading = true;
        state.error = None;
    }

    async fn replace(&self, diseases: Vec<Disease>, error: Option<String>) {
        self.commit(|state| {
            state.diseases = diseases;
            state.error = error;
        })
        .await;
    }

    /// Applies a confirmed change to the list and writes it through.
    async fn commit(&self, apply: impl FnOnce(&mut DiseaseState)) {
        let _order = self.commit_order.lock().await;
        let diseases = {
            let mut state = self.state.write().await;
            apply(&mut state);
            state.is_loading = false;
            state.diseases.clone()
        };
        if let Err(e) = self.repository.save(DiseaseSnapshot { diseases }).await {
            tracing::warn!(error = %e, "Failed to persist disease cache");
        }
    }

    async fn fail(&self, err: ApiError, fallback: &str, not_found: Option<&str>) -> CropScanError {
        let message = err.display_message(fallback, not_found);
        tracing::warn!(status = ?err.status, kind = %err.kind, "{}: {}", fallback, err);

        let mut state = self.state.write().await;
        state.error = Some(message);
        state.is_loading = false;
        CropScanError::Api(err)
    }
}
