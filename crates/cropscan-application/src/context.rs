//! Composition root: one adapter, three stores, built once at startup.

use std::sync::Arc;

use cropscan_core::api::ApiClient;
use cropscan_core::config::RootConfig;
use cropscan_core::error::Result;
use cropscan_core::snapshot::{AuthSnapshot, DiseaseSnapshot, PlantSnapshot, SnapshotRepository};
use cropscan_infrastructure::{CropScanPaths, FileSnapshotRepository, HttpApiClient, ServiceType};

use crate::auth_store::AuthStore;
use crate::disease_store::DiseaseStore;
use crate::plant_store::PlantStore;

/// Everything the presentation layer talks to.
///
/// The stores share one `ApiClient`, so a token set by [`AuthStore`] is seen
/// by every later request of the other stores.
pub struct AppContext {
    pub config: RootConfig,
    pub api: Arc<dyn ApiClient>,
    pub auth: Arc<AuthStore>,
    pub diseases: Arc<DiseaseStore>,
    pub plants: Arc<PlantStore>,
}

impl AppContext {
    /// Builds the HTTP adapter and the file-backed stores under `paths`.
    pub async fn bootstrap(config: RootConfig, paths: &CropScanPaths) -> Result<Self> {
        let api: Arc<dyn ApiClient> = Arc::new(HttpApiClient::new(&config.api)?);

        let auth_repo = Arc::new(FileSnapshotRepository::<AuthSnapshot>::new(
            paths.get_path(ServiceType::AuthStorage)?,
        )?);
        let disease_repo = Arc::new(FileSnapshotRepository::<DiseaseSnapshot>::new(
            paths.get_path(ServiceType::DiseaseStorage)?,
        )?);
        let plant_repo = Arc::new(FileSnapshotRepository::<PlantSnapshot>::new(
            paths.get_path(ServiceType::PlantStorage)?,
        )?);

        tracing::debug!(base_url = %config.api.base_url, "Bootstrapping application context");
        Ok(Self::from_parts(config, api, auth_repo, disease_repo, plant_repo).await)
    }

    /// Wires the stores to the given adapters and hydrates the list caches.
    pub async fn from_parts(
        config: RootConfig,
        api: Arc<dyn ApiClient>,
        auth_repo: Arc<dyn SnapshotRepository<AuthSnapshot>>,
        disease_repo: Arc<dyn SnapshotRepository<DiseaseSnapshot>>,
        plant_repo: Arc<dyn SnapshotRepository<PlantSnapshot>>,
    ) -> Self {
        let auth = Arc::new(AuthStore::new(api.clone(), auth_repo));
        let diseases = Arc::new(DiseaseStore::new(api.clone(), disease_repo));
        let plants = Arc::new(PlantStore::new(api.clone(), plant_repo));

        diseases.hydrate().await;
        plants.hydrate().await;

        Self {
            config,
            api,
            auth,
            diseases,
            plants,
        }
    }
}
