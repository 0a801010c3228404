//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs represent the versioned on-disk schema. They are private to the
//! infrastructure layer; stores only ever see the domain snapshots.
//!
//! ## Schema Versioning (Semantic Versioning)
//!
//! - **MAJOR (X.0.0)**: Breaking changes (field removal, type changes)
//! - **MINOR (1.X.0)**: Backward-compatible additions (new optional fields)
//!
//! All four files are at 1.0.0.

mod auth_storage;
mod config_root;
mod disease_storage;
mod plant_storage;

pub use auth_storage::{AuthStorageV1_0_0, create_auth_storage_migrator};
pub use config_root::{ConfigRootV1_0_0, create_config_root_migrator};
pub use disease_storage::{DiseaseEntryDTO, DiseaseStorageV1_0_0, create_disease_storage_migrator};
pub use plant_storage::{PlantEntryDTO, PlantStorageV1_0_0, create_plant_storage_migrator};

use cropscan_core::snapshot::{AuthSnapshot, DiseaseSnapshot, PlantSnapshot};
use version_migrate::{MigrationError, Migrator};

use crate::snapshot_repository::PersistedSnapshot;

impl PersistedSnapshot for AuthSnapshot {
    fn migrator() -> Result<Migrator, MigrationError> {
        create_auth_storage_migrator()
    }
}

impl PersistedSnapshot for DiseaseSnapshot {
    fn migrator() -> Result<Migrator, MigrationError> {
        create_disease_storage_migrator()
    }
}

impl PersistedSnapshot for PlantSnapshot {
    fn migrator() -> Result<Migrator, MigrationError> {
        create_plant_storage_migrator()
    }
}
