//! Plant record cache DTOs and migrations

use cropscan_core::plant::PlantRecord;
use cropscan_core::snapshot::PlantSnapshot;
use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlantEntryDTO {
    pub id: i64,
    pub plant_image: String,
    pub location: String,
    #[serde(default)]
    pub disease_id: Option<i64>,
    pub datetime: String,
}

/// Plant record cache V1.0.0.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct PlantStorageV1_0_0 {
    #[serde(default)]
    pub user_plants: Vec<PlantEntryDTO>,
}

impl From<PlantEntryDTO> for PlantRecord {
    fn from(dto: PlantEntryDTO) -> Self {
        PlantRecord {
            id: dto.id,
            plant_image: dto.plant_image,
            location: dto.location,
            disease_id: dto.disease_id,
            datetime: dto.datetime,
        }
    }
}

impl From<PlantRecord> for PlantEntryDTO {
    fn from(record: PlantRecord) -> Self {
        PlantEntryDTO {
            id: record.id,
            plant_image: record.plant_image,
            location: record.location,
            disease_id: record.disease_id,
            datetime: record.datetime,
        }
    }
}

impl IntoDomain<PlantSnapshot> for PlantStorageV1_0_0 {
    fn into_domain(self) -> PlantSnapshot {
        PlantSnapshot {
            user_plants: self.user_plants.into_iter().map(Into::into).collect(),
        }
    }
}

impl FromDomain<PlantSnapshot> for PlantStorageV1_0_0 {
    fn from_domain(snapshot: PlantSnapshot) -> Self {
        PlantStorageV1_0_0 {
            user_plants: snapshot.user_plants.into_iter().map(Into::into).collect(),
        }
    }
}

/// Creates a Migrator for the plant record cache.
pub fn create_plant_storage_migrator()
-> Result<version_migrate::Migrator, version_migrate::MigrationError> {
    let mut migrator = version_migrate::Migrator::builder().build();
    let path = version_migrate::Migrator::define("plant_storage")
        .from::<PlantStorageV1_0_0>()
        .into_with_save::<PlantSnapshot>();
    migrator.register(path)?;
    Ok(migrator)
}
