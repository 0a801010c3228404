//! Disease cache DTOs and migrations
//!
//! The cached entry keeps its own DTO. On disk the category is written with
//! the backend's `chategory` spelling; the plain spelling is still read.

use cropscan_core::disease::Disease;
use cropscan_core::snapshot::DiseaseSnapshot;
use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiseaseEntryDTO {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "chategory", alias = "category")]
    pub category: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Disease cache V1.0.0.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct DiseaseStorageV1_0_0 {
    #[serde(default)]
    pub diseases: Vec<DiseaseEntryDTO>,
}

impl From<DiseaseEntryDTO> for Disease {
    fn from(dto: DiseaseEntryDTO) -> Self {
        Disease {
            id: dto.id,
            name: dto.name,
            category: dto.category,
            solution: dto.solution,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        }
    }
}

impl From<Disease> for DiseaseEntryDTO {
    fn from(disease: Disease) -> Self {
        DiseaseEntryDTO {
            id: disease.id,
            name: disease.name,
            category: disease.category,
            solution: disease.solution,
            created_at: disease.created_at,
            updated_at: disease.updated_at,
        }
    }
}

impl IntoDomain<DiseaseSnapshot> for DiseaseStorageV1_0_0 {
    fn into_domain(self) -> DiseaseSnapshot {
        DiseaseSnapshot {
            diseases: self.diseases.into_iter().map(Into::into).collect(),
        }
    }
}

impl FromDomain<DiseaseSnapshot> for DiseaseStorageV1_0_0 {
    fn from_domain(snapshot: DiseaseSnapshot) -> Self {
        DiseaseStorageV1_0_0 {
            diseases: snapshot.diseases.into_iter().map(Into::into).collect(),
        }
    }
}

/// Creates a Migrator for the disease cache.
pub fn create_disease_storage_migrator()
-> Result<version_migrate::Migrator, version_migrate::MigrationError> {
    let mut migrator = version_migrate::Migrator::builder().build();
    let path = version_migrate::Migrator::define("disease_storage")
        .from::<DiseaseStorageV1_0_0>()
        .into_with_save::<DiseaseSnapshot>();
    migrator.register(path)?;
    Ok(migrator)
}
