//! Persisted store snapshots.
//!
//! Each store owns exactly one snapshot type and one storage key; no store
//! reads or writes another store's snapshot.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use version_migrate::DeriveQueryable as Queryable;

use crate::disease::Disease;
use crate::plant::PlantRecord;

/// A persisted store snapshot with a load-time schema check.
pub trait Snapshot: Clone + Default + Send + Sync + 'static {
    /// Storage key, also the migrator entity name.
    const STORAGE_KEY: &'static str;

    /// Checks rules that serde alone cannot express.
    ///
    /// A snapshot that fails validation is discarded on load.
    fn validate(&self) -> Result<(), String>;
}

/// Auth store snapshot: only the token survives a restart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Queryable)]
#[queryable(entity = "auth_storage")]
pub struct AuthSnapshot {
    pub token: Option<String>,
}

impl Snapshot for AuthSnapshot {
    const STORAGE_KEY: &'static str = "auth_storage";

    fn validate(&self) -> Result<(), String> {
        match &self.token {
            Some(token) if token.trim().is_empty() => Err("persisted token is blank".to_string()),
            _ => Ok(()),
        }
    }
}

/// Disease catalog cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Queryable)]
#[queryable(entity = "disease_storage")]
pub struct DiseaseSnapshot {
    #[serde(default)]
    pub diseases: Vec<Disease>,
}

impl Snapshot for DiseaseSnapshot {
    const STORAGE_KEY: &'static str = "disease_storage";

    fn validate(&self) -> Result<(), String> {
        ensure_unique_ids("disease", self.diseases.iter().map(|d| d.id))
    }
}

/// Plant record cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Queryable)]
#[queryable(entity = "plant_storage")]
pub struct PlantSnapshot {
    #[serde(default)]
    pub user_plants: Vec<PlantRecord>,
}

impl Snapshot for PlantSnapshot {
    const STORAGE_KEY: &'static str = "plant_storage";

    fn validate(&self) -> Result<(), String> {
        ensure_unique_ids("plant record", self.user_plants.iter().map(|p| p.id))
    }
}

fn ensure_unique_ids(what: &str, ids: impl Iterator<Item = i64>) -> Result<(), String> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(format!("duplicate {what} id {id}"));
        }
    }
    Ok(())
}
