//! Read-only dashboard views computed from store snapshots.

use std::collections::{HashMap, HashSet};

use cropscan_core::disease::Disease;
use cropscan_core::plant::PlantRecord;

pub const UNKNOWN_DISEASE: &str = "Unknown disease";

/// Diseases matching `term` on name, category or solution, in list order.
///
/// A blank term matches everything.
pub fn filter_diseases<'a>(diseases: &'a [Disease], term: &str) -> Vec<&'a Disease> {
    let needle = term.trim().to_lowercase();
    diseases
        .iter()
        .filter(|d| needle.is_empty() || d.matches(&needle))
        .collect()
}

/// A plant record joined with the name of its disease.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantRow {
    pub id: i64,
    pub plant_image: String,
    pub location: String,
    pub disease_id: Option<i64>,
    pub disease_label: String,
    /// False when `disease_id` is missing or points at nothing in the catalog.
    pub disease_known: bool,
    pub datetime: String,
}

pub fn plant_rows(records: &[PlantRecord], diseases: &[Disease]) -> Vec<PlantRow> {
    let names: HashMap<i64, &str> = diseases.iter().map(|d| (d.id, d.name.as_str())).collect();

    records
        .iter()
        .map(|record| {
            let name = record.disease_id.and_then(|id| names.get(&id));
            PlantRow {
                id: record.id,
                plant_image: record.plant_image.clone(),
                location: record.location.clone(),
                disease_id: record.disease_id,
                disease_label: name.copied().unwrap_or(UNKNOWN_DISEASE).to_string(),
                disease_known: name.is_some(),
                datetime: record.datetime.clone(),
            }
        })
        .collect()
}

/// Rows whose disease label or location contains `term` (case-insensitive),
/// or whose id contains it as text.
pub fn filter_plant_rows<'a>(rows: &'a [PlantRow], term: &str) -> Vec<&'a PlantRow> {
    let needle = term.trim().to_lowercase();
    rows.iter()
        .filter(|row| {
            needle.is_empty()
                || row.disease_label.to_lowercase().contains(&needle)
                || row.location.to_lowercase().contains(&needle)
                || row.id.to_string().contains(&needle)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_records: usize,
    pub distinct_locations: usize,
    /// Records whose disease id is not in the catalog.
    pub unknown_disease_refs: usize,
    pub catalog_size: usize,
}

impl DashboardStats {
    pub fn compute(records: &[PlantRecord], diseases: &[Disease]) -> Self {
        let known: HashSet<i64> = diseases.iter().map(|d| d.id).collect();
        let locations: HashSet<&str> = records
            .iter()
            .map(|r| r.location.trim())
            .filter(|l| !l.is_empty())
            .collect();

        Self {
            total_records: records.len(),
            distinct_locations: locations.len(),
            unknown_disease_refs: records
                .iter()
                .filter(|r| !r.disease_id.is_some_and(|id| known.contains(&id)))
                .count(),
            catalog_size: diseases.len(),
        }
    }
}
