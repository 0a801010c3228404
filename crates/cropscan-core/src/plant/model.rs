//! Plant observation records.

use serde::{Deserialize, Serialize};

/// One submitted plant image and its diagnosis.
///
/// `disease_id` is a weak reference into the disease catalog. Nothing checks
/// that the disease exists; a dangling or missing id is rendered as an
/// unknown disease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantRecord {
    pub id: i64,
    #[serde(default)]
    pub plant_image: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub disease_id: Option<i64>,
    /// Backend timestamp, kept verbatim.
    #[serde(default)]
    pub datetime: String,
}
