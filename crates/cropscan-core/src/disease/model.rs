//! Disease catalog domain model.

use serde::{Deserialize, Serialize};

/// A treatment-catalog entry.
///
/// The backend spells the category column `chategory`; both spellings are
/// accepted on input and the backend spelling is written back out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disease {
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

impl Disease {
    /// Case-insensitive match on name, category or solution.
    ///
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        [&self.name, &self.category, &self.solution]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateSolutionRequest {
    pub solution: String,
}
