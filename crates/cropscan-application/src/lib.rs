//! Application layer for CropScan.
//!
//! The three client-side stores, the composition root that wires them to the
//! infrastructure adapters, and read-only dashboard views.

pub mod auth_store;
pub mod context;
pub mod disease_store;
pub mod plant_store;
pub mod views;

#[cfg(test)]
mod test_support;

pub use auth_store::AuthStore;
pub use context::AppContext;
pub use disease_store::{DiseaseState, DiseaseStore};
pub use plant_store::{PlantState, PlantStore};
