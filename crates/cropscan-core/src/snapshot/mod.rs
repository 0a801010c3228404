pub mod model;
pub mod repository;

pub use model::{AuthSnapshot, DiseaseSnapshot, PlantSnapshot, Snapshot};
pub use repository::SnapshotRepository;
