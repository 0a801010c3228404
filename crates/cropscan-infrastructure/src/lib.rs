//! Infrastructure layer for CropScan.
//!
//! Adapters behind the core trait seams: the reqwest-backed `ApiClient`,
//! versioned snapshot storage and configuration loading.

pub mod config_service;
pub mod dto;
pub mod http_client;
pub mod memory_repository;
pub mod paths;
pub mod snapshot_repository;

pub use crate::config_service::{ConfigService, apply_env_overrides};
pub use crate::http_client::HttpApiClient;
pub use crate::memory_repository::InMemorySnapshotRepository;
pub use crate::paths::{CropScanPaths, ServiceType};
pub use crate::snapshot_repository::{FileSnapshotRepository, PersistedSnapshot};
