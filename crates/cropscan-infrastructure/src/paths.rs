//! Unified path management for CropScan files.
//!
//! Paths are resolved via `AppPaths` from the version-migrate crate, unless a
//! base directory override is given (tests, `--data-dir`).
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/cropscan/          # Config directory (AppPaths default)
//! ├── config.toml              # Client configuration
//! ├── auth-storage.json        # Auth store snapshot (token only)
//! ├── disease-storage.json     # Disease catalog cache
//! └── plant-storage.json       # Plant record cache
//! ```

use std::path::{Path, PathBuf};

use version_migrate::AppPaths;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for cropscan_core::CropScanError {
    fn from(err: PathError) -> Self {
        cropscan_core::CropScanError::config(err.to_string())
    }
}

/// Files owned by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    Config,
    AuthStorage,
    DiseaseStorage,
    PlantStorage,
}

impl ServiceType {
    fn file_name(self) -> &'static str {
        match self {
            ServiceType::Config => "config.toml",
            ServiceType::AuthStorage => "auth-storage.json",
            ServiceType::DiseaseStorage => "disease-storage.json",
            ServiceType::PlantStorage => "plant-storage.json",
        }
    }
}

/// Path resolver for CropScan.
#[derive(Debug, Clone, Default)]
pub struct CropScanPaths {
    base: Option<PathBuf>,
}

impl CropScanPaths {
    /// `base` overrides the platform config directory.
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the directory every CropScan file lives in.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => AppPaths::new("cropscan")
                .config_dir()
                .map_err(|_| PathError::HomeDirNotFound),
        }
    }

    pub fn get_path(&self, service: ServiceType) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join(service.file_name()))
    }
}
