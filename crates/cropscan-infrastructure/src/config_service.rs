//! Configuration service implementation.
//!
//! Loads the root configuration from `config.toml` (see [`crate::paths`]) and
//! layers environment overrides on top of it.

use crate::dto::create_config_root_migrator;
use crate::paths::{CropScanPaths, ServiceType};
use cropscan_core::config::RootConfig;
use cropscan_core::error::{CropScanError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use version_migrate::{FileStorage, FileStorageStrategy, FormatStrategy, LoadBehavior};

pub const ENV_API_URL: &str = "CROPSCAN_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "CROPSCAN_TIMEOUT_SECS";
pub const ENV_LOG: &str = "CROPSCAN_LOG";

const CONFIG_KEY: &str = "config_root";

/// Configuration service that loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached file configuration (without environment overrides).
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    pub fn new(paths: &CropScanPaths) -> Result<Self> {
        Ok(Self::with_path(paths.get_path(ServiceType::Config)?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the file configuration, loading it if not cached.
    ///
    /// A missing file is created with defaults.
    pub fn get_config(&self) -> Result<RootConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_config()?;

        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = Some(loaded.clone());
        Ok(loaded)
    }

    /// File configuration with `CROPSCAN_*` environment overrides applied.
    pub fn effective_config(&self) -> Result<RootConfig> {
        apply_env_overrides(self.get_config()?, |key| std::env::var(key).ok())
    }

    pub fn save_config(&self, config: &RootConfig) -> Result<()> {
        config.api.validate()?;
        let mut storage = self.open_storage()?;
        storage
            .update_and_save(CONFIG_KEY, vec![config.clone()])
            .map_err(|e| CropScanError::config(format!("Failed to save config: {}", e)))?;

        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = Some(config.clone());
        Ok(())
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    fn open_storage(&self) -> Result<FileStorage> {
        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        let migrator = create_config_root_migrator()?;
        let strategy = FileStorageStrategy::new()
            .with_format(FormatStrategy::Toml)
            .with_load_behavior(LoadBehavior::CreateIfMissing);

        FileStorage::new(self.path.clone(), migrator, strategy).map_err(|e| {
            CropScanError::config(format!(
                "Failed to open config file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn load_config(&self) -> Result<RootConfig> {
        let mut storage = self.open_storage()?;

        let configs: Vec<RootConfig> = storage
            .query(CONFIG_KEY)
            .map_err(|e| CropScanError::config(format!("Failed to query config_root: {}", e)))?;

        match configs.into_iter().next() {
            Some(config) => Ok(config),
            None => {
                let default_config = RootConfig::default();
                storage
                    .update_and_save(CONFIG_KEY, vec![default_config.clone()])
                    .map_err(|e| {
                        CropScanError::config(format!("Failed to save default config: {}", e))
                    })?;
                tracing::info!(path = %self.path.display(), "Created default configuration");
                Ok(default_config)
            }
        }
    }
}

/// Applies `CROPSCAN_API_URL`, `CROPSCAN_TIMEOUT_SECS` and `CROPSCAN_LOG`.
///
/// Blank values are ignored. The result is validated.
pub fn apply_env_overrides<F>(mut config: RootConfig, lookup: F) -> Result<RootConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = lookup(ENV_API_URL) {
        config.api.base_url = url.trim().to_string();
    }
    if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
        config.api.timeout_secs = raw.trim().parse().map_err(|_| {
            CropScanError::config(format!("{ENV_TIMEOUT_SECS} must be a number, got '{raw}'"))
        })?;
    }
    if let Some(level) = lookup(ENV_LOG) {
        config.log_level = level.trim().to_string();
    }

    config.api.validate()?;
    Ok(config)
}
