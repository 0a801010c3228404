//! ConfigRoot DTOs and migrations (config.toml)

use cropscan_core::config::{ApiSettings, DEFAULT_LOG_LEVEL, RootConfig};
use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

/// Root configuration V1.0.0.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct ConfigRootV1_0_0 {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Default for ConfigRootV1_0_0 {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

impl IntoDomain<RootConfig> for ConfigRootV1_0_0 {
    fn into_domain(self) -> RootConfig {
        RootConfig {
            api: self.api,
            log_level: self
                .log_level
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

impl FromDomain<RootConfig> for ConfigRootV1_0_0 {
    fn from_domain(config: RootConfig) -> Self {
        ConfigRootV1_0_0 {
            api: config.api,
            log_level: Some(config.log_level),
        }
    }
}

/// Creates a Migrator for the root configuration.
pub fn create_config_root_migrator()
-> Result<version_migrate::Migrator, version_migrate::MigrationError> {
    let mut migrator = version_migrate::Migrator::builder().build();
    let path = version_migrate::Migrator::define("config_root")
        .from::<ConfigRootV1_0_0>()
        .into_with_save::<RootConfig>();
    migrator.register(path)?;
    Ok(migrator)
}
