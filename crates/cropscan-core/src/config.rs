//! Client configuration models.

use serde::{Deserialize, Serialize};
use url::Url;
use version_migrate::DeriveQueryable as Queryable;

use crate::error::{CropScanError, Result};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
/// Generous enough for image uploads.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiSettings {
    /// Returns the base URL without trailing slashes after checking that it is
    /// an absolute http(s) URL.
    pub fn normalized_base_url(&self) -> Result<String> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed)
            .map_err(|e| CropScanError::config(format!("invalid base URL '{trimmed}': {e}")))?;
        match parsed.scheme() {
            "http" | "https" => Ok(trimmed.to_string()),
            other => Err(CropScanError::config(format!(
                "unsupported base URL scheme '{other}'"
            ))),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.normalized_base_url()?;
        if self.timeout_secs == 0 {
            return Err(CropScanError::config("timeout_secs must be greater than 0"));
        }
        Ok(())
    }
}

/// Root configuration (config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Queryable)]
#[queryable(entity = "config_root")]
pub struct RootConfig {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RootConfig::default();
        assert_eq!(config.api.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.log_level, "info");
        assert!(config.api.validate().is_ok());
    }

    #[test]
    fn test_trailing_slashes_are_trimmed() {
        let settings = ApiSettings {
            base_url: " https://api.cropscan.ai/v1// ".into(),
            timeout_secs: 10,
        };
        assert_eq!(
            settings.normalized_base_url().unwrap(),
            "https://api.cropscan.ai/v1"
        );
    }

    #[test]
    fn test_rejects_relative_and_non_http_urls() {
        let relative = ApiSettings {
            base_url: "/api".into(),
            ..ApiSettings::default()
        };
        assert!(relative.validate().unwrap_err().is_config());

        let ftp = ApiSettings {
            base_url: "ftp://files.example".into(),
            ..ApiSettings::default()
        };
        assert!(ftp.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let settings = ApiSettings {
            timeout_secs: 0,
            ..ApiSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: RootConfig = toml::from_str("[api]\nbase_url = \"http://10.0.0.2:8000\"\n").unwrap();
        assert_eq!(config.api.base_url, "http://10.0.0.2:8000");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.log_level, "info");
    }
}
