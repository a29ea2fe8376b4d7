//! Repository configuration file support.
//!
//! This module provides utilities for reading repository and pricing
//! configuration from TOML configuration files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repository::RepositoryError;

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub pricing: PricingConfig,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

/// Lesson pricing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Flat rate in cents charged per lesson minute.
    #[serde(default = "default_per_minute_cents")]
    pub per_minute_cents: u64,
}

fn default_per_minute_cents() -> u64 {
    150
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            per_minute_cents: default_per_minute_cents(),
        }
    }
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if successful
    /// * `Err(RepositoryError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::ConfigurationError(format!("Failed to read config file: {}", e))
        })?;

        let config: RepositoryConfig = toml::from_str(&content).map_err(|e| {
            RepositoryError::ConfigurationError(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Load repository configuration from the default location.
    ///
    /// Searches for `cadenza.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if found and parsed successfully
    /// * `Err(RepositoryError)` if no config file found or parse error
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = vec![
            PathBuf::from("cadenza.toml"),
            PathBuf::from("backend/cadenza.toml"),
            PathBuf::from("../cadenza.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RepositoryError::ConfigurationError(
            "No cadenza.toml found in standard locations".to_string(),
        ))
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_config() {
        let toml = r#"
[repository]
type = "local"
"#;

        let config: RepositoryConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.repository.repo_type, "local");
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
        assert_eq!(config.pricing.per_minute_cents, 150);
    }

    #[test]
    fn test_parse_pricing_section() {
        let toml = r#"
[repository]
type = "local"

[pricing]
per_minute_cents = 200
"#;

        let config: RepositoryConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.pricing.per_minute_cents, 200);
    }

    #[test]
    fn test_unknown_repository_type_is_rejected() {
        let toml = r#"
[repository]
type = "cloud"
"#;

        let config: RepositoryConfig = toml::from_str(toml).unwrap();
        assert!(config.repository_type().is_err());
    }
}
