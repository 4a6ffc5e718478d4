pub mod manifest_config;
pub mod poller_config;

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;

use crate::config::manifest_config::ManifestConfig;
use crate::config::poller_config::PollerConfig;
use crate::utils::ensure_directory_exists;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub poller: PollerConfig,
    pub manifest: ManifestConfig,
}

impl AppConfig {
    /// Loads the config from a configuration file.
    pub async fn load_config(file_path: &Path) -> Result<Self, ConfigError> {
        if !file_path.exists() {
            warn!("Config file not found at {:?}, using default.", file_path);
            return Ok(Self::default());
        }

        let config_json = fs::read_to_string(file_path)
            .await
            .map_err(|source| ConfigError::Io {
                path: file_path.to_path_buf(),
                source,
            })?;
        let config: Self =
            serde_json::from_str(&config_json).map_err(|source| ConfigError::Parse {
                path: file_path.to_path_buf(),
                source,
            })?;

        info!("Config loaded from {:?}", file_path);
        Ok(config)
    }

    /// Saves the current config to a configuration file.
    pub async fn save_config(&self, file_path: &Path) -> Result<(), ConfigError> {
        if let Some(config_dir) = file_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            ensure_directory_exists(config_dir)
                .await
                .map_err(|source| ConfigError::Io {
                    path: config_dir.to_path_buf(),
                    source,
                })?;
        }

        let config_json = serde_json::to_string_pretty(&self)?;
        fs::write(file_path, config_json)
            .await
            .map_err(|source| ConfigError::Io {
                path: file_path.to_path_buf(),
                source,
            })?;

        info!("Config saved to {:?}", file_path);
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poller.tick_hz == 0 || self.poller.tick_hz > 1000 {
            return Err(ConfigError::Invalid(format!(
                "tick_hz must be between 1 and 1000, got {}",
                self.poller.tick_hz
            )));
        }
        if self.manifest.file_name.is_empty() {
            return Err(ConfigError::Invalid(
                "manifest file_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::manifest_config::ManifestBase;
    use crate::core::controller::ControlMode;

    #[tokio::test]
    async fn missing_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_config(&dir.path().join("absent.json"))
            .await
            .unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[tokio::test]
    async fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge.json");
        std::fs::write(
            &path,
            r#"{"poller": {"suppress_duplicate_moves": false, "initial_mode": "Default"}}"#,
        )
        .unwrap();

        let config = AppConfig::load_config(&path).await.unwrap();

        assert!(!config.poller.suppress_duplicate_moves);
        assert_eq!(config.poller.initial_mode, ControlMode::Default);
        assert_eq!(config.poller.tick_hz, 100);
        assert_eq!(config.manifest, ManifestConfig::default());
    }

    #[tokio::test]
    async fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bridge.json");
        let mut config = AppConfig::default();
        config.poller.always_activate_control_set = true;
        config.manifest.base = ManifestBase::ExecutableDirectory;

        config.save_config(&path).await.unwrap();
        let loaded = AppConfig::load_config(&path).await.unwrap();

        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = AppConfig::load_config(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn validate_rejects_zero_rate() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());
        config.poller.tick_hz = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
