//! Global configuration for the watchdog
//!
//! Located at `~/.config/watchdog/config.toml`

use crate::{ConfigError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Volume driver used when none is configured (LVM-backed)
pub const DEFAULT_VOLUME_DRIVER: &str = "lvmpy";

/// Status reported for a container the engine does not know about
pub const DEFAULT_CONTAINER_NOT_FOUND: &str = "not_found";

/// Engine status of a live container
pub const DEFAULT_RUNNING_STATUS: &str = "running";

/// Global watchdog configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub docker: DockerConfig,
    pub containers: ContainersConfig,
}

/// Connection and volume settings for the container engine
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerConfig {
    /// Engine socket or URL; empty means use the environment (`DOCKER_HOST`)
    pub socket: String,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Driver for newly created data volumes
    pub volume_driver: String,
    /// Registry username (`DOCKER_USERNAME`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Registry password (`DOCKER_PASSWORD`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            socket: String::new(),
            timeout: 120,
            volume_driver: DEFAULT_VOLUME_DRIVER.to_string(),
            username: None,
            password: None,
        }
    }
}

impl std::fmt::Debug for DockerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DockerConfig")
            .field("socket", &self.socket)
            .field("timeout", &self.timeout)
            .field("volume_driver", &self.volume_driver)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl DockerConfig {
    /// Whether a username and password are both present
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

/// Status constants shared with the orchestration layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainersConfig {
    /// Sentinel status for a failed container lookup (`CONTAINER_NOT_FOUND`)
    pub not_found_status: String,
    /// Status of a live container (`RUNNING_STATUS`)
    pub running_status: String,
}

impl Default for ContainersConfig {
    fn default() -> Self {
        Self {
            not_found_status: DEFAULT_CONTAINER_NOT_FOUND.to_string(),
            running_status: DEFAULT_RUNNING_STATUS.to_string(),
        }
    }
}

impl GlobalConfig {
    /// Load global configuration from the default path, then apply environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = Self::load_from(&path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load global configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            path: path.clone(),
            source: e,
        })?;

        tracing::debug!(
            "Loaded config from {:?}: volume_driver={}",
            path,
            config.docker.volume_driver
        );

        Ok(config)
    }

    /// Override credentials from `DOCKER_USERNAME` / `DOCKER_PASSWORD`
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(username) = lookup("DOCKER_USERNAME").filter(|v| !v.is_empty()) {
            self.docker.username = Some(username);
        }
        if let Some(password) = lookup("DOCKER_PASSWORD").filter(|v| !v.is_empty()) {
            self.docker.password = Some(password);
        }
    }

    /// Reject settings the admin client cannot work with
    pub fn validate(&self) -> Result<()> {
        let containers = &self.containers;
        if containers.not_found_status.is_empty() || containers.running_status.is_empty() {
            return Err(ConfigError::Invalid(
                "container status constants must not be empty".to_string(),
            ));
        }
        if containers.not_found_status == containers.running_status {
            return Err(ConfigError::Invalid(format!(
                "not_found_status and running_status must differ (both are '{}')",
                containers.running_status
            )));
        }
        if self.docker.volume_driver.is_empty() {
            return Err(ConfigError::Invalid("volume_driver must not be empty".to_string()));
        }
        Ok(())
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.clone(),
                source: e,
            })?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::WriteError {
            path: path.clone(),
            source: e,
        })
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "watchdog").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = GlobalConfig::default();
        assert_eq!(config.docker.volume_driver, "lvmpy");
        assert!(config.docker.socket.is_empty());
        assert_eq!(config.containers.running_status, "running");
        assert_eq!(config.containers.not_found_status, "not_found");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[docker]
socket = "/var/run/docker.sock"
volume_driver = "local"
username = "skale"

[containers]
running_status = "up"
"#;

        let config: GlobalConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.docker.socket, "/var/run/docker.sock");
        assert_eq!(config.docker.volume_driver, "local");
        assert_eq!(config.docker.username.as_deref(), Some("skale"));
        assert_eq!(config.docker.timeout, 120);
        assert_eq!(config.containers.running_status, "up");
        assert_eq!(config.containers.not_found_status, "not_found");
    }

    #[test]
    fn test_env_overrides_credentials() {
        let env: HashMap<&str, &str> =
            HashMap::from([("DOCKER_USERNAME", "alice"), ("DOCKER_PASSWORD", "hunter2")]);
        let mut config = GlobalConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.docker.username.as_deref(), Some("alice"));
        assert_eq!(config.docker.password.as_deref(), Some("hunter2"));
        assert!(config.docker.has_credentials());
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = GlobalConfig::default();
        config.docker.username = Some("from-file".to_string());
        config.apply_env_overrides(|_| Some(String::new()));
        assert_eq!(config.docker.username.as_deref(), Some("from-file"));
        assert!(config.docker.password.is_none());
    }

    #[test]
    fn test_debug_redacts_password() {
        let mut config = GlobalConfig::default();
        config.docker.password = Some("hunter2".to_string());
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_validate_rejects_equal_statuses() {
        let mut config = GlobalConfig::default();
        config.containers.not_found_status = "running".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = GlobalConfig::load_from(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.docker.volume_driver, DEFAULT_VOLUME_DRIVER);
    }

    #[test]
    fn test_save_and_reload() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.toml");
        let mut config = GlobalConfig::default();
        config.docker.volume_driver = "local".to_string();
        config.save_to(&path).unwrap();

        let loaded = GlobalConfig::load_from(&path).unwrap();
        assert_eq!(loaded.docker.volume_driver, "local");
        assert!(loaded.docker.password.is_none());
    }

    #[test]
    fn test_invalid_toml_reports_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[docker\nsocket = 1").unwrap();
        match GlobalConfig::load_from(&path) {
            Err(ConfigError::TomlParseError { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {:?}", other.map(|_| ())),
        }
    }
}
