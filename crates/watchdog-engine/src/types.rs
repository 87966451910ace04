//! Common types for container engine handles

use bollard::models::ContainerInspectResponse;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Container ID wrapper
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(pub String);

impl ContainerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn short(&self) -> &str {
        if self.0.len() > 12 {
            &self.0[..12]
        } else {
            &self.0
        }
    }
}

impl std::fmt::Display for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ContainerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A container as reported by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerRecord {
    pub id: ContainerId,
    /// Engine name, including the leading `/`
    pub name: String,
    /// Image reference from the container config, as it was created
    pub image: String,
    /// Lifecycle state (`running`, `exited`, ...)
    pub state: String,
    pub labels: HashMap<String, String>,
}

impl From<ContainerInspectResponse> for ContainerRecord {
    fn from(info: ContainerInspectResponse) -> Self {
        let state = info
            .state
            .as_ref()
            .and_then(|s| s.status)
            .map(|s| format!("{:?}", s).to_lowercase())
            .unwrap_or_default();
        let config = info.config.as_ref();

        Self {
            id: ContainerId::new(info.id.clone().unwrap_or_default()),
            name: info.name.clone().unwrap_or_default(),
            image: config.and_then(|c| c.image.clone()).unwrap_or_default(),
            state,
            labels: config.and_then(|c| c.labels.clone()).unwrap_or_default(),
        }
    }
}

/// Options for removing a container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveOptions {
    /// Kill the container first if it is running
    pub force: bool,
    /// Remove anonymous volumes attached to the container
    pub volumes: bool,
    /// Remove the link rather than the container
    pub link: bool,
}

/// Configuration for creating a volume
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeConfig {
    pub name: String,
    pub driver: String,
    pub driver_opts: HashMap<String, String>,
    pub labels: HashMap<String, String>,
}

/// A named volume as reported by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    pub name: String,
    pub driver: String,
    pub driver_opts: HashMap<String, String>,
    pub labels: HashMap<String, String>,
    pub mountpoint: String,
}

impl From<bollard::models::Volume> for Volume {
    fn from(v: bollard::models::Volume) -> Self {
        Self {
            name: v.name,
            driver: v.driver,
            driver_opts: v.options,
            labels: v.labels,
            mountpoint: v.mountpoint,
        }
    }
}
